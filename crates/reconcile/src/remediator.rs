//! Capped remediation of gap lists.

use crate::{metrics::RemediationMetrics, RemediationItemError};
use derive_more::Display;
use futures::{stream, Future, StreamExt};
use gapsync_primitives::BlockHeight;
use std::{fmt, num::NonZeroUsize, pin::pin};
use tracing::{debug, trace, warn};

/// What a remediation pass is fixing.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemediationKind {
    /// Fetching heights without a stored copy.
    #[display("missing")]
    Missing,
    /// Pruning heights stored above the target redundancy.
    #[display("excessive")]
    Excessive,
}

impl RemediationKind {
    /// Returns the label used in logs and metrics.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Excessive => "excessive",
        }
    }
}

/// Result of remediating a single height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemediationOutcome {
    /// The remediated height.
    pub height: BlockHeight,
    /// The failure, if the operation did not succeed.
    pub error: Option<RemediationItemError>,
}

impl RemediationOutcome {
    /// A successful outcome.
    pub const fn success(height: BlockHeight) -> Self {
        Self { height, error: None }
    }

    /// A failed outcome.
    pub fn failure(height: BlockHeight, message: impl Into<String>) -> Self {
        Self { height, error: Some(RemediationItemError { height, message: message.into() }) }
    }

    /// Returns `true` if the operation succeeded.
    pub const fn succeeded(&self) -> bool {
        self.error.is_none()
    }

    /// The failure message, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|err| err.message.as_str())
    }
}

/// Aggregated outcomes of a remediation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemediationSummary {
    /// What the pass was fixing.
    pub kind: RemediationKind,
    /// Number of heights an operation was run for.
    pub attempted: usize,
    /// Number of successful operations.
    pub succeeded: usize,
    /// Number of failed operations.
    pub failed: usize,
    /// Per-height outcomes, in processing order.
    pub outcomes: Vec<RemediationOutcome>,
}

impl RemediationSummary {
    /// Creates an empty summary.
    pub const fn new(kind: RemediationKind) -> Self {
        Self { kind, attempted: 0, succeeded: 0, failed: 0, outcomes: Vec::new() }
    }

    /// Adds an outcome to the tally.
    pub fn record(&mut self, outcome: RemediationOutcome) {
        self.attempted += 1;
        if outcome.succeeded() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.outcomes.push(outcome);
    }

    /// Returns `true` if no operation failed.
    pub const fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Heights of the outcomes, in processing order.
    pub fn heights(&self) -> Vec<BlockHeight> {
        self.outcomes.iter().map(|outcome| outcome.height).collect()
    }

    /// Iterates over the failed outcomes.
    pub fn failures(&self) -> impl Iterator<Item = &RemediationItemError> + '_ {
        self.outcomes.iter().filter_map(|outcome| outcome.error.as_ref())
    }
}

impl fmt::Display for RemediationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: attempted {}, succeeded {}, failed {}",
            self.kind, self.attempted, self.succeeded, self.failed
        )
    }
}

/// Runs an operation over the first `cap` heights of a gap list.
///
/// Every selected height is attempted exactly once. A failing height is recorded and the pass
/// moves on; nothing is retried. Heights beyond the cap are left for a later run.
///
/// With a concurrency above one, several operations are in flight at once. Outcomes are still
/// reported in the order of the input heights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remediator {
    cap: usize,
    concurrency: NonZeroUsize,
}

impl Remediator {
    /// Creates a sequential remediator processing at most `cap` heights.
    pub const fn new(cap: usize) -> Self {
        Self { cap, concurrency: NonZeroUsize::MIN }
    }

    /// Sets the maximum number of operations in flight.
    pub const fn with_concurrency(mut self, concurrency: NonZeroUsize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// The maximum number of heights processed per pass.
    pub const fn cap(&self) -> usize {
        self.cap
    }

    /// The maximum number of operations in flight.
    pub const fn concurrency(&self) -> NonZeroUsize {
        self.concurrency
    }

    /// Runs `operation` for the first `cap` entries of `heights`.
    pub async fn run<F, Fut, T, E>(
        &self,
        kind: RemediationKind,
        heights: &[BlockHeight],
        mut operation: F,
    ) -> RemediationSummary
    where
        F: FnMut(BlockHeight) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let selected = &heights[..heights.len().min(self.cap)];
        let mut summary = RemediationSummary::new(kind);
        if selected.is_empty() {
            return summary
        }

        debug!(
            target: "reconcile::remediator",
            %kind,
            total = heights.len(),
            selected = selected.len(),
            concurrency = self.concurrency.get(),
            "Starting remediation"
        );

        let metrics = RemediationMetrics::new(kind);
        let mut results = pin!(stream::iter(selected.iter().copied())
            .map(|height| {
                let fut = operation(height);
                async move { (height, fut.await) }
            })
            .buffered(self.concurrency.get()));

        while let Some((height, result)) = results.next().await {
            let outcome = match result {
                Ok(_) => {
                    trace!(target: "reconcile::remediator", %kind, height, "Remediated block");
                    RemediationOutcome::success(height)
                }
                Err(err) => {
                    warn!(target: "reconcile::remediator", %kind, height, %err, "Remediation failed");
                    RemediationOutcome::failure(height, err.to_string())
                }
            };
            metrics.record(&outcome);
            summary.record(outcome);
        }

        debug!(
            target: "reconcile::remediator",
            %kind,
            attempted = summary.attempted,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Finished remediation"
        );
        summary
    }
}

/// Runs `operation` sequentially for the first `cap` entries of `heights`.
///
/// See [`Remediator`].
pub async fn remediate<F, Fut, T, E>(
    kind: RemediationKind,
    heights: &[BlockHeight],
    cap: usize,
    operation: F,
) -> RemediationSummary
where
    F: FnMut(BlockHeight) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    Remediator::new(cap).run(kind, heights, operation).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future;
    use metrics_util::debugging::{DebugValue, DebuggingRecorder};
    use std::{
        collections::HashMap,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
        time::Duration,
    };

    fn always_succeeds(_: BlockHeight) -> future::Ready<Result<(), String>> {
        future::ready(Ok(()))
    }

    #[tokio::test]
    async fn processes_first_cap_heights() {
        let summary = remediate(RemediationKind::Missing, &[3, 6, 8, 9, 10], 3, always_succeeds).await;
        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.succeeded, 3);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.heights(), vec![3, 6, 8]);
        assert!(summary.is_success());
    }

    #[tokio::test]
    async fn zero_cap_attempts_nothing() {
        let calls = AtomicUsize::new(0);
        let summary = remediate(RemediationKind::Excessive, &[1, 2, 3], 0, |_| {
            calls.fetch_add(1, Ordering::Relaxed);
            future::ready(Ok::<_, String>(()))
        })
        .await;
        assert_eq!(summary, RemediationSummary::new(RemediationKind::Excessive));
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn empty_heights_attempts_nothing() {
        let summary = remediate(RemediationKind::Missing, &[], 100, always_succeeds).await;
        assert_eq!(summary.attempted, 0);
        assert!(summary.outcomes.is_empty());
    }

    #[tokio::test]
    async fn failure_does_not_abort_batch() {
        let summary = remediate(RemediationKind::Missing, &[1, 2, 5, 8], 4, |height| {
            future::ready(if height == 5 { Err("not found upstream") } else { Ok(()) })
        })
        .await;

        assert_eq!(summary.attempted, 4);
        assert_eq!(summary.succeeded, 3);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.heights(), vec![1, 2, 5, 8]);

        let failure = &summary.outcomes[2];
        assert!(!failure.succeeded());
        assert_eq!(failure.error_message(), Some("not found upstream"));
        assert_eq!(
            summary.failures().collect::<Vec<_>>(),
            vec![&RemediationItemError { height: 5, message: "not found upstream".to_string() }]
        );
    }

    #[tokio::test]
    async fn cap_above_length_processes_all() {
        let summary = remediate(RemediationKind::Excessive, &[4, 7], 100, always_succeeds).await;
        assert_eq!(summary.heights(), vec![4, 7]);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_outcomes_keep_input_order() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let remediator = Remediator::new(10).with_concurrency(NonZeroUsize::new(3).unwrap());
        let summary = remediator
            .run(RemediationKind::Missing, &[1, 2, 3, 4, 5, 6], |height| {
                let in_flight = Arc::clone(&in_flight);
                let peak = Arc::clone(&peak);
                async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    // later heights complete first
                    tokio::time::sleep(Duration::from_millis(100 - height * 10)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    if height == 2 {
                        Err(format!("block {height} unavailable"))
                    } else {
                        Ok(height)
                    }
                }
            })
            .await;

        assert_eq!(summary.heights(), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(summary.succeeded, 5);
        assert_eq!(summary.failed, 1);
        assert_eq!(peak.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn records_metrics_per_kind() {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();

        ::metrics::with_local_recorder(&recorder, || {
            runtime.block_on(async {
                remediate(RemediationKind::Missing, &[1, 2, 5, 8], 4, |height| {
                    future::ready(if height == 5 { Err("not found upstream") } else { Ok(()) })
                })
                .await;
                remediate(RemediationKind::Excessive, &[4], 10, always_succeeds).await;
            })
        });

        let counters = snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .filter_map(|(key, _, _, value)| {
                let DebugValue::Counter(count) = value else { return None };
                let key = key.key();
                let kind = key.labels().find(|label| label.key() == "kind")?.value().to_string();
                Some(((key.name().to_string(), kind), count))
            })
            .collect::<HashMap<_, _>>();

        let counter = |name: &str, kind: &str| counters.get(&(name.to_string(), kind.to_string()));
        assert_eq!(counter("reconcile_remediation_attempted", "missing"), Some(&4));
        assert_eq!(counter("reconcile_remediation_succeeded", "missing"), Some(&3));
        assert_eq!(counter("reconcile_remediation_failed", "missing"), Some(&1));
        assert_eq!(counter("reconcile_remediation_attempted", "excessive"), Some(&1));
        assert_eq!(counter("reconcile_remediation_failed", "excessive"), Some(&0));
    }

    #[test]
    fn summary_display() {
        let mut summary = RemediationSummary::new(RemediationKind::Excessive);
        summary.record(RemediationOutcome::success(1));
        summary.record(RemediationOutcome::failure(2, "io"));
        assert_eq!(summary.to_string(), "excessive: attempted 2, succeeded 1, failed 1");
    }
}
