use crate::{RemediationKind, RemediationOutcome};
use ::metrics::{counter, gauge, Counter};

/// Remediation metrics for one [`RemediationKind`].
#[derive(Debug, Clone)]
pub(crate) struct RemediationMetrics {
    /// Number of remediation operations started
    attempted: Counter,
    /// Number of remediation operations that succeeded
    succeeded: Counter,
    /// Number of remediation operations that failed
    failed: Counter,
}

impl RemediationMetrics {
    pub(crate) fn new(kind: RemediationKind) -> Self {
        let label = kind.as_str();
        Self {
            attempted: counter!("reconcile_remediation_attempted", "kind" => label),
            succeeded: counter!("reconcile_remediation_succeeded", "kind" => label),
            failed: counter!("reconcile_remediation_failed", "kind" => label),
        }
    }

    pub(crate) fn record(&self, outcome: &RemediationOutcome) {
        self.attempted.increment(1);
        if outcome.succeeded() {
            self.succeeded.increment(1)
        } else {
            self.failed.increment(1)
        }
    }
}

/// Records the size of the last computed gap set.
pub(crate) fn record_gaps(missing: usize, excessive: usize) {
    gauge!("reconcile_gaps_missing").set(missing as f64);
    gauge!("reconcile_gaps_excessive").set(excessive as f64);
}
