//! End-to-end reconciliation of a block store.

use crate::{
    metrics::record_gaps, ConfigurationError, GapAnalyzer, ReconcileError, RedundancyHistogram,
    RemediationKind, RemediationSummary, Remediator,
};
use futures::future;
use gapsync_config::{AnalysisConfig, Config};
use gapsync_interfaces::{
    p2p::BlockFetcher,
    provider::{BlockPruner, RedundancyProvider},
};
use gapsync_primitives::{GapSet, HeightRange, RedundancyReport};
use std::num::NonZeroUsize;
use tracing::{debug, info};

/// Gap analysis of a store at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    /// The checked range.
    pub range: HeightRange,
    /// The redundancy snapshot the gaps were computed from.
    pub report: RedundancyReport,
    /// Missing and excessive heights.
    pub gaps: GapSet,
}

impl Analysis {
    /// Builds the redundancy histogram of the analyzed range.
    pub fn histogram(&self) -> RedundancyHistogram {
        RedundancyHistogram::new(self.range, &self.report)
    }
}

/// Resolves the checked range of `config`, defaulting the end to the highest stored height.
pub fn resolve_range<P: RedundancyProvider>(
    provider: &P,
    config: &AnalysisConfig,
) -> Result<HeightRange, ReconcileError> {
    let high = match config.end_height {
        Some(end) => end,
        None => provider.highest_stored_height()?.ok_or(ReconcileError::EmptyStore)?,
    };
    Ok(HeightRange::new(config.start_height, high)?)
}

/// Analyzes the store behind `provider` with the analysis settings of `config`.
///
/// Only the analysis settings are validated, so read-only callers are not affected by unusable
/// remediation settings.
pub fn analyze_store<P: RedundancyProvider>(
    provider: &P,
    config: &AnalysisConfig,
) -> Result<Analysis, ReconcileError> {
    let analyzer = GapAnalyzer::from_config(config)?;
    analyze_with(provider, &analyzer, config)
}

fn analyze_with<P: RedundancyProvider>(
    provider: &P,
    analyzer: &GapAnalyzer,
    config: &AnalysisConfig,
) -> Result<Analysis, ReconcileError> {
    let range = resolve_range(provider, config)?;
    debug!(target: "reconcile", %range, "Analyzing blocks in storage");

    let report = provider.redundancy_report(range)?;
    let gaps = analyzer.analyze(range, &report);
    record_gaps(gaps.missing.len(), gaps.excessive.len());

    let min_available = analyzer.min_available_redundancy();
    let available =
        report.within(range).iter().filter(|entry| entry.count >= min_available).count();
    info!(
        target: "reconcile",
        %range,
        available,
        missing = gaps.missing.len(),
        excessive = gaps.excessive.len(),
        "Analyze blocks complete"
    );
    Ok(Analysis { range, report, gaps })
}

/// Result of a [`Reconciler::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// The analysis remediation was driven from.
    pub analysis: Analysis,
    /// Outcome of fetching missing heights, `None` if fetching is disabled.
    pub fetched: Option<RemediationSummary>,
    /// Outcome of pruning excessive heights, `None` if pruning is disabled.
    pub pruned: Option<RemediationSummary>,
}

/// Checks a block store for missing and over-redundant heights and remediates them.
///
/// Missing heights are handed to the [`BlockFetcher`], excessive heights to the
/// [`BlockPruner`]. Each kind is capped separately by the remediation configuration.
#[derive(Debug)]
pub struct Reconciler<P, F, R> {
    provider: P,
    fetcher: F,
    pruner: R,
    config: Config,
    analyzer: GapAnalyzer,
    concurrency: NonZeroUsize,
}

impl<P, F, R> Reconciler<P, F, R>
where
    P: RedundancyProvider,
    F: BlockFetcher,
    R: BlockPruner,
{
    /// Creates a new reconciler, validating the configuration.
    pub fn new(provider: P, fetcher: F, pruner: R, config: Config) -> Result<Self, ReconcileError> {
        let analyzer = GapAnalyzer::from_config(&config.analysis)?;
        let concurrency = NonZeroUsize::new(config.remediation.concurrency)
            .ok_or(ConfigurationError::ZeroConcurrency)?;

        Ok(Self { provider, fetcher, pruner, config, analyzer, concurrency })
    }

    /// The configuration in use.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Resolves the checked range, defaulting the end to the highest stored height.
    pub fn resolve_range(&self) -> Result<HeightRange, ReconcileError> {
        resolve_range(&self.provider, &self.config.analysis)
    }

    /// Reads the redundancy report of the checked range and computes its gaps.
    pub fn analyze(&self) -> Result<Analysis, ReconcileError> {
        analyze_with(&self.provider, &self.analyzer, &self.config.analysis)
    }

    /// Fetches up to `max_fetch` missing heights of `gaps`.
    pub async fn fetch_missing(&self, gaps: &GapSet) -> RemediationSummary {
        Remediator::new(self.config.remediation.max_fetch)
            .with_concurrency(self.concurrency)
            .run(RemediationKind::Missing, &gaps.missing, |height| {
                self.fetcher.fetch_and_persist(height)
            })
            .await
    }

    /// Prunes up to `max_prune` excessive heights of `gaps` down to the target redundancy.
    pub async fn prune_excessive(&self, gaps: &GapSet) -> RemediationSummary {
        let target = self.analyzer.target_redundancy();
        Remediator::new(self.config.remediation.max_prune)
            .with_concurrency(self.concurrency)
            .run(RemediationKind::Excessive, &gaps.excessive, |height| {
                future::ready(self.pruner.prune_to_redundancy(height, target))
            })
            .await
    }

    /// Analyzes the store, then fetches missing and prunes excessive heights as configured.
    ///
    /// Range, configuration and store errors abort the run before any remediation. Failures of
    /// single heights are recorded in the returned summaries.
    pub async fn run(&self) -> Result<ReconcileOutcome, ReconcileError> {
        let analysis = self.analyze()?;

        let fetched = if self.config.remediation.fetch_missing && !analysis.gaps.missing.is_empty()
        {
            let summary = self.fetch_missing(&analysis.gaps).await;
            info!(target: "reconcile", %summary, "Fetched missing blocks");
            Some(summary)
        } else {
            None
        };

        let pruned =
            if self.config.remediation.prune_excessive && !analysis.gaps.excessive.is_empty() {
                let summary = self.prune_excessive(&analysis.gaps).await;
                info!(target: "reconcile", %summary, "Pruned excessive blocks");
                Some(summary)
            } else {
                None
            };

        Ok(ReconcileOutcome { analysis, fetched, pruned })
    }
}
