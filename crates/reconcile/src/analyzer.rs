//! Gap analysis over a redundancy report.

use crate::{ConfigurationError, ReconcileError};
use gapsync_config::AnalysisConfig;
use gapsync_primitives::{BlockHeight, GapSet, HeightRange, Redundancy, RedundancyReport};
use tracing::debug;

/// Computes missing and excessive heights from a [`RedundancyReport`].
///
/// Two thresholds are kept apart:
/// - a height is *available* once it has `min_available_redundancy` copies (1 by default);
/// - a height is *excessive* once it has more than `target_redundancy` copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapAnalyzer {
    min_available_redundancy: Redundancy,
    target_redundancy: Redundancy,
}

impl GapAnalyzer {
    /// Creates an analyzer with the given target redundancy, counting any stored copy as
    /// available.
    pub const fn new(target_redundancy: Redundancy) -> Result<Self, ConfigurationError> {
        if target_redundancy == 0 {
            return Err(ConfigurationError::ZeroTargetRedundancy)
        }
        Ok(Self { min_available_redundancy: 1, target_redundancy })
    }

    /// Sets the number of copies a height needs to count as available.
    ///
    /// Must be at least 1 and at most the target redundancy, so that no height is both missing
    /// and excessive.
    pub const fn with_min_available_redundancy(
        mut self,
        min_available_redundancy: Redundancy,
    ) -> Result<Self, ConfigurationError> {
        if min_available_redundancy == 0 {
            return Err(ConfigurationError::ZeroAvailableRedundancy)
        }
        if min_available_redundancy > self.target_redundancy {
            return Err(ConfigurationError::AvailableAboveTarget {
                min_available: min_available_redundancy,
                target: self.target_redundancy,
            })
        }
        self.min_available_redundancy = min_available_redundancy;
        Ok(self)
    }

    /// Creates an analyzer with the thresholds of `config`.
    pub const fn from_config(config: &AnalysisConfig) -> Result<Self, ConfigurationError> {
        match Self::new(config.target_redundancy) {
            Ok(analyzer) => analyzer.with_min_available_redundancy(config.min_available_redundancy),
            Err(err) => Err(err),
        }
    }

    /// Copies needed to count as available.
    pub const fn min_available_redundancy(&self) -> Redundancy {
        self.min_available_redundancy
    }

    /// Copies a height should have.
    pub const fn target_redundancy(&self) -> Redundancy {
        self.target_redundancy
    }

    /// Computes the gap set of `range` for `report`.
    ///
    /// Entries outside `range` are ignored. Both output lists are ascending.
    pub fn analyze(&self, range: HeightRange, report: &RedundancyReport) -> GapSet {
        let entries = report.within(range);

        // Walk the holes between available heights instead of materializing the range.
        let mut missing = Vec::new();
        let mut next: Option<BlockHeight> = Some(range.low());
        for entry in entries.iter().filter(|entry| entry.count >= self.min_available_redundancy) {
            if let Some(from) = next {
                missing.extend(from..entry.height);
            }
            next = entry.height.checked_add(1);
        }
        if let Some(from) = next {
            if from <= range.high() {
                missing.extend(from..=range.high());
            }
        }

        let excessive = entries
            .iter()
            .filter(|entry| entry.count > self.target_redundancy)
            .map(|entry| entry.height)
            .collect::<Vec<_>>();

        debug!(
            target: "reconcile::analyzer",
            %range,
            entries = entries.len(),
            missing = missing.len(),
            excessive = excessive.len(),
            "Analyzed redundancy report"
        );

        GapSet { missing, excessive }
    }
}

/// Computes the gap set of `range`, counting any stored copy as available.
///
/// Fails with [`ConfigurationError::ZeroTargetRedundancy`] if `target_redundancy` is zero.
pub fn analyze(
    range: HeightRange,
    report: &RedundancyReport,
    target_redundancy: Redundancy,
) -> Result<GapSet, ReconcileError> {
    Ok(GapAnalyzer::new(target_redundancy)?.analyze(range, report))
}
