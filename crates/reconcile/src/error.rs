use gapsync_interfaces::provider::ProviderError;
use gapsync_primitives::{BlockHeight, InvalidRangeError, Redundancy};

/// Errors that abort a reconciliation run before any remediation happens.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    /// The checked range is malformed.
    #[error(transparent)]
    InvalidRange(#[from] InvalidRangeError),
    /// The analysis or remediation settings are unusable.
    #[error(transparent)]
    InvalidConfiguration(#[from] ConfigurationError),
    /// The store failed to answer a query.
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// No end height was configured and the store holds no block to derive one from.
    #[error("no end height configured and the block store is empty")]
    EmptyStore,
}

/// Unusable analysis or remediation settings.
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A target redundancy of zero would mark every stored height as excessive.
    #[error("target redundancy must be at least 1")]
    ZeroTargetRedundancy,
    /// A height with zero copies can never count as available.
    #[error("minimum available redundancy must be at least 1")]
    ZeroAvailableRedundancy,
    /// A height could be both missing and excessive.
    #[error(
        "minimum available redundancy {min_available} is above the target redundancy {target}"
    )]
    AvailableAboveTarget {
        /// Configured minimum available redundancy.
        min_available: Redundancy,
        /// Configured target redundancy.
        target: Redundancy,
    },
    /// Remediation needs at least one operation in flight.
    #[error("remediation concurrency must be at least 1")]
    ZeroConcurrency,
}

/// Failure of a single remediation operation.
///
/// Recorded in the [`RemediationSummary`](crate::RemediationSummary), never returned to the
/// caller.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error("remediation of block {height} failed: {message}")]
pub struct RemediationItemError {
    /// The height whose operation failed.
    pub height: BlockHeight,
    /// Rendered cause of the failure.
    pub message: String,
}
