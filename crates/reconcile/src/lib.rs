//! Block completeness reconciliation.
//!
//! Given an expected contiguous range of heights and a redundancy report from a block store,
//! this crate works out which heights are missing or stored too often, and drives a capped
//! number of remediation operations against them.
//!
//! - [`GapAnalyzer`] turns a [`RedundancyReport`](gapsync_primitives::RedundancyReport) into a
//!   [`GapSet`](gapsync_primitives::GapSet).
//! - [`Remediator`] runs an operation over the first heights of a gap list, recording every
//!   outcome in a [`RemediationSummary`]. A failing height never stops the batch.
//! - [`Reconciler`] ties a store, a fetcher and a pruner together for an end-to-end run.
//! - [`RedundancyHistogram`] summarises how many heights have each copy count.

#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod analyzer;
mod error;
mod histogram;
mod metrics;
mod reconciler;
mod remediator;

pub use analyzer::{analyze, GapAnalyzer};
pub use error::{ConfigurationError, ReconcileError, RemediationItemError};
pub use histogram::RedundancyHistogram;
pub use reconciler::{analyze_store, resolve_range, Analysis, ReconcileOutcome, Reconciler};
pub use remediator::{
    remediate, RemediationKind, RemediationOutcome, RemediationSummary, Remediator,
};
