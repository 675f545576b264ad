//! Implements the fetch side of block remediation.

#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

/// A fetcher that retrieves a block from an upstream client and persists it.
pub mod fetcher;

/// Upstream client serving blocks from a store snapshot file.
pub mod file_client;

pub use fetcher::PersistingFetcher;
pub use file_client::{FileClient, FileClientError};
