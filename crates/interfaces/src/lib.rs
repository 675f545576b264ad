//! Collaborator bindings for gapsync.
//!
//! The reconciliation core never talks to a database or a network directly. It reads redundancy
//! reports through a [`RedundancyProvider`](provider::RedundancyProvider), fetches missing blocks
//! through a [`BlockFetcher`](p2p::BlockFetcher) and prunes surplus copies through a
//! [`BlockPruner`](provider::BlockPruner).

#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

/// Storage traits.
pub mod provider;

/// Upstream block retrieval traits.
pub mod p2p;

#[cfg(any(test, feature = "test-utils"))]
/// Common test helpers for mocking out storage, upstream clients and fetchers.
pub mod test_utils;
