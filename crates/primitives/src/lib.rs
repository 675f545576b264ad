//! Commonly used types in gapsync.
//!
//! This crate contains the value types shared by the analyzer, the remediator and the storage
//! collaborators: block heights and ranges, redundancy reports, gap sets and stored blocks.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod block;
mod gaps;
mod range;
mod redundancy;

pub use block::{BlockHandle, StoredBlock};
pub use gaps::GapSet;
pub use range::{materialize, HeightRange, InvalidRangeError};
pub use redundancy::{RedundancyEntry, RedundancyReport};

pub use alloy_primitives::{keccak256, B256};

/// Position of a block in the chain.
pub type BlockHeight = u64;

/// Number of stored copies of a single block height.
pub type Redundancy = u64;
