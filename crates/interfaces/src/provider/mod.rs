mod error;

pub use error::{ProviderError, ProviderResult};

use gapsync_primitives::{
    BlockHandle, BlockHeight, HeightRange, Redundancy, RedundancyReport, StoredBlock,
};

/// Read access to the per-height copy counts of a block store.
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait RedundancyProvider: Send + Sync {
    /// Returns the number of stored copies of every height in `range` that has at least one.
    ///
    /// Equivalent to a group-by-height count over the stored blocks of the range.
    fn redundancy_report(&self, range: HeightRange) -> ProviderResult<RedundancyReport>;

    /// Returns the highest height with at least one stored copy, or `None` for an empty store.
    fn highest_stored_height(&self) -> ProviderResult<Option<BlockHeight>>;
}

/// Removes surplus copies of a stored block.
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait BlockPruner: Send + Sync {
    /// Removes copies of `height` until exactly `target` remain and returns the number of removed
    /// copies.
    ///
    /// Fails with [`ProviderError::InsufficientCopies`] if fewer than `target` copies are stored.
    fn prune_to_redundancy(&self, height: BlockHeight, target: Redundancy)
        -> ProviderResult<usize>;
}

/// Persists new block copies.
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait BlockWriter: Send + Sync {
    /// Stores one more copy of `block` and returns its handle.
    fn insert_block(&self, block: StoredBlock) -> ProviderResult<BlockHandle>;
}
