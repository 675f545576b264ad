use gapsync_interfaces::provider::{
    BlockPruner, BlockWriter, ProviderError, ProviderResult, RedundancyProvider,
};
use gapsync_primitives::{
    BlockHandle, BlockHeight, HeightRange, Redundancy, RedundancyEntry, RedundancyReport,
    StoredBlock,
};
use parking_lot::RwLock;
use std::{collections::BTreeMap, sync::Arc};
use tracing::trace;

/// Block store keeping all copies in memory, indexed by height.
///
/// Cloning the store is cheap and yields a handle to the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBlockStore {
    /// Stored copies by height, in insertion order. Never holds an empty list.
    blocks: Arc<RwLock<BTreeMap<BlockHeight, Vec<StoredBlock>>>>,
}

impl InMemoryBlockStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given copies.
    pub fn from_blocks(blocks: impl IntoIterator<Item = StoredBlock>) -> Self {
        let store = Self::new();
        store.extend(blocks);
        store
    }

    /// Adds the given copies.
    pub fn extend(&self, blocks: impl IntoIterator<Item = StoredBlock>) {
        let mut map = self.blocks.write();
        for block in blocks {
            map.entry(block.height).or_default().push(block);
        }
    }

    /// Returns all stored copies of `height`.
    pub fn copies(&self, height: BlockHeight) -> Vec<StoredBlock> {
        self.blocks.read().get(&height).cloned().unwrap_or_default()
    }

    /// Returns the number of stored copies of `height`.
    pub fn redundancy(&self, height: BlockHeight) -> Redundancy {
        self.blocks.read().get(&height).map_or(0, |copies| copies.len() as Redundancy)
    }

    /// Returns every stored copy, ordered by height and then insertion.
    pub fn blocks(&self) -> Vec<StoredBlock> {
        self.blocks.read().values().flatten().cloned().collect()
    }

    /// Total number of stored copies.
    pub fn total_copies(&self) -> usize {
        self.blocks.read().values().map(Vec::len).sum()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.blocks.read().is_empty()
    }
}

impl RedundancyProvider for InMemoryBlockStore {
    fn redundancy_report(&self, range: HeightRange) -> ProviderResult<RedundancyReport> {
        let map = self.blocks.read();
        let report = map
            .range(range.low()..=range.high())
            .map(|(height, copies)| RedundancyEntry::new(*height, copies.len() as Redundancy))
            .collect::<RedundancyReport>();
        trace!(target: "storage::memory", %range, entries = report.len(), "Built redundancy report");
        Ok(report)
    }

    fn highest_stored_height(&self) -> ProviderResult<Option<BlockHeight>> {
        Ok(self.blocks.read().keys().next_back().copied())
    }
}

impl BlockPruner for InMemoryBlockStore {
    fn prune_to_redundancy(
        &self,
        height: BlockHeight,
        target: Redundancy,
    ) -> ProviderResult<usize> {
        let mut map = self.blocks.write();
        let copies = map.get_mut(&height).ok_or(ProviderError::HeightNotFound(height))?;

        let stored = copies.len() as Redundancy;
        if stored < target {
            return Err(ProviderError::InsufficientCopies { height, stored, target })
        }

        // Oldest copies are kept.
        let removed = copies.drain(target as usize..).count();
        if copies.is_empty() {
            map.remove(&height);
        }

        trace!(target: "storage::memory", height, removed, target, "Pruned block copies");
        Ok(removed)
    }
}

impl BlockWriter for InMemoryBlockStore {
    fn insert_block(&self, block: StoredBlock) -> ProviderResult<BlockHandle> {
        let handle = block.handle();
        self.blocks.write().entry(block.height).or_default().push(block);
        Ok(handle)
    }
}
