use gapsync_primitives::{keccak256, BlockHeight, StoredBlock, B256};
use std::ops::RangeInclusive;

/// Returns the deterministic test hash of the block at `height`.
pub fn block_hash(height: BlockHeight) -> B256 {
    keccak256(height.to_be_bytes())
}

/// Generates the block at `height`.
pub fn block(height: BlockHeight) -> StoredBlock {
    StoredBlock::new(height, block_hash(height))
}

/// Generates one block per height of `range`.
pub fn block_range(range: RangeInclusive<BlockHeight>) -> Vec<StoredBlock> {
    range.map(block).collect()
}

/// Generates `copies` copies of the block at `height`, each labelled with a distinct source.
pub fn redundant_copies(height: BlockHeight, copies: usize) -> Vec<StoredBlock> {
    (0..copies).map(|idx| block(height).with_source(format!("upstream-{idx}"))).collect()
}
