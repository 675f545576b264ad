use crate::{BlockHeight, B256};
use serde::{Deserialize, Serialize};

/// A single stored copy of a block.
///
/// A storage backend may hold several copies of the same height, for example one per upstream
/// node the block was retrieved from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoredBlock {
    /// Block height.
    pub height: BlockHeight,
    /// Block hash.
    pub hash: B256,
    /// Where this copy came from, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl StoredBlock {
    /// Creates a new copy without a source label.
    pub const fn new(height: BlockHeight, hash: B256) -> Self {
        Self { height, hash, source: None }
    }

    /// Sets the source label of this copy.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the handle identifying this block.
    pub const fn handle(&self) -> BlockHandle {
        BlockHandle { height: self.height, hash: self.hash }
    }
}

/// Height and hash of a block that was persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockHandle {
    /// Block height.
    pub height: BlockHeight,
    /// Block hash.
    pub hash: B256,
}
