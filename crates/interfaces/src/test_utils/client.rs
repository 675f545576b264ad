use crate::p2p::{BlockClient, BlockFut, RequestError};
use gapsync_primitives::{BlockHeight, StoredBlock};
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

/// A test client for upstream blocks.
///
/// Serves the blocks it was seeded with and answers the configured error for failing heights.
#[derive(Debug, Default, Clone)]
pub struct TestBlockClient {
    blocks: Arc<Mutex<HashMap<BlockHeight, StoredBlock>>>,
    errors: Arc<Mutex<HashMap<BlockHeight, RequestError>>>,
    times_requested: Arc<AtomicUsize>,
}

impl TestBlockClient {
    /// Seeds the client with blocks.
    pub fn with_blocks(self, blocks: impl IntoIterator<Item = StoredBlock>) -> Self {
        self.blocks.lock().extend(blocks.into_iter().map(|block| (block.height, block)));
        self
    }

    /// Makes every request for `height` fail with `error`.
    pub fn with_error(self, height: BlockHeight, error: RequestError) -> Self {
        self.errors.lock().insert(height, error);
        self
    }

    /// Number of requests served so far.
    pub fn times_requested(&self) -> usize {
        self.times_requested.load(Ordering::Relaxed)
    }
}

impl BlockClient for TestBlockClient {
    type Output = BlockFut;

    fn block_by_height(&self, height: BlockHeight) -> Self::Output {
        self.times_requested.fetch_add(1, Ordering::Relaxed);
        let result = match self.errors.lock().get(&height) {
            Some(err) => Err(err.clone()),
            None => Ok(self.blocks.lock().get(&height).cloned()),
        };
        Box::pin(async move { result })
    }
}
