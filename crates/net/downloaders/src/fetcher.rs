use gapsync_interfaces::{
    p2p::{BlockClient, BlockFetcher, FetchError, FetchFut},
    provider::BlockWriter,
};
use gapsync_primitives::BlockHeight;
use std::sync::Arc;
use tracing::{debug, trace};

/// Fetches a block from an upstream [`BlockClient`] and stores it through a [`BlockWriter`].
///
/// A block the upstream does not know, or a block for another height, is rejected before
/// anything is written.
#[derive(Debug)]
pub struct PersistingFetcher<C, W> {
    client: Arc<C>,
    writer: Arc<W>,
}

impl<C, W> PersistingFetcher<C, W> {
    /// Creates a new fetcher.
    pub fn new(client: Arc<C>, writer: Arc<W>) -> Self {
        Self { client, writer }
    }
}

impl<C, W> Clone for PersistingFetcher<C, W> {
    fn clone(&self) -> Self {
        Self { client: Arc::clone(&self.client), writer: Arc::clone(&self.writer) }
    }
}

impl<C, W> BlockFetcher for PersistingFetcher<C, W>
where
    C: BlockClient + 'static,
    W: BlockWriter + 'static,
{
    type Output = FetchFut;

    fn fetch_and_persist(&self, height: BlockHeight) -> Self::Output {
        let request = self.client.block_by_height(height);
        let writer = Arc::clone(&self.writer);

        Box::pin(async move {
            trace!(target: "downloaders::fetcher", height, "Requesting block");
            let block = request.await?.ok_or(FetchError::NotFound(height))?;
            if block.height != height {
                return Err(FetchError::HeightMismatch { requested: height, received: block.height })
            }

            let handle = writer.insert_block(block)?;
            debug!(target: "downloaders::fetcher", height, hash = %handle.hash, "Persisted block");
            Ok(handle)
        })
    }
}
