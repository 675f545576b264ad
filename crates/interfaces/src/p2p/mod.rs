mod error;
mod noop;

pub use error::{FetchError, FetchResult, RequestError, RequestResult};
pub use noop::NoopBlockFetcher;

use futures::Future;
use gapsync_primitives::{BlockHandle, BlockHeight, StoredBlock};
use std::pin::Pin;

/// The block request future type.
pub type BlockFut = Pin<Box<dyn Future<Output = RequestResult<Option<StoredBlock>>> + Send>>;

/// The fetch future type.
pub type FetchFut = Pin<Box<dyn Future<Output = FetchResult<BlockHandle>> + Send>>;

/// A client capable of retrieving blocks from an upstream source.
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait BlockClient: Send + Sync {
    /// The block future type.
    type Output: Future<Output = RequestResult<Option<StoredBlock>>> + Send + Unpin;

    /// Requests the block at `height`. Resolves to `None` if the upstream does not know it.
    fn block_by_height(&self, height: BlockHeight) -> Self::Output;
}

/// Retrieves a missing block and persists it into local storage.
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait BlockFetcher: Send + Sync {
    /// The fetch future type.
    type Output: Future<Output = FetchResult<BlockHandle>> + Send + Unpin;

    /// Fetches the block at `height` from any upstream source and stores it.
    ///
    /// Fails with [`FetchError::NotFound`] when no upstream has the block.
    fn fetch_and_persist(&self, height: BlockHeight) -> Self::Output;
}
