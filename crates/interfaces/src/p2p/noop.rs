use crate::p2p::{BlockFetcher, FetchError, FetchFut};
use gapsync_primitives::BlockHeight;

/// A [`BlockFetcher`] without any upstream. Every fetch fails with [`FetchError::NotFound`].
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct NoopBlockFetcher;

impl BlockFetcher for NoopBlockFetcher {
    type Output = FetchFut;

    fn fetch_and_persist(&self, height: BlockHeight) -> Self::Output {
        Box::pin(async move { Err(FetchError::NotFound(height)) })
    }
}
