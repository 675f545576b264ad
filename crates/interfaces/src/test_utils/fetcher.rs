use crate::p2p::{BlockFetcher, FetchError, FetchFut};
use gapsync_primitives::{BlockHandle, BlockHeight};
use parking_lot::Mutex;
use std::{collections::HashMap, sync::Arc};

use super::generators::block_hash;

/// A fetcher that pretends to persist every requested block, except the configured failures.
///
/// Records the heights it was asked for in call order.
#[derive(Debug, Default, Clone)]
pub struct TestBlockFetcher {
    failures: Arc<Mutex<HashMap<BlockHeight, FetchError>>>,
    requested: Arc<Mutex<Vec<BlockHeight>>>,
}

impl TestBlockFetcher {
    /// Makes the fetch of `height` fail with `error`.
    pub fn with_failure(self, height: BlockHeight, error: FetchError) -> Self {
        self.failures.lock().insert(height, error);
        self
    }

    /// Heights requested so far, in call order.
    pub fn requested(&self) -> Vec<BlockHeight> {
        self.requested.lock().clone()
    }
}

impl BlockFetcher for TestBlockFetcher {
    type Output = FetchFut;

    fn fetch_and_persist(&self, height: BlockHeight) -> Self::Output {
        self.requested.lock().push(height);
        let result = match self.failures.lock().get(&height) {
            Some(err) => Err(err.clone()),
            None => Ok(BlockHandle { height, hash: block_hash(height) }),
        };
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::p2p::RequestError;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn records_requests_and_failures() {
        let fetcher = TestBlockFetcher::default()
            .with_failure(2, FetchError::Request(RequestError::Timeout));

        assert_matches!(fetcher.fetch_and_persist(1).await, Ok(BlockHandle { height: 1, .. }));
        assert_matches!(
            fetcher.fetch_and_persist(2).await,
            Err(FetchError::Request(RequestError::Timeout))
        );
        assert_eq!(fetcher.requested(), vec![1, 2]);
    }
}
