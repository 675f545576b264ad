use gapsync_interfaces::p2p::{BlockClient, BlockFut};
use gapsync_primitives::{BlockHeight, StoredBlock};
use gapsync_provider::StoreFile;
use std::{collections::HashMap, path::Path};
use thiserror::Error;
use tracing::trace;

/// Front-end API for fetching blocks from a store snapshot file.
///
/// The file uses the [`StoreFile`] layout. When it holds several copies of a height, the first
/// one wins.
///
/// This reads the entire file into memory, so it is not suitable for large files.
#[derive(Debug, Default)]
pub struct FileClient {
    /// The buffered blocks, by height.
    blocks: HashMap<BlockHeight, StoredBlock>,
}

/// An error that can occur when constructing a [`FileClient`].
#[derive(Debug, Error)]
pub enum FileClientError {
    /// An error occurred when opening or reading the file.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// An error occurred when decoding the snapshot.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl FileClient {
    /// Create a new file client from a file path.
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, FileClientError> {
        let path = path.as_ref();
        let contents = tokio::fs::read(path).await?;
        let file: StoreFile = serde_json::from_slice(&contents)?;

        let source = format!("file:{}", path.display());
        let client = Self::from_blocks(file.blocks.into_iter().map(|mut block| {
            block.source.get_or_insert_with(|| source.clone());
            block
        }));

        trace!(target: "downloaders::file", blocks = client.len(), "Initialized file client");
        Ok(client)
    }

    /// Creates a client serving the given blocks.
    pub fn from_blocks(blocks: impl IntoIterator<Item = StoredBlock>) -> Self {
        let mut map = HashMap::new();
        for block in blocks {
            map.entry(block.height).or_insert(block);
        }
        Self { blocks: map }
    }

    /// Number of distinct heights the client can serve.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if the client has no block.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl BlockClient for FileClient {
    type Output = BlockFut;

    fn block_by_height(&self, height: BlockHeight) -> Self::Output {
        // this just searches the buffer
        let block = self.blocks.get(&height).cloned();
        trace!(target: "downloaders::file", height, found = block.is_some(), "Getting block");
        Box::pin(async move { Ok(block) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use gapsync_interfaces::test_utils::generators::{block, block_range};

    #[tokio::test]
    async fn serves_blocks_from_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upstream.json");
        let mut blocks = block_range(1..=4);
        blocks.push(block(2).with_source("archive"));
        StoreFile { blocks }.write(&path).unwrap();

        let client = FileClient::new(&path).await.unwrap();
        assert_eq!(client.len(), 4);

        let served = client.block_by_height(2).await.unwrap().unwrap();
        assert_eq!(served.hash, block(2).hash);
        assert_eq!(served.source, Some(format!("file:{}", path.display())));

        assert_matches!(client.block_by_height(9).await, Ok(None));
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert_matches!(
            FileClient::new(dir.path().join("nope.json")).await,
            Err(FileClientError::Io(_))
        );
    }
}
