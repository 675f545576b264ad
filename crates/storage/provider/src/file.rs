use crate::InMemoryBlockStore;
use gapsync_interfaces::provider::{
    BlockPruner, BlockWriter, ProviderError, ProviderResult, RedundancyProvider,
};
use gapsync_primitives::{
    BlockHandle, BlockHeight, HeightRange, Redundancy, RedundancyReport, StoredBlock,
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// On-disk layout of a block store snapshot: one entry per stored copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreFile {
    /// Every stored copy.
    #[serde(default)]
    pub blocks: Vec<StoredBlock>,
}

impl StoreFile {
    /// Reads a snapshot from `path`.
    pub fn read(path: &Path) -> ProviderResult<Self> {
        let contents = fs::read(path).map_err(|err| ProviderError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        serde_json::from_slice(&contents).map_err(|err| ProviderError::Decode {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Writes the snapshot to `path`, replacing it atomically.
    pub fn write(&self, path: &Path) -> ProviderResult<()> {
        let io_err = |err: std::io::Error| ProviderError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        };

        let encoded = serde_json::to_vec_pretty(self).map_err(|err| ProviderError::Decode {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;

        let tmp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&tmp_path).map_err(io_err)?;
        file.write_all(&encoded).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        fs::rename(&tmp_path, path).map_err(io_err)
    }
}

/// Block store backed by a JSON snapshot file.
///
/// The snapshot is loaded into an [`InMemoryBlockStore`] on open. Changes made through
/// [`BlockPruner`] or [`BlockWriter`] stay in memory until [`FileBlockStore::flush`] is called.
#[derive(Debug, Clone)]
pub struct FileBlockStore {
    path: PathBuf,
    inner: InMemoryBlockStore,
}

impl FileBlockStore {
    /// Opens the store at `path`. A missing file is treated as an empty store.
    ///
    /// Fails if it cannot be determined whether the file exists.
    pub fn open(path: impl Into<PathBuf>) -> ProviderResult<Self> {
        let path = path.into();
        let exists = path
            .try_exists()
            .map_err(|err| ProviderError::Io { path: path.clone(), message: err.to_string() })?;
        let inner = if exists {
            InMemoryBlockStore::from_blocks(StoreFile::read(&path)?.blocks)
        } else {
            debug!(target: "storage::file", ?path, "Store file does not exist, starting empty");
            InMemoryBlockStore::new()
        };

        info!(target: "storage::file", ?path, copies = inner.total_copies(), "Opened block store");
        Ok(Self { path, inner })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The in-memory view of the store.
    pub const fn inner(&self) -> &InMemoryBlockStore {
        &self.inner
    }

    /// Writes the current contents back to the backing file.
    pub fn flush(&self) -> ProviderResult<()> {
        let file = StoreFile { blocks: self.inner.blocks() };
        file.write(&self.path)?;
        debug!(target: "storage::file", path = ?self.path, copies = file.blocks.len(), "Flushed block store");
        Ok(())
    }
}

impl RedundancyProvider for FileBlockStore {
    fn redundancy_report(&self, range: HeightRange) -> ProviderResult<RedundancyReport> {
        self.inner.redundancy_report(range)
    }

    fn highest_stored_height(&self) -> ProviderResult<Option<BlockHeight>> {
        self.inner.highest_stored_height()
    }
}

impl BlockPruner for FileBlockStore {
    fn prune_to_redundancy(
        &self,
        height: BlockHeight,
        target: Redundancy,
    ) -> ProviderResult<usize> {
        self.inner.prune_to_redundancy(height, target)
    }
}

impl BlockWriter for FileBlockStore {
    fn insert_block(&self, block: StoredBlock) -> ProviderResult<BlockHandle> {
        self.inner.insert_block(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use gapsync_interfaces::test_utils::generators::{block, block_range, redundant_copies};

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBlockStore::open(dir.path().join("blocks.json")).unwrap();
        assert!(store.inner().is_empty());
        assert_eq!(store.highest_stored_height().unwrap(), None);
    }

    #[test]
    fn flush_round_trips_copies() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blocks.json");

        let store = FileBlockStore::open(&path).unwrap();
        for block in block_range(1..=3).into_iter().chain(redundant_copies(2, 2)) {
            store.insert_block(block).unwrap();
        }
        store.flush().unwrap();

        let reopened = FileBlockStore::open(&path).unwrap();
        assert_eq!(reopened.inner().blocks(), store.inner().blocks());
        assert_eq!(reopened.inner().redundancy(2), 3);
    }

    #[test]
    fn pruning_is_persisted_on_flush() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blocks.json");
        StoreFile { blocks: redundant_copies(4, 3) }.write(&path).unwrap();

        let store = FileBlockStore::open(&path).unwrap();
        assert_eq!(store.prune_to_redundancy(4, 1).unwrap(), 2);
        assert_eq!(FileBlockStore::open(&path).unwrap().inner().redundancy(4), 3);

        store.flush().unwrap();
        assert_eq!(FileBlockStore::open(&path).unwrap().inner().redundancy(4), 1);
    }

    #[test]
    fn reads_hand_written_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blocks.json");
        let hash = block(1).hash;
        fs::write(&path, format!(r#"{{"blocks":[{{"height":1,"hash":"{hash}"}}]}}"#)).unwrap();

        let store = FileBlockStore::open(&path).unwrap();
        assert_eq!(store.inner().copies(1), vec![block(1)]);
    }

    #[test]
    fn unreadable_location_is_not_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_dir = dir.path().join("not_a_dir");
        fs::write(&not_a_dir, "").unwrap();

        assert_matches!(
            FileBlockStore::open(not_a_dir.join("blocks.json")),
            Err(ProviderError::Io { .. })
        );
    }

    #[test]
    fn rejects_malformed_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blocks.json");
        fs::write(&path, "not json").unwrap();

        assert_matches!(FileBlockStore::open(&path), Err(ProviderError::Decode { .. }));
    }
}
