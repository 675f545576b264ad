use gapsync_primitives::{BlockHeight, Redundancy};
use std::path::PathBuf;

/// Provider result type.
pub type ProviderResult<Ok> = Result<Ok, ProviderError>;

/// Error returned by block store implementations.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The store has no copy of the requested height.
    #[error("block {0} is not stored")]
    HeightNotFound(BlockHeight),
    /// Pruning would leave fewer copies than requested.
    #[error("block {height} has {stored} stored copies, fewer than the target of {target}")]
    InsufficientCopies {
        /// The block height.
        height: BlockHeight,
        /// Copies currently stored.
        stored: Redundancy,
        /// Requested redundancy.
        target: Redundancy,
    },
    /// Reading or writing the backing file failed.
    #[error("failed to access {path:?}: {message}")]
    Io {
        /// The file that was accessed.
        path: PathBuf,
        /// The underlying error message.
        message: String,
    },
    /// The backing file could not be (de)serialized.
    #[error("failed to decode {path:?}: {message}")]
    Decode {
        /// The file that was decoded.
        path: PathBuf,
        /// The underlying error message.
        message: String,
    },
}
