use crate::provider::ProviderError;
use gapsync_primitives::BlockHeight;

/// Result alias for result of an upstream request.
pub type RequestResult<T> = Result<T, RequestError>;

/// Result alias for a fetch-and-persist attempt.
pub type FetchResult<T> = Result<T, FetchError>;

/// Error variants that can happen when sending requests to an upstream source.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The upstream did not answer in time.
    #[error("timeout while awaiting response")]
    Timeout,
    /// The connection to the upstream dropped.
    #[error("connection to upstream dropped")]
    ConnectionDropped,
}

/// Error variants of a fetch-and-persist attempt.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// No upstream could provide the block.
    #[error("block {0} not found upstream")]
    NotFound(BlockHeight),
    /// The upstream returned a block for another height.
    #[error("requested block {requested}, received block {received}")]
    HeightMismatch {
        /// Requested height.
        requested: BlockHeight,
        /// Height of the returned block.
        received: BlockHeight,
    },
    /// The upstream request failed.
    #[error(transparent)]
    Request(#[from] RequestError),
    /// The block could not be persisted.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
