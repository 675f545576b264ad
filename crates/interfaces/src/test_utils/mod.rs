mod client;
mod fetcher;

/// Deterministic block generators.
pub mod generators;

pub use client::TestBlockClient;
pub use fetcher::TestBlockFetcher;
