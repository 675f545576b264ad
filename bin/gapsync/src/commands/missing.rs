//! Command that lists and fetches missing heights.

use crate::{
    args::{AnalysisArgs, RemediationArgs, StoreArgs},
    commands::{print_gap_counts, print_summary},
};
use clap::Parser;
use eyre::WrapErr;
use gapsync_config::Config;
use gapsync_downloaders::{FileClient, PersistingFetcher};
use gapsync_reconcile::{analyze_store, Reconciler};
use std::{path::PathBuf, sync::Arc};
use tracing::info;

/// Lists heights without a stored copy and optionally fetches them from an upstream snapshot.
#[derive(Debug, Parser)]
pub struct MissingCommand {
    #[command(flatten)]
    store: StoreArgs,

    #[command(flatten)]
    analysis: AnalysisArgs,

    #[command(flatten)]
    remediation: RemediationArgs,

    /// Block store snapshot to fetch missing blocks from.
    ///
    /// Without it, missing heights are only listed.
    #[arg(long, value_name = "FILE")]
    upstream: Option<PathBuf>,
}

impl MissingCommand {
    /// Execute `missing` command
    pub async fn execute(self, mut config: Config) -> eyre::Result<()> {
        self.analysis.apply(&mut config.analysis);
        self.remediation.apply_fetch(&mut config.remediation);
        let store = Arc::new(self.store.open()?);

        let Some(upstream) = &self.upstream else {
            let analysis = analyze_store(&store, &config.analysis)?;
            print_gap_counts(&analysis);
            for (idx, height) in analysis.gaps.missing.iter().enumerate() {
                println!("#{} [{height}]", idx + 1);
            }
            return Ok(())
        };

        info!(target: "gapsync::cli", path = ?upstream, "Loading upstream blocks");
        let client = FileClient::new(upstream)
            .await
            .wrap_err_with(|| format!("Could not read upstream {}", upstream.display()))?;
        info!(target: "gapsync::cli", blocks = client.len(), "Upstream blocks loaded");

        let fetcher = PersistingFetcher::new(Arc::new(client), Arc::clone(&store));
        let reconciler = Reconciler::new(Arc::clone(&store), fetcher, Arc::clone(&store), config)?;
        let outcome = reconciler.run().await?;
        print_gap_counts(&outcome.analysis);

        let Some(summary) = outcome.fetched else {
            info!(target: "gapsync::cli", "No missing blocks to fetch");
            return Ok(())
        };

        print_summary(&summary, |height| {
            store
                .inner()
                .copies(height)
                .last()
                .map_or_else(String::new, |block| block.hash.to_string())
        });

        if summary.succeeded > 0 {
            store.flush().wrap_err("Could not write synced block store")?;
            info!(target: "gapsync::cli", path = ?store.path(), "Block store written");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gapsync_interfaces::test_utils::generators::{block, block_range, redundant_copies};
    use gapsync_provider::{FileBlockStore, StoreFile};

    #[tokio::test]
    async fn fetches_capped_missing_blocks_into_store() {
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("store.json");
        let upstream_path = dir.path().join("upstream.json");
        StoreFile { blocks: [1, 2, 5, 7].map(block).to_vec() }.write(&store_path).unwrap();
        StoreFile { blocks: block_range(1..=10) }.write(&upstream_path).unwrap();

        let command = MissingCommand {
            store: StoreArgs { path: store_path.clone() },
            analysis: AnalysisArgs { to: Some(10), ..Default::default() },
            remediation: RemediationArgs { max: Some(3), concurrency: None },
            upstream: Some(upstream_path),
        };
        command.execute(Config::default()).await.unwrap();

        let store = FileBlockStore::open(&store_path).unwrap();
        let heights = store.inner().blocks().iter().map(|block| block.height).collect::<Vec<_>>();
        assert_eq!(heights, vec![1, 2, 3, 4, 5, 6, 7]);
        assert!(store.inner().copies(3)[0].source.as_deref().unwrap().starts_with("file:"));
    }

    #[tokio::test]
    async fn listing_leaves_store_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("store.json");
        let blocks = [block(1)].into_iter().chain(redundant_copies(3, 2)).collect::<Vec<_>>();
        StoreFile { blocks: blocks.clone() }.write(&store_path).unwrap();

        let command = MissingCommand {
            store: StoreArgs { path: store_path.clone() },
            analysis: AnalysisArgs::default(),
            remediation: RemediationArgs::default(),
            upstream: None,
        };
        command.execute(Config::default()).await.unwrap();

        assert_eq!(StoreFile::read(&store_path).unwrap().blocks, blocks);
    }
}
