//! Command that prunes over-redundant heights.

use crate::{
    args::{AnalysisArgs, RemediationArgs, StoreArgs},
    commands::{print_gap_counts, print_summary},
};
use clap::Parser;
use eyre::WrapErr;
use gapsync_config::Config;
use gapsync_interfaces::p2p::NoopBlockFetcher;
use gapsync_reconcile::Reconciler;
use tracing::info;

/// Drops copies of heights stored more often than the target redundancy and writes the store
/// back.
///
/// The oldest copies of every pruned height are kept.
#[derive(Debug, Parser)]
pub struct PruneCommand {
    #[command(flatten)]
    store: StoreArgs,

    #[command(flatten)]
    analysis: AnalysisArgs,

    #[command(flatten)]
    remediation: RemediationArgs,
}

impl PruneCommand {
    /// Execute `prune` command
    pub async fn execute(self, mut config: Config) -> eyre::Result<()> {
        self.analysis.apply(&mut config.analysis);
        self.remediation.apply_prune(&mut config.remediation);
        let store = self.store.open()?;

        let reconciler = Reconciler::new(&store, NoopBlockFetcher::default(), &store, config)?;
        let outcome = reconciler.run().await?;
        print_gap_counts(&outcome.analysis);

        let Some(summary) = outcome.pruned else {
            info!(target: "gapsync::cli", "No excessive blocks to prune");
            return Ok(())
        };

        let target = reconciler.config().analysis.target_redundancy;
        print_summary(&summary, |_| format!("pruned to {target} copies"));

        if summary.succeeded > 0 {
            store.flush().wrap_err("Could not write pruned block store")?;
            info!(target: "gapsync::cli", path = ?store.path(), "Block store written");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gapsync_interfaces::test_utils::generators::{block, redundant_copies};
    use gapsync_provider::{FileBlockStore, StoreFile};

    #[tokio::test]
    async fn prunes_to_target_and_writes_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let blocks = [block(1)]
            .into_iter()
            .chain(redundant_copies(2, 4))
            .chain(redundant_copies(3, 3))
            .collect::<Vec<_>>();
        StoreFile { blocks }.write(&path).unwrap();

        let command = PruneCommand {
            store: StoreArgs { path: path.clone() },
            analysis: AnalysisArgs { target_redundancy: Some(2), ..Default::default() },
            remediation: RemediationArgs::default(),
        };
        command.execute(Config::default()).await.unwrap();

        let store = FileBlockStore::open(&path).unwrap();
        assert_eq!(store.inner().redundancy(1), 1);
        assert_eq!(store.inner().redundancy(2), 2);
        assert_eq!(store.inner().redundancy(3), 2);
        assert_eq!(store.inner().copies(2)[1].source.as_deref(), Some("upstream-1"));
    }

    #[tokio::test]
    async fn rejects_invalid_target() {
        let dir = tempfile::tempdir().unwrap();
        let command = PruneCommand {
            store: StoreArgs { path: dir.path().join("store.json") },
            analysis: AnalysisArgs {
                to: Some(3),
                target_redundancy: Some(0),
                ..Default::default()
            },
            remediation: RemediationArgs::default(),
        };
        assert!(command.execute(Config::default()).await.is_err());
    }
}
