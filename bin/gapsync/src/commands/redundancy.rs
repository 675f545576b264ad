//! Command that prints the redundancy histogram of a block store.

use crate::args::{AnalysisArgs, StoreArgs};
use clap::Parser;
use gapsync_config::Config;
use gapsync_reconcile::analyze_store;

/// Prints how many heights are stored exactly once, twice and so on.
#[derive(Debug, Parser)]
pub struct RedundancyCommand {
    #[command(flatten)]
    store: StoreArgs,

    #[command(flatten)]
    analysis: AnalysisArgs,

    /// Highest copy count to print.
    #[arg(long, value_name = "COPIES", default_value_t = 10)]
    max_count: u64,
}

impl RedundancyCommand {
    /// Execute `redundancy` command
    pub fn execute(self, mut config: Config) -> eyre::Result<()> {
        self.analysis.apply(&mut config.analysis);
        let store = self.store.open()?;

        let histogram = analyze_store(&store, &config.analysis)?.histogram();

        for redundancy in 1..=self.max_count {
            println!(
                "Count on blocks with redundancy of [{redundancy}]: {}",
                histogram.count_for(redundancy)
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gapsync_reconcile::ReconcileError;

    fn command(path: std::path::PathBuf, to: Option<u64>) -> RedundancyCommand {
        RedundancyCommand {
            store: StoreArgs { path },
            analysis: AnalysisArgs { to, ..Default::default() },
            max_count: 3,
        }
    }

    #[test]
    fn prints_histogram_of_empty_store_with_end_height() {
        let dir = tempfile::tempdir().unwrap();
        command(dir.path().join("store.json"), Some(5)).execute(Config::default()).unwrap();
    }

    #[test]
    fn empty_store_needs_end_height() {
        let dir = tempfile::tempdir().unwrap();
        let err = command(dir.path().join("store.json"), None)
            .execute(Config::default())
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<ReconcileError>(), Some(ReconcileError::EmptyStore)));
    }
}
