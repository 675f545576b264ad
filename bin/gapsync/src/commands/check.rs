//! Command that reports gaps of a block store.

use crate::{
    args::{AnalysisArgs, StoreArgs},
    commands::print_gap_counts,
};
use clap::Parser;
use gapsync_config::Config;
use gapsync_reconcile::analyze_store;

/// Reports missing and excessive heights and the redundancy histogram of a block store.
#[derive(Debug, Parser)]
pub struct CheckCommand {
    #[command(flatten)]
    store: StoreArgs,

    #[command(flatten)]
    analysis: AnalysisArgs,
}

impl CheckCommand {
    /// Execute `check` command
    pub fn execute(self, mut config: Config) -> eyre::Result<()> {
        self.analysis.apply(&mut config.analysis);
        let store = self.store.open()?;

        let analysis = analyze_store(&store, &config.analysis)?;

        print_gap_counts(&analysis);
        let histogram = analysis.histogram();
        println!("Count on blocks with redundancy of [0]: {}", histogram.zero_copies());
        for (redundancy, heights) in histogram.iter() {
            println!("Count on blocks with redundancy of [{redundancy}]: {heights}");
        }
        Ok(())
    }
}
