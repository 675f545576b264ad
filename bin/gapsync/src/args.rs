//! Arguments shared between commands.

use clap::Args;
use eyre::WrapErr;
use gapsync_config::{AnalysisConfig, RemediationConfig};
use gapsync_provider::FileBlockStore;
use std::path::PathBuf;
use tracing::info;

/// Location of the block store.
#[derive(Debug, Clone, Args)]
pub struct StoreArgs {
    /// Path to the JSON block store snapshot.
    ///
    /// A missing file is treated as an empty store.
    #[arg(long = "store", value_name = "FILE")]
    pub path: PathBuf,
}

impl StoreArgs {
    /// Opens the block store.
    pub fn open(&self) -> eyre::Result<FileBlockStore> {
        let store = FileBlockStore::open(&self.path)
            .wrap_err_with(|| format!("Could not open block store {}", self.path.display()))?;
        info!(target: "gapsync::cli", path = ?self.path, "Block store opened");
        Ok(store)
    }
}

/// Overrides of the `[analysis]` configuration section.
#[derive(Debug, Clone, Default, Args)]
#[command(next_help_heading = "Analysis")]
pub struct AnalysisArgs {
    /// First height of the checked range.
    #[arg(long = "from", value_name = "HEIGHT")]
    pub from: Option<u64>,

    /// Last height of the checked range.
    ///
    /// Defaults to the highest stored height.
    #[arg(long = "to", value_name = "HEIGHT")]
    pub to: Option<u64>,

    /// Number of copies every height should have. Heights stored more often are excessive.
    #[arg(long, value_name = "COPIES")]
    pub target_redundancy: Option<u64>,

    /// Number of copies a height needs to not count as missing.
    #[arg(long, value_name = "COPIES")]
    pub min_available_redundancy: Option<u64>,
}

impl AnalysisArgs {
    /// Applies the given flags on top of `config`.
    pub fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(from) = self.from {
            config.start_height = from;
        }
        if let Some(to) = self.to {
            config.end_height = Some(to);
        }
        if let Some(target) = self.target_redundancy {
            config.target_redundancy = target;
        }
        if let Some(min_available) = self.min_available_redundancy {
            config.min_available_redundancy = min_available;
        }
    }
}

/// Overrides of the `[remediation]` configuration section.
#[derive(Debug, Clone, Default, Args)]
#[command(next_help_heading = "Remediation")]
pub struct RemediationArgs {
    /// Maximum number of heights remediated in this run.
    #[arg(long, value_name = "N")]
    pub max: Option<usize>,

    /// Maximum number of remediation operations in flight.
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,
}

impl RemediationArgs {
    /// Applies the concurrency flag on top of `config`.
    fn apply_concurrency(&self, config: &mut RemediationConfig) {
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
    }

    /// Configures a fetch-only run.
    pub fn apply_fetch(&self, config: &mut RemediationConfig) {
        self.apply_concurrency(config);
        if let Some(max) = self.max {
            config.max_fetch = max;
        }
        config.prune_excessive = false;
    }

    /// Configures a prune-only run.
    pub fn apply_prune(&self, config: &mut RemediationConfig) {
        self.apply_concurrency(config);
        if let Some(max) = self.max {
            config.max_prune = max;
        }
        config.fetch_missing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct CommandParser<T: Args> {
        #[command(flatten)]
        args: T,
    }

    #[test]
    fn analysis_flags_override_config() {
        let args = CommandParser::<AnalysisArgs>::parse_from([
            "gapsync",
            "--from",
            "5",
            "--to",
            "20",
            "--target-redundancy",
            "3",
        ])
        .args;

        let mut config = AnalysisConfig::default();
        args.apply(&mut config);
        assert_eq!(config.start_height, 5);
        assert_eq!(config.end_height, Some(20));
        assert_eq!(config.target_redundancy, 3);
        assert_eq!(config.min_available_redundancy, 1);
    }

    #[test]
    fn absent_flags_keep_config() {
        let config = AnalysisConfig { start_height: 7, end_height: Some(9), ..Default::default() };
        let mut applied = config;
        AnalysisArgs::default().apply(&mut applied);
        assert_eq!(applied, config);
    }

    #[test]
    fn remediation_caps_apply_to_their_kind() {
        let args = RemediationArgs { max: Some(3), concurrency: Some(4) };

        let mut fetch = RemediationConfig::default();
        args.apply_fetch(&mut fetch);
        assert_eq!((fetch.max_fetch, fetch.max_prune, fetch.concurrency), (3, 100, 4));
        assert!(fetch.fetch_missing && !fetch.prune_excessive);

        let mut prune = RemediationConfig::default();
        args.apply_prune(&mut prune);
        assert_eq!((prune.max_fetch, prune.max_prune), (100, 3));
        assert!(!prune.fetch_missing && prune.prune_excessive);
    }
}
