//! Configuration files.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a reconciliation run.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct Config {
    /// Which heights are checked and how copies are counted.
    pub analysis: AnalysisConfig,
    /// How gaps are remediated.
    pub remediation: RemediationConfig,
}

impl Config {
    /// Loads the configuration from a TOML file, creating it with defaults if it does not exist.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, confy::ConfyError> {
        confy::load_path(path)
    }

    /// Writes the configuration to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), confy::ConfyError> {
        confy::store_path(path, self)
    }
}

/// Analysis configuration.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// First height of the checked range.
    pub start_height: u64,
    /// Last height of the checked range. Defaults to the highest stored height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_height: Option<u64>,
    /// Copies a height needs to count as available when looking for missing blocks.
    pub min_available_redundancy: u64,
    /// Copies a height should have. Heights above it are excessive.
    pub target_redundancy: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            start_height: 1,
            end_height: None,
            min_available_redundancy: 1,
            target_redundancy: 1,
        }
    }
}

/// Remediation configuration.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct RemediationConfig {
    /// Whether missing heights are fetched.
    pub fetch_missing: bool,
    /// Whether excessive heights are pruned.
    pub prune_excessive: bool,
    /// The maximum number of missing heights fetched in one run.
    pub max_fetch: usize,
    /// The maximum number of excessive heights pruned in one run.
    pub max_prune: usize,
    /// The maximum number of remediation operations in flight. `1` processes heights one by one.
    pub concurrency: usize,
}

impl Default for RemediationConfig {
    fn default() -> Self {
        Self {
            fetch_missing: true,
            prune_excessive: true,
            max_fetch: 100,
            max_prune: 100,
            concurrency: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Config;

    const EXTENSION: &str = "toml";

    fn with_tempdir(filename: &str, proc: fn(&std::path::Path)) {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join(filename).with_extension(EXTENSION);

        proc(&config_path);

        temp_dir.close().unwrap()
    }

    #[test]
    fn test_store_config() {
        with_tempdir("config-store-test", |config_path| {
            let config = Config::default();
            config.save(config_path).expect("Failed to store config");
        })
    }

    #[test]
    fn test_load_config() {
        with_tempdir("config-load-test", |config_path| {
            let config = Config::default();
            config.save(config_path).expect("Failed to store config");

            let loaded_config = Config::from_path(config_path).unwrap();

            assert_eq!(config, loaded_config);
        })
    }

    #[test]
    fn test_load_creates_default_config() {
        with_tempdir("config-missing-test", |config_path| {
            let loaded_config = Config::from_path(config_path).unwrap();
            assert_eq!(loaded_config, Config::default());
            assert!(config_path.exists());
        })
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [analysis]
            start_height = 400000
            end_height = 1428566
            target_redundancy = 2

            [remediation]
            max_prune = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.analysis.start_height, 400_000);
        assert_eq!(config.analysis.end_height, Some(1_428_566));
        assert_eq!(config.analysis.min_available_redundancy, 1);
        assert_eq!(config.analysis.target_redundancy, 2);
        assert_eq!(config.remediation.max_prune, 10);
        assert_eq!(config.remediation.max_fetch, 100);
        assert_eq!(config.remediation.concurrency, 1);
        assert!(config.remediation.fetch_missing);
    }
}
