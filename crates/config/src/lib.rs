//! Standalone crate for gapsync configuration types.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod config;
pub use config::{AnalysisConfig, Config, RemediationConfig};
