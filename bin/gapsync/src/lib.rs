//! Command line interface of gapsync.
//!
//! The binary inspects a JSON block store snapshot, reports heights without a stored copy and
//! heights stored more often than the target redundancy, and repairs both.

pub mod args;
pub mod cli;
pub mod commands;
mod prometheus_exporter;
