//! Commands of the `gapsync` binary.

use gapsync_reconcile::{Analysis, RemediationSummary};

pub mod check;
pub mod missing;
pub mod prune;
pub mod redundancy;

/// Prints one line per remediated height followed by the tally.
fn print_summary(summary: &RemediationSummary, describe: impl Fn(u64) -> String) {
    for (idx, outcome) in summary.outcomes.iter().enumerate() {
        match outcome.error_message() {
            None => println!("#{} [{}] {}", idx + 1, outcome.height, describe(outcome.height)),
            Some(message) => println!("#{} [{}] failed: {message}", idx + 1, outcome.height),
        }
    }
    println!("{summary}");
}

/// Prints the checked range and the size of both gap lists.
fn print_gap_counts(analysis: &Analysis) {
    println!("Checked range {}", analysis.range);
    println!("Missing blocks: {}", analysis.gaps.missing.len());
    println!("Excessive blocks: {}", analysis.gaps.excessive.len());
}
