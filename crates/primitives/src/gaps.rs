use crate::BlockHeight;
use serde::{Deserialize, Serialize};

/// Heights that need remediation within an analyzed range.
///
/// Both lists are ascending and disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapSet {
    /// Heights with no usable stored copy.
    pub missing: Vec<BlockHeight>,
    /// Heights stored more often than the target redundancy.
    pub excessive: Vec<BlockHeight>,
}

impl GapSet {
    /// Returns `true` if there is nothing to fetch and nothing to prune.
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.excessive.is_empty()
    }
}
