use crate::{BlockHeight, HeightRange, Redundancy};
use serde::{Deserialize, Serialize};

/// Number of stored copies observed for a single height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RedundancyEntry {
    /// Block height.
    pub height: BlockHeight,
    /// Number of stored copies of the block at `height`.
    pub count: Redundancy,
}

impl RedundancyEntry {
    /// Creates a new entry.
    pub const fn new(height: BlockHeight, count: Redundancy) -> Self {
        Self { height, count }
    }
}

impl From<(BlockHeight, Redundancy)> for RedundancyEntry {
    fn from((height, count): (BlockHeight, Redundancy)) -> Self {
        Self { height, count }
    }
}

/// Snapshot of per-height copy counts over a range, as returned by a storage backend.
///
/// Entries are kept sorted by ascending height with at most one entry per height. Heights that
/// do not appear in the report have no stored copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<RedundancyEntry>", into = "Vec<RedundancyEntry>")]
pub struct RedundancyReport {
    entries: Vec<RedundancyEntry>,
}

impl RedundancyReport {
    /// Creates an empty report.
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Builds a report from arbitrary entries.
    ///
    /// Entries are sorted by height. Duplicate heights are merged by summing their counts, which
    /// matches a group-by-height aggregation over stored copies.
    pub fn from_entries<I, E>(entries: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<RedundancyEntry>,
    {
        let mut entries = entries.into_iter().map(Into::into).collect::<Vec<_>>();
        entries.sort_by_key(|entry| entry.height);
        entries.dedup_by(|next, kept| {
            if next.height == kept.height {
                kept.count = kept.count.saturating_add(next.count);
                true
            } else {
                false
            }
        });
        Self { entries }
    }

    /// Returns the entries in ascending height order.
    pub fn entries(&self) -> &[RedundancyEntry] {
        &self.entries
    }

    /// Returns an iterator over the entries in ascending height order.
    pub fn iter(&self) -> std::slice::Iter<'_, RedundancyEntry> {
        self.entries.iter()
    }

    /// Returns the entries whose height falls inside `range`.
    pub fn within(&self, range: HeightRange) -> &[RedundancyEntry] {
        let start = self.entries.partition_point(|entry| entry.height < range.low());
        let end = self.entries.partition_point(|entry| entry.height <= range.high());
        &self.entries[start..end]
    }

    /// Copy count recorded for `height`, zero if the report has no entry for it.
    pub fn count(&self, height: BlockHeight) -> Redundancy {
        self.entries
            .binary_search_by_key(&height, |entry| entry.height)
            .map_or(0, |idx| self.entries[idx].count)
    }

    /// Number of entries in the report.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the report holds no entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E: Into<RedundancyEntry>> FromIterator<E> for RedundancyReport {
    fn from_iter<T: IntoIterator<Item = E>>(iter: T) -> Self {
        Self::from_entries(iter)
    }
}

impl From<Vec<RedundancyEntry>> for RedundancyReport {
    fn from(entries: Vec<RedundancyEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<RedundancyReport> for Vec<RedundancyEntry> {
    fn from(report: RedundancyReport) -> Self {
        report.entries
    }
}

impl<'a> IntoIterator for &'a RedundancyReport {
    type Item = &'a RedundancyEntry;
    type IntoIter = std::slice::Iter<'a, RedundancyEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_and_merges_duplicates() {
        let report = RedundancyReport::from_entries([(7, 1), (2, 2), (7, 3), (4, 1)]);
        assert_eq!(
            report.entries(),
            &[RedundancyEntry::new(2, 2), RedundancyEntry::new(4, 1), RedundancyEntry::new(7, 4)]
        );
    }

    #[test]
    fn count_defaults_to_zero() {
        let report: RedundancyReport = [(1, 1), (3, 5)].into_iter().collect();
        assert_eq!(report.count(1), 1);
        assert_eq!(report.count(2), 0);
        assert_eq!(report.count(3), 5);
        assert_eq!(report.count(100), 0);
    }

    #[test]
    fn within_clips_to_range() {
        let report = RedundancyReport::from_entries([(0, 1), (5, 1), (6, 2), (10, 1), (11, 4)]);
        let range = HeightRange::new(5, 10).unwrap();
        let heights = report.within(range).iter().map(|e| e.height).collect::<Vec<_>>();
        assert_eq!(heights, vec![5, 6, 10]);
    }

    #[test]
    fn deserializes_unsorted_list() {
        let report: RedundancyReport =
            serde_json::from_str(r#"[{"height":9,"count":1},{"height":3,"count":2}]"#).unwrap();
        assert_eq!(report.entries()[0], RedundancyEntry::new(3, 2));
        assert_eq!(report.len(), 2);
    }
}
