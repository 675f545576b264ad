use gapsync_primitives::{HeightRange, Redundancy, RedundancyReport};
use std::collections::BTreeMap;

/// Number of heights per observed copy count within a range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedundancyHistogram {
    range: HeightRange,
    zero_copies: u64,
    counts: BTreeMap<Redundancy, u64>,
}

impl RedundancyHistogram {
    /// Builds the histogram of `range` from `report`. Entries outside `range` are ignored.
    pub fn new(range: HeightRange, report: &RedundancyReport) -> Self {
        let mut counts = BTreeMap::new();
        for entry in report.within(range).iter().filter(|entry| entry.count > 0) {
            *counts.entry(entry.count).or_insert(0) += 1;
        }
        let stored = counts.values().sum::<u64>();
        Self { range, zero_copies: range.len().saturating_sub(stored), counts }
    }

    /// The analyzed range.
    pub const fn range(&self) -> HeightRange {
        self.range
    }

    /// Number of heights with exactly `redundancy` copies.
    pub fn count_for(&self, redundancy: Redundancy) -> u64 {
        if redundancy == 0 {
            return self.zero_copies
        }
        self.counts.get(&redundancy).copied().unwrap_or_default()
    }

    /// Number of heights without any copy.
    pub const fn zero_copies(&self) -> u64 {
        self.zero_copies
    }

    /// Highest observed copy count, `0` if nothing is stored.
    pub fn max_redundancy(&self) -> Redundancy {
        self.counts.keys().next_back().copied().unwrap_or_default()
    }

    /// Iterates over `(copy count, number of heights)` pairs with at least one copy, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (Redundancy, u64)> + '_ {
        self.counts.iter().map(|(redundancy, heights)| (*redundancy, *heights))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_heights_per_redundancy() {
        let report =
            RedundancyReport::from_entries([(1, 1), (2, 2), (3, 1), (5, 3), (6, 2), (20, 8)]);
        let histogram = RedundancyHistogram::new(HeightRange::new(1, 10).unwrap(), &report);

        // 4, 7, 8, 9 and 10 have no copy, height 20 is outside the range
        assert_eq!(histogram.count_for(0), 5);
        assert_eq!(histogram.zero_copies(), 5);
        assert_eq!(histogram.count_for(1), 2);
        assert_eq!(histogram.count_for(2), 2);
        assert_eq!(histogram.count_for(3), 1);
        assert_eq!(histogram.count_for(8), 0);
        assert_eq!(histogram.max_redundancy(), 3);
        assert_eq!(histogram.iter().collect::<Vec<_>>(), vec![(1, 2), (2, 2), (3, 1)]);
    }

    #[test]
    fn entries_outside_range_do_not_reduce_zero_copies() {
        let report = RedundancyReport::from_entries([(0, 2), (4, 1), (11, 1), (12, 3)]);
        let histogram = RedundancyHistogram::new(HeightRange::new(3, 6).unwrap(), &report);
        assert_eq!(histogram.zero_copies(), 3);
        assert_eq!(histogram.iter().collect::<Vec<_>>(), vec![(1, 1)]);
    }

    #[test]
    fn empty_report() {
        let histogram =
            RedundancyHistogram::new(HeightRange::new(0, 9).unwrap(), &RedundancyReport::new());
        assert_eq!(histogram.zero_copies(), 10);
        assert_eq!(histogram.max_redundancy(), 0);
        assert_eq!(histogram.iter().count(), 0);
    }
}
