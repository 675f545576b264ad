use crate::BlockHeight;
use std::{fmt, ops::RangeInclusive};

/// Error returned when a height range is constructed with bounds in the wrong order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid height range: low bound {low} is above high bound {high}")]
pub struct InvalidRangeError {
    /// The requested lower bound.
    pub low: BlockHeight,
    /// The requested upper bound.
    pub high: BlockHeight,
}

/// Inclusive, contiguous span of block heights to verify.
///
/// A range always holds at least one height. It is created fresh for every reconciliation run
/// and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeightRange {
    low: BlockHeight,
    high: BlockHeight,
}

impl HeightRange {
    /// Creates a new range over `[low, high]`.
    pub const fn new(low: BlockHeight, high: BlockHeight) -> Result<Self, InvalidRangeError> {
        if low > high {
            return Err(InvalidRangeError { low, high })
        }
        Ok(Self { low, high })
    }

    /// Creates a range covering a single height.
    pub const fn single(height: BlockHeight) -> Self {
        Self { low: height, high: height }
    }

    /// Lowest height of the range.
    pub const fn low(&self) -> BlockHeight {
        self.low
    }

    /// Highest height of the range.
    pub const fn high(&self) -> BlockHeight {
        self.high
    }

    /// Number of heights in the range.
    ///
    /// Saturates at [`u64::MAX`] for the full `[0, u64::MAX]` span.
    pub const fn len(&self) -> u64 {
        (self.high - self.low).saturating_add(1)
    }

    /// A range is never empty. Present for API symmetry with [`Self::len`].
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Returns `true` if `height` lies within the range.
    pub const fn contains(&self, height: BlockHeight) -> bool {
        self.low <= height && height <= self.high
    }

    /// Lazy ascending iterator over every height of the range.
    ///
    /// The iterator is finite and can be restarted by calling this method again, so large ranges
    /// are never realised in memory.
    pub const fn iter(&self) -> RangeInclusive<BlockHeight> {
        self.low..=self.high
    }
}

impl IntoIterator for HeightRange {
    type Item = BlockHeight;
    type IntoIter = RangeInclusive<BlockHeight>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<HeightRange> for RangeInclusive<BlockHeight> {
    fn from(range: HeightRange) -> Self {
        range.iter()
    }
}

impl TryFrom<RangeInclusive<BlockHeight>> for HeightRange {
    type Error = InvalidRangeError;

    fn try_from(range: RangeInclusive<BlockHeight>) -> Result<Self, Self::Error> {
        Self::new(*range.start(), *range.end())
    }
}

impl fmt::Display for HeightRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}

/// Produces every height in `[low, high]` in ascending order.
///
/// The returned sequence is lazy. Callers that only need set-difference semantics can stream it
/// without allocating the whole range.
pub fn materialize(
    low: BlockHeight,
    high: BlockHeight,
) -> Result<RangeInclusive<BlockHeight>, InvalidRangeError> {
    HeightRange::new(low, high).map(|range| range.iter())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn materializes_inclusive_range() {
        let heights = materialize(3, 7).unwrap().collect::<Vec<_>>();
        assert_eq!(heights, vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn single_height_range() {
        assert_eq!(materialize(5, 5).unwrap().collect::<Vec<_>>(), vec![5]);
        assert_eq!(HeightRange::single(5).len(), 1);
    }

    #[test]
    fn rejects_reversed_bounds() {
        assert_matches!(materialize(10, 9), Err(InvalidRangeError { low: 10, high: 9 }));
        assert_matches!(HeightRange::try_from(4..=1), Err(InvalidRangeError { low: 4, high: 1 }));
    }

    #[test]
    fn large_range_is_lazy_and_restartable() {
        let range = HeightRange::new(1, 3_000_000).unwrap();
        assert_eq!(range.len(), 3_000_000);
        assert_eq!(range.iter().nth(2_999_999), Some(3_000_000));
        assert_eq!(range.iter().next(), Some(1));
    }

    #[test]
    fn full_span_length_saturates() {
        let range = HeightRange::new(0, u64::MAX).unwrap();
        assert_eq!(range.len(), u64::MAX);
        assert!(range.contains(0));
        assert!(range.contains(u64::MAX));
    }

    #[test]
    fn display() {
        assert_eq!(HeightRange::new(1, 10).unwrap().to_string(), "[1, 10]");
    }
}
