//! Estimated-owner ranges

use std::fmt;

use serde::{Deserialize, Serialize};

const BOUNDS: [(u64, u64); OwnerBucket::COUNT] = [
    (0, 0),
    (0, 20_000),
    (20_000, 50_000),
    (50_000, 100_000),
    (100_000, 200_000),
    (200_000, 500_000),
    (500_000, 1_000_000),
    (1_000_000, 2_000_000),
    (2_000_000, 5_000_000),
    (5_000_000, 10_000_000),
    (10_000_000, 20_000_000),
    (20_000_000, 50_000_000),
    (50_000_000, 100_000_000),
    (100_000_000, 200_000_000),
];

/// One of the fixed, ordered owner-estimate buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnerBucket(u8);

impl OwnerBucket {
    pub const COUNT: usize = 14;

    /// All buckets in ascending order
    pub fn all() -> impl Iterator<Item = OwnerBucket> {
        (0..Self::COUNT as u8).map(OwnerBucket)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        (index < Self::COUNT).then_some(OwnerBucket(index as u8))
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }

    pub fn bounds(&self) -> (u64, u64) {
        BOUNDS[self.index()]
    }

    /// Parse `"0 - 20000"` or `"0-20000"`
    pub fn parse(raw: &str) -> Option<Self> {
        let (low, high) = raw.split_once('-')?;
        let low = low.trim().parse::<u64>().ok()?;
        let high = high.trim().parse::<u64>().ok()?;
        BOUNDS
            .iter()
            .position(|&bounds| bounds == (low, high))
            .map(|idx| OwnerBucket(idx as u8))
    }

    /// Range as it appears in the data, e.g. `0 - 20000`
    pub fn label(&self) -> String {
        let (low, high) = self.bounds();
        format!("{} - {}", low, high)
    }

    /// Compact legend label, e.g. `20K - 50K`
    pub fn short_label(&self) -> String {
        let (low, high) = self.bounds();
        format!("{} - {}", abbreviate(low), abbreviate(high))
    }
}

impl fmt::Display for OwnerBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

fn abbreviate(value: u64) -> String {
    if value >= 1_000_000 {
        format!("{}M", value / 1_000_000)
    } else if value >= 1_000 {
        format!("{}K", value / 1_000)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_and_without_spaces() {
        assert_eq!(OwnerBucket::parse("0 - 20000"), OwnerBucket::from_index(1));
        assert_eq!(OwnerBucket::parse("0-20000"), OwnerBucket::from_index(1));
        assert_eq!(OwnerBucket::parse("0 - 0"), OwnerBucket::from_index(0));
        assert_eq!(OwnerBucket::parse("100000000 - 200000000"), OwnerBucket::from_index(13));
        assert_eq!(OwnerBucket::parse("1 - 2"), None);
        assert_eq!(OwnerBucket::parse("lots"), None);
    }

    #[test]
    fn test_buckets_are_ordered() {
        let buckets: Vec<_> = OwnerBucket::all().collect();
        assert_eq!(buckets.len(), OwnerBucket::COUNT);
        for pair in buckets.windows(2) {
            assert!(pair[0].bounds().1 <= pair[1].bounds().1);
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_labels() {
        let bucket = OwnerBucket::parse("20000 - 50000").unwrap();
        assert_eq!(bucket.label(), "20000 - 50000");
        assert_eq!(bucket.short_label(), "20K - 50K");
        assert_eq!(OwnerBucket::parse("1000000 - 2000000").unwrap().short_label(), "1M - 2M");
    }
}
