//! Bounded log of recorded split times

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of split slots per run
pub const SPLIT_CAPACITY: usize = 8;

/// Elapsed time from run start to one valid crossing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SplitTime {
    elapsed_ms: u32,
}

impl SplitTime {
    pub const fn from_millis(elapsed_ms: u32) -> Self {
        Self { elapsed_ms }
    }

    pub const fn as_millis(&self) -> u32 {
        self.elapsed_ms
    }

    /// Elapsed seconds, `elapsed_ms / 1000`
    pub fn as_secs_f32(&self) -> f32 {
        self.elapsed_ms as f32 / 1000.0
    }

    pub const fn whole_secs(&self) -> u32 {
        self.elapsed_ms / 1000
    }

    pub const fn subsec_millis(&self) -> u32 {
        self.elapsed_ms % 1000
    }
}

/// The split log has no free slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SplitsFull;

/// Fixed-capacity split log in crossing order
///
/// When full, further splits are rejected and counted; the earliest
/// crossings are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitTimes<const N: usize = SPLIT_CAPACITY> {
    times: Vec<SplitTime, N>,
    overflowed: u16,
}

impl<const N: usize> Default for SplitTimes<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SplitTimes<N> {
    pub const fn new() -> Self {
        Self {
            times: Vec::new(),
            overflowed: 0,
        }
    }

    /// Append a split, returning its 1-based ordinal
    pub fn push(&mut self, split: SplitTime) -> Result<usize, SplitsFull> {
        match self.times.push(split) {
            Ok(()) => Ok(self.times.len()),
            Err(_) => {
                self.overflowed = self.overflowed.saturating_add(1);
                Err(SplitsFull)
            }
        }
    }

    /// Empty the log and the overflow count
    pub fn clear(&mut self) {
        self.times.clear();
        self.overflowed = 0;
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.times.is_full()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of valid crossings rejected because the log was full
    pub fn overflowed(&self) -> u16 {
        self.overflowed
    }

    pub fn as_slice(&self) -> &[SplitTime] {
        &self.times
    }

    pub fn iter(&self) -> impl Iterator<Item = &SplitTime> {
        self.times.iter()
    }

    /// Splits paired with their 1-based ordinal
    pub fn ordinals(&self) -> impl Iterator<Item = (usize, SplitTime)> + '_ {
        self.times.iter().copied().enumerate().map(|(i, t)| (i + 1, t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_seconds() {
        let split = SplitTime::from_millis(12_345);
        assert_eq!(split.whole_secs(), 12);
        assert_eq!(split.subsec_millis(), 345);
        assert!((split.as_secs_f32() - 12.345).abs() < 1e-4);
    }

    #[test]
    fn test_push_returns_ordinal() {
        let mut splits: SplitTimes = SplitTimes::new();
        assert_eq!(splits.push(SplitTime::from_millis(500)), Ok(1));
        assert_eq!(splits.push(SplitTime::from_millis(900)), Ok(2));
        assert_eq!(splits.len(), 2);
    }

    #[test]
    fn test_overflow_rejects_and_counts() {
        let mut splits: SplitTimes<2> = SplitTimes::new();
        splits.push(SplitTime::from_millis(1)).unwrap();
        splits.push(SplitTime::from_millis(2)).unwrap();
        assert!(splits.is_full());

        assert_eq!(splits.push(SplitTime::from_millis(3)), Err(SplitsFull));
        assert_eq!(splits.push(SplitTime::from_millis(4)), Err(SplitsFull));
        assert_eq!(splits.overflowed(), 2);
        assert_eq!(
            splits.as_slice(),
            &[SplitTime::from_millis(1), SplitTime::from_millis(2)]
        );
    }

    #[test]
    fn test_clear_resets_overflow() {
        let mut splits: SplitTimes<1> = SplitTimes::new();
        splits.push(SplitTime::from_millis(1)).unwrap();
        let _ = splits.push(SplitTime::from_millis(2));
        splits.clear();
        assert!(splits.is_empty());
        assert_eq!(splits.overflowed(), 0);
    }

    #[test]
    fn test_ordinals_start_at_one() {
        let mut splits: SplitTimes = SplitTimes::new();
        splits.push(SplitTime::from_millis(500)).unwrap();
        splits.push(SplitTime::from_millis(700)).unwrap();

        let mut ordinals = splits.ordinals();
        assert_eq!(ordinals.next(), Some((1, SplitTime::from_millis(500))));
        assert_eq!(ordinals.next(), Some((2, SplitTime::from_millis(700))));
        assert_eq!(ordinals.next(), None);
    }

    #[test]
    fn test_default_capacity() {
        let splits: SplitTimes = SplitTimes::new();
        assert_eq!(splits.capacity(), SPLIT_CAPACITY);
    }
}
