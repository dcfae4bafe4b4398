//! Inclusive block ranges.

use std::{fmt, ops::RangeInclusive};

use serde::{Deserialize, Serialize};
use txscope_primitives::BlockNumber;

use crate::WindowError;

/// A contiguous, inclusive range of block numbers. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct Window {
    start: BlockNumber,
    end: BlockNumber,
}

#[derive(Deserialize)]
struct RawWindow {
    start: BlockNumber,
    end: BlockNumber,
}

impl TryFrom<RawWindow> for Window {
    type Error = WindowError;

    fn try_from(raw: RawWindow) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl Window {
    /// Creates a window covering `start..=end`.
    pub const fn new(start: BlockNumber, end: BlockNumber) -> Result<Self, WindowError> {
        if start > end {
            return Err(WindowError::InvalidBounds { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a window holding the single block `block`.
    pub const fn single(block: BlockNumber) -> Self {
        Self { start: block, end: block }
    }

    /// Creates the window of `size` blocks whose newest block is `head`.
    ///
    /// The start saturates at genesis, and a size of zero is treated as one.
    pub const fn ending_at(head: BlockNumber, size: u64) -> Self {
        let size = if size == 0 { 1 } else { size };
        Self { start: head.saturating_sub(size - 1), end: head }
    }

    /// Oldest block of the window.
    pub const fn start(&self) -> BlockNumber {
        self.start
    }

    /// Newest block of the window.
    pub const fn end(&self) -> BlockNumber {
        self.end
    }

    /// Number of blocks in the window. Never zero.
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Returns true if `block` lies inside the window.
    pub const fn contains(&self, block: BlockNumber) -> bool {
        self.start <= block && block <= self.end
    }

    /// Returns true if every block of `other` lies inside this window.
    pub const fn contains_window(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// The window extended forward to `head`, or `None` if `head` is not newer than
    /// the current end.
    pub const fn advanced_to(&self, head: BlockNumber) -> Option<Self> {
        if head <= self.end {
            return None;
        }
        Some(Self { start: self.start, end: head })
    }

    /// The window extended `blocks` further into the past, saturating at genesis.
    ///
    /// Returns `None` when nothing would change.
    pub const fn extended_back(&self, blocks: u64) -> Option<Self> {
        if blocks == 0 || self.start == 0 {
            return None;
        }
        Some(Self { start: self.start.saturating_sub(blocks), end: self.end })
    }

    /// Block numbers of the window in ascending order.
    pub fn blocks(&self) -> RangeInclusive<BlockNumber> {
        self.start..=self.end
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn new_rejects_inverted_bounds() {
        assert_eq!(Window::new(5, 4), Err(WindowError::InvalidBounds { start: 5, end: 4 }));
        assert_eq!(Window::new(4, 4), Ok(Window::single(4)));
    }

    #[rstest]
    #[case::single(100, 1, 100)]
    #[case::several(100, 5, 96)]
    #[case::zero_is_one(100, 0, 100)]
    #[case::saturates_at_genesis(3, 10, 0)]
    #[case::genesis_head(0, 4, 0)]
    fn ending_at(#[case] head: u64, #[case] size: u64, #[case] start: u64) {
        let window = Window::ending_at(head, size);
        assert_eq!(window.start(), start);
        assert_eq!(window.end(), head);
    }

    #[test]
    fn advanced_to_only_moves_forward() {
        let window = Window::new(100, 101).unwrap();
        assert_eq!(window.advanced_to(101), None);
        assert_eq!(window.advanced_to(50), None);
        assert_eq!(window.advanced_to(104), Some(Window::new(100, 104).unwrap()));
    }

    #[rstest]
    #[case::one(100, 1, Some(99))]
    #[case::many(100, 10, Some(90))]
    #[case::saturates(3, 10, Some(0))]
    #[case::zero_blocks(100, 0, None)]
    fn extended_back(#[case] start: u64, #[case] blocks: u64, #[case] expected: Option<u64>) {
        let window = Window::new(start, 120).unwrap();
        assert_eq!(window.extended_back(blocks).map(|w| w.start()), expected);
    }

    #[test]
    fn extended_back_stops_at_genesis() {
        assert_eq!(Window::new(0, 3).unwrap().extended_back(1), None);
    }

    #[test]
    fn containment() {
        let window = Window::new(10, 20).unwrap();
        assert!(window.contains(10));
        assert!(window.contains(20));
        assert!(!window.contains(21));
        assert!(window.contains_window(&Window::new(12, 20).unwrap()));
        assert!(!window.contains_window(&Window::new(9, 20).unwrap()));
        assert_eq!(window.len(), 11);
        assert_eq!(window.blocks().count(), 11);
    }

    #[test]
    fn deserialize_validates_bounds() {
        let window: Window = serde_json::from_str(r#"{"start":3,"end":7}"#).unwrap();
        assert_eq!(window, Window::new(3, 7).unwrap());
        assert!(serde_json::from_str::<Window>(r#"{"start":8,"end":7}"#).is_err());
    }
}
