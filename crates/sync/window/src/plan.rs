//! Fetch deltas between two windows.

use std::ops::RangeInclusive;

use txscope_primitives::BlockNumber;

use crate::{Window, WindowError};

/// The blocks that must be fetched to grow the represented window into a larger one.
///
/// Newer blocks are fetched in ascending order and go in front of the existing
/// transactions; older blocks are fetched in descending order and go behind them.
/// On the first sync nothing is represented yet, so the whole window counts as
/// older and is fetched from the head downwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    newer: Option<RangeInclusive<BlockNumber>>,
    older: Option<RangeInclusive<BlockNumber>>,
}

impl FetchPlan {
    /// Computes the plan moving from `previous` (if any) to `next`.
    pub fn between(previous: Option<Window>, next: Window) -> Result<Self, WindowError> {
        let Some(previous) = previous else {
            return Ok(Self { newer: None, older: Some(next.blocks()) });
        };
        if !next.contains_window(&previous) {
            return Err(WindowError::Shrunk { previous, next });
        }

        let newer = (next.end() > previous.end()).then(|| previous.end() + 1..=next.end());
        let older = (next.start() < previous.start()).then(|| next.start()..=previous.start() - 1);
        Ok(Self { newer, older })
    }

    /// Blocks newer than the previous window, ascending.
    pub fn newer(&self) -> impl Iterator<Item = BlockNumber> + use<> {
        self.newer.clone().into_iter().flatten()
    }

    /// Blocks older than the previous window, descending.
    pub fn older(&self) -> impl Iterator<Item = BlockNumber> + use<> {
        self.older.clone().map(Iterator::rev).into_iter().flatten()
    }

    /// Every block of the plan in fetch order: newer ones first, then older ones.
    pub fn blocks(&self) -> impl Iterator<Item = BlockNumber> + use<> {
        self.newer().chain(self.older())
    }

    /// Number of blocks the plan fetches.
    pub fn len(&self) -> u64 {
        let count = |range: &Option<RangeInclusive<BlockNumber>>| {
            range.as_ref().map_or(0, |r| r.end() - r.start() + 1)
        };
        count(&self.newer) + count(&self.older)
    }

    /// Returns true if the plan fetches nothing.
    pub const fn is_empty(&self) -> bool {
        self.newer.is_none() && self.older.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: u64, end: u64) -> Window {
        Window::new(start, end).unwrap()
    }

    #[test]
    fn first_sync_fetches_whole_window_from_head() {
        let plan = FetchPlan::between(None, window(97, 100)).unwrap();
        assert_eq!(plan.blocks().collect::<Vec<_>>(), vec![100, 99, 98, 97]);
        assert_eq!(plan.newer().count(), 0);
        assert_eq!(plan.len(), 4);
    }

    #[test]
    fn head_advance_fetches_newer_ascending() {
        let plan = FetchPlan::between(Some(window(100, 100)), window(100, 103)).unwrap();
        assert_eq!(plan.newer().collect::<Vec<_>>(), vec![101, 102, 103]);
        assert_eq!(plan.older().count(), 0);
    }

    #[test]
    fn load_more_fetches_older_descending() {
        let plan = FetchPlan::between(Some(window(100, 101)), window(97, 101)).unwrap();
        assert_eq!(plan.older().collect::<Vec<_>>(), vec![99, 98, 97]);
        assert_eq!(plan.newer().count(), 0);
    }

    #[test]
    fn both_directions_fetch_newer_first() {
        let plan = FetchPlan::between(Some(window(50, 60)), window(48, 62)).unwrap();
        assert_eq!(plan.blocks().collect::<Vec<_>>(), vec![61, 62, 49, 48]);
        assert_eq!(plan.len(), 4);
    }

    #[test]
    fn same_window_is_empty() {
        let plan = FetchPlan::between(Some(window(10, 20)), window(10, 20)).unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.len(), 0);
        assert_eq!(plan.blocks().count(), 0);
    }

    #[test]
    fn shrinking_is_rejected() {
        let err = FetchPlan::between(Some(window(10, 20)), window(11, 25)).unwrap_err();
        assert_eq!(err, WindowError::Shrunk { previous: window(10, 20), next: window(11, 25) });
    }

    #[test]
    fn older_range_reaches_genesis() {
        let plan = FetchPlan::between(Some(window(2, 5)), window(0, 5)).unwrap();
        assert_eq!(plan.older().collect::<Vec<_>>(), vec![1, 0]);
    }
}
