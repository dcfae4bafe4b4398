//! Error types for window bookkeeping.

use thiserror::Error;
use txscope_primitives::BlockNumber;

use crate::Window;

/// Errors that can occur while moving a window or merging fetched blocks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    /// Window bounds are inverted.
    #[error("invalid window bounds: start {start} > end {end}")]
    InvalidBounds {
        /// Lowest block of the window.
        start: BlockNumber,
        /// Highest block of the window.
        end: BlockNumber,
    },

    /// The next window does not contain the previous one.
    #[error("window {next} does not contain {previous}")]
    Shrunk {
        /// Window currently represented.
        previous: Window,
        /// Window that was requested.
        next: Window,
    },

    /// A fetched block does not sit directly next to the represented range.
    #[error("non-contiguous block: expected {expected}, got {got}")]
    NonContiguous {
        /// Block number that would keep the range contiguous.
        expected: BlockNumber,
        /// Block number that was supplied.
        got: BlockNumber,
    },

    /// An older block was supplied although the range already starts at genesis.
    #[error("block {0} extends the window past genesis")]
    PastGenesis(BlockNumber),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_bounds_display() {
        let err = WindowError::InvalidBounds { start: 10, end: 5 };
        assert_eq!(err.to_string(), "invalid window bounds: start 10 > end 5");
    }

    #[test]
    fn test_shrunk_display() {
        let previous = Window::new(99, 101).unwrap();
        let next = Window::new(100, 101).unwrap();
        let err = WindowError::Shrunk { previous, next };
        assert_eq!(err.to_string(), "window 100..=101 does not contain 99..=101");
    }

    #[test]
    fn test_non_contiguous_display() {
        let err = WindowError::NonContiguous { expected: 102, got: 104 };
        assert_eq!(err.to_string(), "non-contiguous block: expected 102, got 104");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WindowError>();
    }
}
