//! Block source error types.

use thiserror::Error;
use txscope_primitives::BlockNumber;

/// Errors a [`BlockSource`](crate::BlockSource) can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The source cannot serve requests right now.
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// The requested block is not known to the source.
    #[error("block not found at height: {0}")]
    BlockNotFound(BlockNumber),

    /// The request could not be delivered or answered.
    #[error("transport error: {0}")]
    Transport(String),

    /// The node answered with a JSON-RPC error object.
    #[error("rpc error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// Error message reported by the node.
        message: String,
    },

    /// The response could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_display() {
        let err = SourceError::Unavailable("connection refused".to_string());
        assert_eq!(err.to_string(), "source unavailable: connection refused");
    }

    #[test]
    fn test_block_not_found_display() {
        assert_eq!(SourceError::BlockNotFound(12_345).to_string(), "block not found at height: 12345");
    }

    #[test]
    fn test_rpc_display() {
        let err = SourceError::Rpc { code: -32005, message: "limit exceeded".to_string() };
        assert_eq!(err.to_string(), "rpc error -32005: limit exceeded");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SourceError>();
    }
}
