//! RPC client error types.

use thiserror::Error;
use txscope_source::SourceError;

/// Errors returned by [`RpcClient`](crate::RpcClient).
#[derive(Debug, Error)]
pub enum RpcClientError {
    /// The HTTP request failed or returned a non-success status.
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The node answered with a JSON-RPC error object.
    #[error("rpc error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// Error message reported by the node.
        message: String,
    },

    /// The response body was not the expected JSON.
    #[error("failed to decode rpc response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<RpcClientError> for SourceError {
    fn from(err: RpcClientError) -> Self {
        match err {
            RpcClientError::Http(err) => Self::Transport(err.to_string()),
            RpcClientError::Rpc { code, message } => Self::Rpc { code, message },
            RpcClientError::Decode(err) => Self::Decode(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{not json").unwrap_err()
    }

    #[test]
    fn test_rpc_display() {
        let err = RpcClientError::Rpc { code: -32000, message: "header not found".to_string() };
        assert_eq!(err.to_string(), "rpc error -32000: header not found");
    }

    #[test]
    fn test_decode_display() {
        let err = RpcClientError::from(decode_error());
        assert!(err.to_string().starts_with("failed to decode rpc response"));
    }

    #[test]
    fn test_rpc_into_source_error() {
        let err = RpcClientError::Rpc { code: -32601, message: "method not found".to_string() };
        assert_eq!(
            SourceError::from(err),
            SourceError::Rpc { code: -32601, message: "method not found".to_string() }
        );
    }

    #[test]
    fn test_decode_into_source_error() {
        let err = SourceError::from(RpcClientError::from(decode_error()));
        assert!(matches!(err, SourceError::Decode(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RpcClientError>();
    }
}
