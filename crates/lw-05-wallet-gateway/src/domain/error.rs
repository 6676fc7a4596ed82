//! Errors returned to wallets.
//!
//! Every failure leaves the gateway as a JSON-RPC error object. The standard
//! codes cover malformed envelopes; the `-320xx` range classifies failures
//! of the block pipeline and the node behind it.

use lw_02_node_rpc::NodeRpcError;
use lw_04_block_retrieval::RetrievalError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// JSON-RPC error codes used by the wallet API.
#[allow(missing_docs)]
pub mod codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    /// Generic server-side failure.
    pub const SERVER_ERROR: i32 = -32000;
    /// Block or transaction does not exist.
    pub const RESOURCE_NOT_FOUND: i32 = -32001;
    /// Cache not ready, or height above the cached tip.
    pub const RESOURCE_UNAVAILABLE: i32 = -32002;
    /// The full node rejected the call or could not be reached.
    pub const NODE_ERROR: i32 = -32003;
    /// Part of the wallet protocol this server does not serve.
    pub const UNIMPLEMENTED: i32 = -32004;
    /// Stream or call deadline elapsed.
    pub const TIMEOUT: i32 = -32006;
}

/// Error object placed in a JSON-RPC response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    /// One of [`codes`].
    pub code: i32,
    /// Human-readable description.
    pub message: String,
    /// Extra structured detail, such as the node's own error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ApiError {
    /// Error with `code` and no data.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Error carrying a structured `data` member.
    pub fn with_data(code: i32, message: impl Into<String>, data: Value) -> Self {
        Self {
            data: Some(data),
            ..Self::new(code, message)
        }
    }

    fn prefixed(code: i32, prefix: &str, details: impl fmt::Display) -> Self {
        Self::new(code, format!("{}: {}", prefix, details))
    }

    /// Body was not valid JSON.
    pub fn parse_error(details: impl Into<String>) -> Self {
        Self::prefixed(codes::PARSE_ERROR, "malformed JSON", details.into())
    }

    /// JSON was valid but not a usable request envelope.
    pub fn invalid_request(details: impl Into<String>) -> Self {
        Self::prefixed(codes::INVALID_REQUEST, "invalid request", details.into())
    }

    /// Method name not in the wallet API.
    pub fn method_not_found(method: &str) -> Self {
        Self::prefixed(codes::METHOD_NOT_FOUND, "unknown method", method)
    }

    /// Parameters missing or of the wrong shape.
    pub fn invalid_params(details: impl Into<String>) -> Self {
        Self::prefixed(codes::INVALID_PARAMS, "invalid params", details.into())
    }

    /// Failure inside the server.
    pub fn internal(details: impl Into<String>) -> Self {
        Self::prefixed(codes::INTERNAL_ERROR, "internal error", details.into())
    }

    /// `what` names the missing block or transaction.
    pub fn resource_not_found(what: impl Into<String>) -> Self {
        Self::prefixed(codes::RESOURCE_NOT_FOUND, "not found", what.into())
    }

    /// Data exists upstream but cannot be served yet.
    pub fn resource_unavailable(details: impl Into<String>) -> Self {
        Self::new(codes::RESOURCE_UNAVAILABLE, details)
    }

    /// Recognised request this server does not answer.
    pub fn unimplemented(details: impl Into<String>) -> Self {
        Self::new(codes::UNIMPLEMENTED, details)
    }

    /// Deadline elapsed while serving `operation`.
    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::prefixed(codes::TIMEOUT, "deadline exceeded", operation.into())
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self.code {
            codes::PARSE_ERROR | codes::INVALID_REQUEST => "bad_request",
            codes::METHOD_NOT_FOUND => "method_not_found",
            codes::INVALID_PARAMS => "invalid_params",
            codes::RESOURCE_NOT_FOUND => "not_found",
            codes::RESOURCE_UNAVAILABLE => "unavailable",
            codes::NODE_ERROR => "node",
            codes::UNIMPLEMENTED => "unimplemented",
            codes::TIMEOUT => "timeout",
            _ => "internal",
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

impl std::error::Error for ApiError {}

// Conversions from subsystem error types

impl From<RetrievalError> for ApiError {
    fn from(e: RetrievalError) -> Self {
        match e {
            RetrievalError::NotReady | RetrievalError::NewerThanTip { .. } => {
                ApiError::resource_unavailable(e.to_string())
            }
            RetrievalError::NotFound { height } => {
                ApiError::resource_not_found(format!("block {}", height))
            }
            RetrievalError::DeadlineExceeded { .. } => ApiError::timeout(e.to_string()),
            RetrievalError::Source { .. } => ApiError::new(codes::NODE_ERROR, e.to_string()),
            RetrievalError::Cache(_) | RetrievalError::Config(_) => ApiError::internal(e.to_string()),
        }
    }
}

impl From<NodeRpcError> for ApiError {
    fn from(e: NodeRpcError) -> Self {
        match e {
            NodeRpcError::Rpc(failure) => ApiError::with_data(
                codes::NODE_ERROR,
                failure.to_string(),
                serde_json::json!({ "node_code": failure.code }),
            ),
            NodeRpcError::Transport(_) => ApiError::new(codes::NODE_ERROR, e.to_string()),
            other => ApiError::internal(other.to_string()),
        }
    }
}

impl From<hex::FromHexError> for ApiError {
    fn from(e: hex::FromHexError) -> Self {
        ApiError::invalid_params(format!("bad hex encoding ({})", e))
    }
}

impl From<shared_types::HexError> for ApiError {
    fn from(e: shared_types::HexError) -> Self {
        ApiError::invalid_params(e.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::parse_error(e.to_string())
    }
}

/// Result of a wallet API handler.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failures of the HTTP server itself, never sent to wallets.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Rejected configuration.
    #[error("invalid gateway config: {0}")]
    Config(String),

    /// Listener could not be bound.
    #[error("cannot bind {0}")]
    Bind(String),

    /// The server stopped with an I/O error
    #[error("server error: {0}")]
    Serve(String),
}
