//! # RPC Failures
//!
//! zcashd reports errors as a numeric code plus a message. They surface here
//! in the `"<code>: <message>"` form regardless of how the transport carried
//! them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::NodeRpcError;

/// zcashd RPC error codes this server distinguishes.
pub mod codes {
    /// Catch-all for errors without a parseable code.
    pub const MISC_ERROR: i64 = -1;
    /// Unknown transaction, address or key.
    pub const INVALID_ADDRESS_OR_KEY: i64 = -5;
    /// Invalid parameter. `getblock` uses it for heights beyond the tip.
    pub const INVALID_PARAMETER: i64 = -8;
    /// Transaction rejected by mempool policy or consensus.
    pub const VERIFY_REJECTED: i64 = -26;
    /// Transaction already in the chain.
    pub const VERIFY_ALREADY_IN_CHAIN: i64 = -27;
    /// Node still loading.
    pub const IN_WARMUP: i64 = -28;
}

/// An error returned by the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcFailure {
    /// Node error code
    pub code: i64,
    /// Node error message
    pub message: String,
}

impl RpcFailure {
    /// Build a failure from its parts.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Parse `"<code>: <message>"`, falling back to [`codes::MISC_ERROR`] with
    /// the whole text as message when no code can be read.
    pub fn from_raw(raw: &str) -> Self {
        raw.parse()
            .unwrap_or_else(|_| Self::new(codes::MISC_ERROR, raw.trim()))
    }

    /// The requested height has not been mined yet.
    pub fn is_not_yet_available(&self) -> bool {
        self.code == codes::INVALID_PARAMETER
    }

    /// The requested object does not exist on the node.
    pub fn is_not_found(&self) -> bool {
        self.code == codes::INVALID_ADDRESS_OR_KEY
    }
}

impl fmt::Display for RpcFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl FromStr for RpcFailure {
    type Err = NodeRpcError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (code, message) = raw
            .split_once(':')
            .ok_or_else(|| NodeRpcError::Decode(format!("rpc error without code: {}", raw)))?;
        let code = code
            .trim()
            .parse::<i64>()
            .map_err(|e| NodeRpcError::Decode(format!("rpc error code {:?}: {}", code, e)))?;
        Ok(Self::new(code, message.trim()))
    }
}
