//! # Domain Errors

use shared_types::{BlockHeight, SourceError};
use thiserror::Error;

use super::rpc_error::RpcFailure;

/// Node RPC error types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NodeRpcError {
    /// The HTTP exchange with the node failed.
    #[error("node transport error: {0}")]
    Transport(String),

    /// The node returned an RPC error.
    #[error("node error {0}")]
    Rpc(RpcFailure),

    /// The node's response did not have the expected shape.
    #[error("malformed node response: {0}")]
    Decode(String),

    /// Raw block bytes did not parse.
    #[error("block {height} failed to parse: {source}")]
    Parse {
        /// Height that was requested
        height: BlockHeight,
        /// Parser diagnostic
        #[source]
        source: ParseError,
    },

    /// Client configuration is unusable.
    #[error("invalid node configuration: {0}")]
    Config(String),
}

impl NodeRpcError {
    /// The node rejected the call with a code meaning "not mined yet".
    pub fn is_not_yet_available(&self) -> bool {
        matches!(self, NodeRpcError::Rpc(failure) if failure.is_not_yet_available())
    }
}

impl From<NodeRpcError> for SourceError {
    fn from(err: NodeRpcError) -> Self {
        match err {
            NodeRpcError::Transport(msg) | NodeRpcError::Config(msg) => SourceError::Transport(msg),
            NodeRpcError::Rpc(failure) => SourceError::Rpc {
                code: failure.code,
                message: failure.message,
            },
            NodeRpcError::Decode(msg) => SourceError::Decode(msg),
            NodeRpcError::Parse { height, source } => SourceError::Parse {
                height,
                reason: source.to_string(),
            },
        }
    }
}

/// Block and transaction wire-format errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Ran out of bytes.
    #[error("unexpected end of data reading {field}: need {needed} bytes, {remaining} left")]
    UnexpectedEof {
        /// Field being read
        field: &'static str,
        /// Bytes the field needs
        needed: usize,
        /// Bytes left in the input
        remaining: usize,
    },

    /// Bytes left over after the last transaction.
    #[error("{0} trailing bytes after block")]
    TrailingBytes(usize),

    /// Transaction format this parser does not know.
    #[error("unsupported transaction version {0}")]
    UnsupportedVersion(u32),

    /// A length prefix not in minimal encoding.
    #[error("non-canonical compact size")]
    NonCanonicalCompactSize,

    /// Block with no transactions, or a first transaction that is not a coinbase.
    #[error("block has no coinbase transaction")]
    MissingCoinbase,

    /// Coinbase script commits to a different height than requested.
    #[error("coinbase commits to height {found}, expected {expected}")]
    HeightMismatch {
        /// Requested height
        expected: BlockHeight,
        /// Height encoded in the coinbase
        found: BlockHeight,
    },

    /// The node's hex payload was not hex.
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}
