//! # Error Types
//!
//! Errors shared across subsystem boundaries.

use thiserror::Error;

use crate::entities::BlockHeight;

/// Failure to obtain a block from the node.
///
/// "Height not yet available" is not an error; sources report it as `Ok(None)`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// The node could not be reached or the HTTP exchange failed.
    #[error("node transport error: {0}")]
    Transport(String),

    /// The node answered with an RPC error other than "not yet available".
    #[error("node rpc error {code}: {message}")]
    Rpc {
        /// Node error code
        code: i64,
        /// Node error message
        message: String,
    },

    /// The node's response was not shaped as expected.
    #[error("malformed node response: {0}")]
    Decode(String),

    /// The raw block bytes did not parse into a block.
    #[error("block {height} failed to parse: {reason}")]
    Parse {
        /// Height that was requested
        height: BlockHeight,
        /// Parser diagnostic
        reason: String,
    },
}

/// Errors decoding byte-reversed hex hashes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HexError {
    /// Not valid hex.
    #[error("invalid hex: {0}")]
    Invalid(String),

    /// Decoded to the wrong number of bytes.
    #[error("expected {expected} bytes, got {got}")]
    WrongLength {
        /// Required byte length
        expected: usize,
        /// Decoded byte length
        got: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_error_display_carries_code() {
        let err = SourceError::Rpc {
            code: -28,
            message: "Loading block index".into(),
        };
        assert!(err.to_string().contains("-28"));
    }

    #[test]
    fn test_parse_error_display_carries_height() {
        let err = SourceError::Parse {
            height: 419200,
            reason: "trailing bytes".into(),
        };
        assert!(err.to_string().contains("419200"));
    }
}
