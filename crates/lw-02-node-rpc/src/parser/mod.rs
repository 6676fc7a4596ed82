//! # Block Parser
//!
//! Zcash block wire format to compact blocks. Handles transaction versions
//! 1 through 4 (pre-NU5). Block hashes and txids are double SHA-256 of the
//! serialized header and transaction.

mod block;
mod reader;
mod transaction;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

pub use block::{BlockHeader, ZcashBlockParser, HEADER_FIXED_SIZE};
pub use transaction::{coinbase_height, ParsedTransaction};

use sha2::{Digest, Sha256};
use shared_types::Hash;

/// SHA-256 applied twice.
pub fn double_sha256(data: &[u8]) -> Hash {
    let first = Sha256::digest(data);
    Sha256::digest(first).into()
}
