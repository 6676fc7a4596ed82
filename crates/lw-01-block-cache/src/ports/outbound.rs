//! # Outbound Ports

use shared_types::CompactBlock;

use crate::domain::CodecError;

/// Entry encoding - outbound port.
pub trait EntryCodec: Send + Sync {
    /// Encode a block for storage.
    fn encode(&self, block: &CompactBlock) -> Result<Vec<u8>, CodecError>;

    /// Decode a stored entry.
    fn decode(&self, data: &[u8]) -> Result<CompactBlock, CodecError>;
}
