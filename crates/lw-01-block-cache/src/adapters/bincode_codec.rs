use shared_types::CompactBlock;

use crate::domain::CodecError;
use crate::ports::EntryCodec;

/// Default entry codec using bincode.
#[derive(Debug, Default, Clone, Copy)]
pub struct BincodeEntryCodec;

impl EntryCodec for BincodeEntryCodec {
    fn encode(&self, block: &CompactBlock) -> Result<Vec<u8>, CodecError> {
        bincode::serialize(block).map_err(|e| CodecError {
            message: e.to_string(),
        })
    }

    fn decode(&self, data: &[u8]) -> Result<CompactBlock, CodecError> {
        bincode::deserialize(data).map_err(|e| CodecError {
            message: e.to_string(),
        })
    }
}
