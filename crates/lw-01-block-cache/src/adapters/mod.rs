//! # Adapters

/// Bincode entry encoding.
pub mod bincode_codec;

pub use bincode_codec::BincodeEntryCodec;
