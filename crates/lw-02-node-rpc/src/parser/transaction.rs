use shared_types::{BlockHeight, CompactOutput, CompactSpend, Hash, COMPACT_NOTE_SIZE};

use super::double_sha256;
use super::reader::ByteReader;
use crate::domain::ParseError;

const OVERWINTER_FLAG: u32 = 1 << 31;

// Minimum serialized sizes, used to bound item counts.
const TX_IN_MIN_SIZE: usize = 32 + 4 + 1 + 4;
const TX_OUT_MIN_SIZE: usize = 8 + 1;

/// cv, anchor, nullifier, rk, zkproof, spendAuthSig.
const SPEND_SIZE: usize = 32 + 32 + 32 + 32 + 192 + 64;
const SPEND_NULLIFIER: std::ops::Range<usize> = 64..96;

/// cv, cmu, ephemeralKey, encCiphertext, outCiphertext, zkproof.
const OUTPUT_SIZE: usize = 32 + 32 + 32 + 580 + 80 + 192;
const OUTPUT_CMU: std::ops::Range<usize> = 32..64;
const OUTPUT_EPK: std::ops::Range<usize> = 64..96;
const OUTPUT_CIPHERTEXT_START: usize = 96;

/// vpub_old, vpub_new, anchor, nullifiers, commitments, ephemeralKey,
/// randomSeed, macs, ciphertexts. Proof size depends on the version.
const JOINSPLIT_BASE_SIZE: usize = 8 + 8 + 32 + 64 + 64 + 32 + 32 + 64 + 2 * 601;
const PHGR_PROOF_SIZE: usize = 296;
const GROTH_PROOF_SIZE: usize = 192;

/// A transaction reduced to what compact blocks need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTransaction {
    /// Double SHA-256 of the serialized transaction.
    pub txid: Hash,
    /// Transaction version (without the overwinter flag).
    pub version: u32,
    /// scriptSig of the input if this is a coinbase.
    pub coinbase_script: Option<Vec<u8>>,
    /// Sapling spends.
    pub spends: Vec<CompactSpend>,
    /// Sapling outputs.
    pub outputs: Vec<CompactOutput>,
}

impl ParsedTransaction {
    /// True when the transaction has Sapling components.
    pub fn is_shielded(&self) -> bool {
        !self.spends.is_empty() || !self.outputs.is_empty()
    }

    /// Read one transaction from `reader`.
    pub(crate) fn parse(reader: &mut ByteReader<'_>) -> Result<Self, ParseError> {
        let start = reader.position();

        let header = reader.read_u32_le("tx header")?;
        let overwintered = header & OVERWINTER_FLAG != 0;
        let version = header & !OVERWINTER_FLAG;
        match (overwintered, version) {
            (false, 1..=2) => {}
            (true, 3..=4) => reader.skip(4, "version group id")?,
            _ => return Err(ParseError::UnsupportedVersion(version)),
        }

        let input_count = reader.read_count("tx_in count", TX_IN_MIN_SIZE)?;
        let mut coinbase_script = None;
        for i in 0..input_count {
            let prev_hash = reader.read_hash("prevout hash")?;
            let prev_index = reader.read_u32_le("prevout index")?;
            let script = reader.read_var_bytes("scriptSig")?;
            reader.skip(4, "sequence")?;
            if i == 0 && input_count == 1 && prev_hash == [0u8; 32] && prev_index == u32::MAX {
                coinbase_script = Some(script.to_vec());
            }
        }

        let output_count = reader.read_count("tx_out count", TX_OUT_MIN_SIZE)?;
        for _ in 0..output_count {
            reader.skip(8, "value")?;
            reader.read_var_bytes("scriptPubKey")?;
        }

        reader.skip(4, "lock time")?;
        if overwintered {
            reader.skip(4, "expiry height")?;
        }

        let mut spends = Vec::new();
        let mut outputs = Vec::new();
        if version >= 4 {
            reader.skip(8, "value balance")?;

            let spend_count = reader.read_count("spend count", SPEND_SIZE)?;
            for _ in 0..spend_count {
                let spend = reader.take(SPEND_SIZE, "spend description")?;
                let mut nf = [0u8; 32];
                nf.copy_from_slice(&spend[SPEND_NULLIFIER]);
                spends.push(CompactSpend { nf });
            }

            let output_count = reader.read_count("output count", OUTPUT_SIZE)?;
            for _ in 0..output_count {
                let output = reader.take(OUTPUT_SIZE, "output description")?;
                let mut cmu = [0u8; 32];
                cmu.copy_from_slice(&output[OUTPUT_CMU]);
                let mut epk = [0u8; 32];
                epk.copy_from_slice(&output[OUTPUT_EPK]);
                outputs.push(CompactOutput {
                    cmu,
                    epk,
                    ciphertext: output
                        [OUTPUT_CIPHERTEXT_START..OUTPUT_CIPHERTEXT_START + COMPACT_NOTE_SIZE]
                        .to_vec(),
                });
            }
        }

        if version >= 2 {
            let proof_size = if version >= 4 {
                GROTH_PROOF_SIZE
            } else {
                PHGR_PROOF_SIZE
            };
            let joinsplit_size = JOINSPLIT_BASE_SIZE + proof_size;
            let joinsplit_count = reader.read_count("joinsplit count", joinsplit_size)?;
            reader.skip(joinsplit_count * joinsplit_size, "joinsplits")?;
            if joinsplit_count > 0 {
                reader.skip(32 + 64, "joinsplit pubkey and signature")?;
            }
        }

        if version >= 4 && (!spends.is_empty() || !outputs.is_empty()) {
            reader.skip(64, "binding signature")?;
        }

        Ok(Self {
            txid: double_sha256(reader.since(start)),
            version,
            coinbase_script,
            spends,
            outputs,
        })
    }
}

/// Height committed to by a coinbase scriptSig, if it follows the
/// height-first convention.
pub fn coinbase_height(script: &[u8]) -> Option<BlockHeight> {
    let op = *script.first()?;
    match op {
        0x00 => Some(0),
        0x51..=0x60 => Some((op - 0x50) as BlockHeight),
        0x01..=0x08 => {
            let bytes = script.get(1..1 + op as usize)?;
            Some(
                bytes
                    .iter()
                    .enumerate()
                    .fold(0u64, |acc, (i, b)| acc | (*b as u64) << (8 * i)),
            )
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::fixtures::{coinbase_tx, sapling_tx, sprout_v2_tx};

    fn parse_all(bytes: &[u8]) -> ParsedTransaction {
        let mut reader = ByteReader::new(bytes);
        let tx = ParsedTransaction::parse(&mut reader).unwrap();
        assert_eq!(reader.remaining(), 0);
        tx
    }

    #[test]
    fn test_coinbase_detected() {
        let tx = parse_all(&coinbase_tx(500_000));
        assert_eq!(tx.version, 1);
        assert_eq!(coinbase_height(tx.coinbase_script.as_deref().unwrap()), Some(500_000));
        assert!(!tx.is_shielded());
    }

    #[test]
    fn test_sapling_components_extracted() {
        let raw = sapling_tx(2, 3, 7);
        let tx = parse_all(&raw);
        assert_eq!(tx.version, 4);
        assert_eq!(tx.spends.len(), 2);
        assert_eq!(tx.outputs.len(), 3);
        assert_eq!(tx.spends[1].nf, [7u8; 32]);
        assert_eq!(tx.outputs[0].cmu, [8u8; 32]);
        assert_eq!(tx.outputs[0].epk, [9u8; 32]);
        assert_eq!(tx.outputs[0].ciphertext, vec![10u8; COMPACT_NOTE_SIZE]);
        assert_eq!(tx.txid, double_sha256(&raw));
        assert!(tx.coinbase_script.is_none());
    }

    #[test]
    fn test_sprout_joinsplits_skipped() {
        let tx = parse_all(&sprout_v2_tx(2));
        assert_eq!(tx.version, 2);
        assert!(!tx.is_shielded());
    }

    #[test]
    fn test_v5_rejected() {
        let mut raw = vec![0x05, 0x00, 0x00, 0x80];
        raw.extend_from_slice(&[0u8; 16]);
        let mut reader = ByteReader::new(&raw);
        assert_eq!(
            ParsedTransaction::parse(&mut reader),
            Err(ParseError::UnsupportedVersion(5))
        );
    }

    #[test]
    fn test_truncated_output_reports_eof() {
        let mut raw = sapling_tx(0, 1, 0);
        raw.truncate(raw.len() - 100);
        let mut reader = ByteReader::new(&raw);
        assert!(matches!(
            ParsedTransaction::parse(&mut reader),
            Err(ParseError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_coinbase_height_encodings() {
        assert_eq!(coinbase_height(&[0x00]), Some(0));
        assert_eq!(coinbase_height(&[0x51]), Some(1));
        assert_eq!(coinbase_height(&[0x60]), Some(16));
        assert_eq!(coinbase_height(&[0x01, 0x11]), Some(17));
        assert_eq!(coinbase_height(&[0x03, 0x80, 0x65, 0x06]), Some(419_200));
        assert_eq!(coinbase_height(&[0x03, 0x80]), None);
        assert_eq!(coinbase_height(&[]), None);
    }
}
