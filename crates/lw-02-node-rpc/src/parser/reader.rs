use shared_types::Hash;

use crate::domain::ParseError;

/// Cursor over a byte slice with Bitcoin-style primitive readers.
pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Bytes consumed since `start`.
    pub(crate) fn since(&self, start: usize) -> &'a [u8] {
        &self.data[start..self.pos]
    }

    pub(crate) fn take(&mut self, n: usize, field: &'static str) -> Result<&'a [u8], ParseError> {
        if n > self.remaining() {
            return Err(ParseError::UnexpectedEof {
                field,
                needed: n,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    pub(crate) fn skip(&mut self, n: usize, field: &'static str) -> Result<(), ParseError> {
        self.take(n, field).map(|_| ())
    }

    pub(crate) fn read_u8(&mut self, field: &'static str) -> Result<u8, ParseError> {
        Ok(self.take(1, field)?[0])
    }

    pub(crate) fn read_u32_le(&mut self, field: &'static str) -> Result<u32, ParseError> {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(self.take(4, field)?);
        Ok(u32::from_le_bytes(buf))
    }

    pub(crate) fn read_hash(&mut self, field: &'static str) -> Result<Hash, ParseError> {
        let mut hash = [0u8; 32];
        hash.copy_from_slice(self.take(32, field)?);
        Ok(hash)
    }

    /// Bitcoin CompactSize, rejecting non-minimal encodings.
    pub(crate) fn read_compact_size(&mut self, field: &'static str) -> Result<u64, ParseError> {
        let (value, min) = match self.read_u8(field)? {
            0xfd => {
                let mut buf = [0u8; 2];
                buf.copy_from_slice(self.take(2, field)?);
                (u16::from_le_bytes(buf) as u64, 0xfd)
            }
            0xfe => (self.read_u32_le(field)? as u64, 0x1_0000),
            0xff => {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(self.take(8, field)?);
                (u64::from_le_bytes(buf), 0x1_0000_0000)
            }
            small => return Ok(small as u64),
        };
        if value < min {
            return Err(ParseError::NonCanonicalCompactSize);
        }
        Ok(value)
    }

    /// A CompactSize item count, bounded by what the remaining input could hold.
    pub(crate) fn read_count(
        &mut self,
        field: &'static str,
        min_item_size: usize,
    ) -> Result<usize, ParseError> {
        let count = self.read_compact_size(field)?;
        let needed = count.saturating_mul(min_item_size.max(1) as u64);
        if needed > self.remaining() as u64 {
            return Err(ParseError::UnexpectedEof {
                field,
                needed: usize::try_from(needed).unwrap_or(usize::MAX),
                remaining: self.remaining(),
            });
        }
        Ok(count as usize)
    }

    /// CompactSize length followed by that many bytes.
    pub(crate) fn read_var_bytes(&mut self, field: &'static str) -> Result<&'a [u8], ParseError> {
        let len = self.read_count(field, 1)?;
        self.take(len, field)
    }
}
