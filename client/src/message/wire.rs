//! Canonical wire encoding for compiled messages.
//!
//! The byte layout here is exactly what gets signed and exactly what the
//! ledger deserializes, so it is written out by hand. Serde is deliberately
//! avoided on this path: field ordering guarantees across serialization
//! formats are not something signatures should depend on.
//!
//! Layout:
//!
//! ```text
//! header            3 × u8: required signers, read-only signers,
//!                           read-only non-signers
//! account table     compact length, then 32 bytes per address
//! checkpoint        32 bytes
//! operations        compact length, then per operation:
//!                     program table index   u8
//!                     account indices       compact length + u8 each
//!                     payload               compact length + raw bytes
//! ```
//!
//! "Compact length" is the 7-bit little-endian varint: low 7 bits carry the
//! value, the high bit says another byte follows. Lengths under 128 cost a
//! single byte, which covers every real message.

use thiserror::Error;

use super::compile::CompiledMessage;

/// Errors produced when reading compact length prefixes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    #[error("input ended inside a compact length prefix")]
    TruncatedLength,
    #[error("compact length prefix exceeds the encodable range")]
    LengthOverflow,
}

/// Appends the compact encoding of `len` to `buf`.
pub fn encode_len(buf: &mut Vec<u8>, len: usize) {
    let mut rem = len;
    loop {
        let mut byte = (rem & 0x7f) as u8;
        rem >>= 7;
        if rem == 0 {
            buf.push(byte);
            break;
        }
        byte |= 0x80;
        buf.push(byte);
    }
}

/// Reads a compact length prefix from `bytes` starting at `*pos`, advancing
/// `*pos` past it.
pub fn decode_len(bytes: &[u8], pos: &mut usize) -> Result<usize, WireError> {
    let mut len: usize = 0;
    let mut shift: u32 = 0;
    loop {
        let byte = *bytes.get(*pos).ok_or(WireError::TruncatedLength)?;
        *pos += 1;
        len |= ((byte & 0x7f) as usize) << shift;
        if byte & 0x80 == 0 {
            return Ok(len);
        }
        shift += 7;
        // Three bytes encode up to 2^21; nothing in the format needs more.
        if shift > 21 {
            return Err(WireError::LengthOverflow);
        }
    }
}

impl CompiledMessage {
    /// Serializes the message into its canonical signable byte form.
    ///
    /// Deterministic: the same compiled message always yields the same
    /// bytes, which is what makes signatures over it meaningful.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.serialized_size_hint());

        buf.push(self.header.required_signers);
        buf.push(self.header.readonly_signers);
        buf.push(self.header.readonly_non_signers);

        encode_len(&mut buf, self.account_table.len());
        for address in &self.account_table {
            buf.extend_from_slice(address.as_bytes());
        }

        buf.extend_from_slice(self.checkpoint.as_bytes());

        encode_len(&mut buf, self.operations.len());
        for op in &self.operations {
            buf.push(op.program_index);
            encode_len(&mut buf, op.account_indices.len());
            buf.extend_from_slice(&op.account_indices);
            encode_len(&mut buf, op.payload.len());
            buf.extend_from_slice(&op.payload);
        }

        buf
    }

    /// Upper-bound size estimate used to pre-allocate the encoding buffer.
    fn serialized_size_hint(&self) -> usize {
        let ops: usize = self
            .operations
            .iter()
            .map(|op| 1 + 3 + op.account_indices.len() + 3 + op.payload.len())
            .sum();
        3 + 3 + self.account_table.len() * 32 + 32 + 3 + ops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(len: usize) -> (Vec<u8>, usize) {
        let mut buf = Vec::new();
        encode_len(&mut buf, len);
        let mut pos = 0;
        let decoded = decode_len(&buf, &mut pos).unwrap();
        assert_eq!(pos, buf.len(), "decoder must consume the whole prefix");
        (buf, decoded)
    }

    #[test]
    fn compact_len_small_values_are_one_byte() {
        for len in [0usize, 1, 5, 127] {
            let (buf, decoded) = roundtrip(len);
            assert_eq!(buf.len(), 1);
            assert_eq!(decoded, len);
        }
    }

    #[test]
    fn compact_len_two_and_three_byte_values() {
        let (buf, decoded) = roundtrip(128);
        assert_eq!(buf, vec![0x80, 0x01]);
        assert_eq!(decoded, 128);

        let (buf, decoded) = roundtrip(0x3fff);
        assert_eq!(buf, vec![0xff, 0x7f]);
        assert_eq!(decoded, 0x3fff);

        let (buf, decoded) = roundtrip(0x4000);
        assert_eq!(buf, vec![0x80, 0x80, 0x01]);
        assert_eq!(decoded, 0x4000);
    }

    #[test]
    fn decode_rejects_truncated_input() {
        // High bit set promises another byte that never arrives.
        let mut pos = 0;
        assert_eq!(
            decode_len(&[0x80], &mut pos),
            Err(WireError::TruncatedLength)
        );
    }

    #[test]
    fn decode_rejects_runaway_prefix() {
        let mut pos = 0;
        assert_eq!(
            decode_len(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01], &mut pos),
            Err(WireError::LengthOverflow)
        );
    }

    #[test]
    fn decode_advances_position() {
        let mut buf = Vec::new();
        encode_len(&mut buf, 300);
        buf.push(0xAB); // trailing payload byte
        let mut pos = 0;
        assert_eq!(decode_len(&buf, &mut pos).unwrap(), 300);
        assert_eq!(buf[pos], 0xAB);
    }
}
