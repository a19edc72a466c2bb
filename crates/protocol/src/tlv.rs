//! Tag-length-value primitive
//!
//! Seals and barcodes are flat sequences of TLV entries with a one byte tag
//! and a DER-style length:
//!
//! ```text
//! ┌──────────┬──────────────────────────────┬─────────────┐
//! │ Tag (1B) │ Length (1-4B)                │ Value       │
//! └──────────┴──────────────────────────────┴─────────────┘
//!
//! length ≤ 127   → 0xxxxxxx
//! length ≤ 2^8-1 → 0x81 LL
//! length ≤ 2^16-1→ 0x82 LL LL
//! length ≤ 2^24-1→ 0x83 LL LL LL
//! ```

use crate::error::{ProtocolError, Result};

/// Largest value length representable by the supported length forms
pub const MAX_VALUE_LENGTH: usize = 0x00FF_FFFF;

/// ASN.1 tag of a DER INTEGER
pub const DER_INTEGER_TAG: u8 = 0x02;

/// ASN.1 tag of a DER SEQUENCE
pub const DER_SEQUENCE_TAG: u8 = 0x30;

/// A single tag-value entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tlv {
    pub tag: u8,
    pub value: Vec<u8>,
}

impl Tlv {
    /// Create an entry, rejecting values too long for the length field
    pub fn new(tag: u8, value: impl Into<Vec<u8>>) -> Result<Self> {
        let value = value.into();
        if value.len() > MAX_VALUE_LENGTH {
            return Err(ProtocolError::InvalidLength {
                what: "TLV value",
                got: value.len(),
            });
        }
        Ok(Self { tag, value })
    }

    /// Total encoded size: tag, length field and value
    pub fn encoded_len(&self) -> usize {
        1 + length_field_len(self.value.len()) + self.value.len()
    }

    /// Encode as tag, DER length, value
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write_into(&mut out);
        out
    }

    /// Append the encoding to an existing buffer
    pub fn write_into(&self, out: &mut Vec<u8>) {
        out.push(self.tag);
        encode_length(self.value.len(), out);
        out.extend_from_slice(&self.value);
    }

    /// Decode the single entry at the start of `bytes`
    ///
    /// Trailing bytes after the entry are ignored. A declared length larger
    /// than the remaining buffer is reported as [`ProtocolError::MalformedLength`].
    pub fn decode_one(bytes: &[u8]) -> Result<Self> {
        let (tag, header_len, value_len) = read_header(bytes)?;
        let end = header_len + value_len;
        if end > bytes.len() {
            return Err(ProtocolError::MalformedLength(format!(
                "declared length {} exceeds the {} remaining bytes",
                value_len,
                bytes.len() - header_len
            )));
        }
        Ok(Self {
            tag,
            value: bytes[header_len..end].to_vec(),
        })
    }

    /// Decode a flat sequence of entries filling the whole buffer
    pub fn decode_all(bytes: &[u8]) -> Result<Vec<Self>> {
        let mut entries = Vec::new();
        let mut rest = bytes;
        while !rest.is_empty() {
            let (tag, header_len, value_len) = read_header(rest)?;
            let end = header_len + value_len;
            if end > rest.len() {
                return Err(ProtocolError::TruncatedInput("TLV value"));
            }
            entries.push(Self {
                tag,
                value: rest[header_len..end].to_vec(),
            });
            rest = &rest[end..];
        }
        Ok(entries)
    }
}

/// Concatenate the encodings of a list of entries
pub fn encode_all(entries: &[Tlv]) -> Vec<u8> {
    let mut out = Vec::with_capacity(entries.iter().map(Tlv::encoded_len).sum());
    for entry in entries {
        entry.write_into(&mut out);
    }
    out
}

/// Number of bytes the DER length field occupies for `len`
pub fn length_field_len(len: usize) -> usize {
    if len < 0x80 {
        1
    } else {
        1 + significant_bytes(len)
    }
}

/// Append the minimal DER length encoding of `len`
pub fn encode_length(len: usize, out: &mut Vec<u8>) {
    if len < 0x80 {
        out.push(len as u8);
        return;
    }
    let count = significant_bytes(len);
    out.push(0x80 | count as u8);
    out.extend_from_slice(&len.to_be_bytes()[std::mem::size_of::<usize>() - count..]);
}

/// Decode a DER length field, returning `(length, bytes consumed)`
pub fn decode_length(bytes: &[u8]) -> Result<(usize, usize)> {
    let first = *bytes
        .first()
        .ok_or(ProtocolError::TruncatedInput("TLV length"))?;
    if first < 0x80 {
        return Ok((first as usize, 1));
    }
    let count = (first & 0x7F) as usize;
    if !(1..=3).contains(&count) {
        return Err(ProtocolError::MalformedLength(format!(
            "unsupported length prefix 0x{:02X}",
            first
        )));
    }
    let extension = bytes
        .get(1..=count)
        .ok_or(ProtocolError::TruncatedInput("TLV length"))?;
    let len = extension
        .iter()
        .fold(0usize, |acc, byte| (acc << 8) | *byte as usize);
    Ok((len, 1 + count))
}

/// Encode a non-negative big-endian magnitude as a DER INTEGER
///
/// Redundant leading zeros are stripped and a zero byte is prepended when
/// the high bit of the first remaining byte is set.
pub fn der_integer(magnitude: &[u8]) -> Tlv {
    let first_nonzero = magnitude
        .iter()
        .position(|b| *b != 0)
        .unwrap_or(magnitude.len());
    let trimmed = &magnitude[first_nonzero..];

    let mut value = Vec::with_capacity(trimmed.len() + 1);
    match trimmed.first() {
        None => value.push(0),
        Some(b) if b & 0x80 != 0 => {
            value.push(0);
            value.extend_from_slice(trimmed);
        }
        Some(_) => value.extend_from_slice(trimmed),
    }
    Tlv {
        tag: DER_INTEGER_TAG,
        value,
    }
}

fn read_header(bytes: &[u8]) -> Result<(u8, usize, usize)> {
    let tag = *bytes.first().ok_or(ProtocolError::TruncatedInput("TLV tag"))?;
    let (value_len, length_len) = decode_length(&bytes[1..])?;
    Ok((tag, 1 + length_len, value_len))
}

fn significant_bytes(len: usize) -> usize {
    let bits = usize::BITS - len.leading_zeros();
    bits.div_ceil(8).max(1) as usize
}
