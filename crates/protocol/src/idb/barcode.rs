//! Barcode text envelope

use crate::error::{ProtocolError, Result};
use crate::idb::{IdbPayload, IDENTIFIER, LEGACY_IDENTIFIER};
use data_encoding::BASE32_NOPAD;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{Read, Write};
use std::str::FromStr;

/// Zlib level used by [`IcaoBarcode::encode`]
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 9;

/// Largest payload a zipped barcode may inflate to
///
/// Printed barcodes hold a few kilobytes at most; anything larger is rejected
/// as [`ProtocolError::Compression`].
pub const MAX_INFLATED_LEN: usize = 64 * 1024;

const FLAG_SIGNED: u8 = 0b01;
const FLAG_ZIPPED: u8 = 0b10;

/// An IDB barcode: payload plus transport flags
///
/// Whether the barcode is signed follows from the payload header, so the
/// flag character can never contradict the header layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcaoBarcode {
    pub is_zipped: bool,
    pub payload: IdbPayload,
}

impl IcaoBarcode {
    pub fn new(payload: IdbPayload, is_zipped: bool) -> Self {
        Self { is_zipped, payload }
    }

    pub fn is_signed(&self) -> bool {
        self.payload.header.is_signed()
    }

    /// Flag character, one of `A`..=`D`
    pub fn flag(&self) -> char {
        let mut bits = 0;
        if self.is_signed() {
            bits |= FLAG_SIGNED;
        }
        if self.is_zipped {
            bits |= FLAG_ZIPPED;
        }
        char::from(b'A' + bits)
    }

    /// Decode barcode text
    pub fn decode(text: &str) -> Result<Self> {
        let identifier = text
            .get(..IDENTIFIER.len())
            .ok_or(ProtocolError::TruncatedInput("barcode identifier"))?;
        if identifier != IDENTIFIER && identifier != LEGACY_IDENTIFIER {
            return Err(ProtocolError::UnrecognizedIdentifier(identifier.to_string()));
        }

        let rest = &text[IDENTIFIER.len()..];
        let flag = rest
            .chars()
            .next()
            .ok_or(ProtocolError::TruncatedInput("barcode flag"))?;
        let bits = match flag {
            'A'..='D' => flag as u8 - b'A',
            other => {
                return Err(ProtocolError::InvalidFormat(format!(
                    "barcode flag '{}' is not one of A-D",
                    other
                )))
            }
        };
        let is_signed = bits & FLAG_SIGNED != 0;
        let is_zipped = bits & FLAG_ZIPPED != 0;

        let data = BASE32_NOPAD
            .decode(rest[flag.len_utf8()..].as_bytes())
            .map_err(|e| ProtocolError::InvalidFormat(format!("barcode base32: {}", e)))?;
        let data = if is_zipped { inflate(&data)? } else { data };

        Ok(Self {
            is_zipped,
            payload: IdbPayload::decode(&data, is_signed)?,
        })
    }

    /// Encode as barcode text, compressing at the best level when zipped
    pub fn encode(&self) -> Result<String> {
        self.encode_with_level(DEFAULT_COMPRESSION_LEVEL)
    }

    /// Encode with an explicit zlib level (0-9)
    pub fn encode_with_level(&self, level: u32) -> Result<String> {
        let data = self.payload.encode()?;
        let data = if self.is_zipped {
            deflate(&data, level)?
        } else {
            data
        };

        let mut text = String::with_capacity(IDENTIFIER.len() + 1 + BASE32_NOPAD.encode_len(data.len()));
        text.push_str(IDENTIFIER);
        text.push(self.flag());
        text.push_str(&BASE32_NOPAD.encode(&data));
        Ok(text)
    }

    /// Bytes covered by the signature
    pub fn signed_bytes(&self) -> Result<Vec<u8>> {
        self.payload.signed_bytes()
    }
}

impl FromStr for IcaoBarcode {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

fn deflate(data: &[u8], level: u32) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level.min(9)));
    encoder
        .write_all(data)
        .map_err(|e| ProtocolError::Compression(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| ProtocolError::Compression(e.to_string()))
}

fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    ZlibDecoder::new(data)
        .take(MAX_INFLATED_LEN as u64 + 1)
        .read_to_end(&mut out)
        .map_err(|e| ProtocolError::Compression(e.to_string()))?;
    if out.len() > MAX_INFLATED_LEN {
        return Err(ProtocolError::Compression(format!(
            "payload inflates beyond {} bytes",
            MAX_INFLATED_LEN
        )));
    }
    Ok(out)
}
