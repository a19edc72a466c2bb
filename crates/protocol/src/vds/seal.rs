//! Whole-seal encoding and decoding

use crate::binary::{BinaryRead, BinaryWrite};
use crate::error::{ProtocolError, Result};
use crate::signature::{VdsSignature, VDS_SIGNATURE_TAG};
use crate::tlv::{encode_all, Tlv};
use crate::vds::VdsHeader;
use std::io::Cursor;

/// A decoded or programmatically built Visible Digital Seal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seal {
    pub header: VdsHeader,
    /// Message entries in wire order, signature excluded
    pub messages: Vec<Tlv>,
    pub signature: Option<VdsSignature>,
}

impl Seal {
    /// Create an unsigned seal
    pub fn new(header: VdsHeader, messages: Vec<Tlv>) -> Self {
        Self {
            header,
            messages,
            signature: None,
        }
    }

    /// Decode a seal from its binary form
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(bytes);
        let header = VdsHeader::read_from(&mut cursor)?;
        let body = &bytes[cursor.position() as usize..];

        let mut messages = Vec::new();
        let mut signature = None;
        for entry in Tlv::decode_all(body)? {
            if entry.tag == VDS_SIGNATURE_TAG {
                if signature.is_some() {
                    return Err(ProtocolError::DuplicateElement("signature"));
                }
                signature = Some(VdsSignature::from_tlv(&entry)?);
            } else {
                messages.push(entry);
            }
        }

        Ok(Self {
            header,
            messages,
            signature,
        })
    }

    /// Encode as header, messages and (if present) signature
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = self.signed_bytes()?;
        if let Some(signature) = &self.signature {
            signature.to_tlv().write_into(&mut out);
        }
        Ok(out)
    }

    /// Bytes covered by the signature: header followed by every message
    pub fn signed_bytes(&self) -> Result<Vec<u8>> {
        let mut out = self.header.to_bytes()?;
        out.extend_from_slice(&encode_all(&self.messages));
        Ok(out)
    }

    /// Framed raw signature, if the seal is signed
    pub fn signature_bytes(&self) -> Option<Vec<u8>> {
        self.signature.as_ref().map(VdsSignature::to_raw_tlv)
    }

    /// First message carrying `tag`
    pub fn message(&self, tag: u8) -> Option<&Tlv> {
        self.messages.iter().find(|m| m.tag == tag)
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }
}
