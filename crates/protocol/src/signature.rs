//! ECDSA signature value
//!
//! On the wire a signature is the raw concatenation `r ‖ s` of two
//! equal-length big-endian integers, framed as a TLV. The framing tag is the
//! only thing that differs between VDS (`0xFF`) and IDB (`0x7F`), so one type
//! covers both through a const parameter.
//!
//! Verification libraries expect ASN.1 DER instead:
//!
//! ```text
//! SEQUENCE (0x30) {
//!     INTEGER (0x02) r
//!     INTEGER (0x02) s
//! }
//! ```

use crate::error::{ProtocolError, Result};
use crate::tlv::{der_integer, encode_all, Tlv, DER_INTEGER_TAG, DER_SEQUENCE_TAG};

/// Tag framing the signature of a Visible Digital Seal
pub const VDS_SIGNATURE_TAG: u8 = 0xFF;

/// Tag framing the signature of an IDB payload
pub const IDB_SIGNATURE_TAG: u8 = 0x7F;

/// Signature of a Visible Digital Seal
pub type VdsSignature = EcdsaSignature<VDS_SIGNATURE_TAG>;

/// Signature of an IDB barcode
pub type IdbSignature = EcdsaSignature<IDB_SIGNATURE_TAG>;

/// Raw ECDSA signature framed under tag `TAG`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EcdsaSignature<const TAG: u8> {
    r: Vec<u8>,
    s: Vec<u8>,
}

impl<const TAG: u8> EcdsaSignature<TAG> {
    /// The framing tag
    pub const TAG: u8 = TAG;

    /// Build from equal-length big-endian components
    pub fn new(r: Vec<u8>, s: Vec<u8>) -> Result<Self> {
        if r.is_empty() {
            return Err(ProtocolError::InvalidLength {
                what: "signature r component",
                got: 0,
            });
        }
        if r.len() != s.len() {
            return Err(ProtocolError::InvalidLength {
                what: "signature s component",
                got: s.len(),
            });
        }
        Ok(Self { r, s })
    }

    /// Split a raw `r ‖ s` value in half
    pub fn from_raw(raw: &[u8]) -> Result<Self> {
        if raw.is_empty() {
            return Err(ProtocolError::InvalidLength {
                what: "signature",
                got: 0,
            });
        }
        if raw.len() % 2 != 0 {
            return Err(ProtocolError::OddLength(raw.len()));
        }
        let (r, s) = raw.split_at(raw.len() / 2);
        Ok(Self {
            r: r.to_vec(),
            s: s.to_vec(),
        })
    }

    /// Parse from an already decoded entry, checking its tag
    pub fn from_tlv(tlv: &Tlv) -> Result<Self> {
        if tlv.tag != TAG {
            return Err(ProtocolError::UnexpectedTag {
                expected: TAG,
                actual: tlv.tag,
            });
        }
        Self::from_raw(&tlv.value)
    }

    /// Parse the framed raw encoding at the start of `bytes`
    pub fn from_raw_tlv(bytes: &[u8]) -> Result<Self> {
        match bytes.first() {
            Some(tag) if *tag == TAG => Self::from_tlv(&Tlv::decode_one(bytes)?),
            Some(tag) => Err(ProtocolError::UnexpectedTag {
                expected: TAG,
                actual: *tag,
            }),
            None => Err(ProtocolError::TruncatedInput("signature")),
        }
    }

    /// Parse a DER `SEQUENCE { INTEGER, INTEGER }`, padding both integers to
    /// `component_len` bytes
    pub fn from_der(der: &[u8], component_len: usize) -> Result<Self> {
        let sequence = Tlv::decode_one(der)?;
        if sequence.tag != DER_SEQUENCE_TAG {
            return Err(ProtocolError::UnexpectedTag {
                expected: DER_SEQUENCE_TAG,
                actual: sequence.tag,
            });
        }
        let integers = Tlv::decode_all(&sequence.value)?;
        let [r, s] = integers.as_slice() else {
            return Err(ProtocolError::InvalidFormat(format!(
                "DER signature holds {} elements instead of 2",
                integers.len()
            )));
        };
        Ok(Self {
            r: fixed_width(r, component_len)?,
            s: fixed_width(s, component_len)?,
        })
    }

    pub fn r(&self) -> &[u8] {
        &self.r
    }

    pub fn s(&self) -> &[u8] {
        &self.s
    }

    /// Width in bytes of each component
    pub fn component_len(&self) -> usize {
        self.r.len()
    }

    /// Raw `r ‖ s`
    pub fn to_raw(&self) -> Vec<u8> {
        let mut raw = Vec::with_capacity(self.r.len() + self.s.len());
        raw.extend_from_slice(&self.r);
        raw.extend_from_slice(&self.s);
        raw
    }

    /// The raw value framed under `TAG`
    pub fn to_tlv(&self) -> Tlv {
        Tlv {
            tag: TAG,
            value: self.to_raw(),
        }
    }

    /// Encoded framed raw value
    pub fn to_raw_tlv(&self) -> Vec<u8> {
        self.to_tlv().to_bytes()
    }

    /// ASN.1 DER encoding for verification libraries
    pub fn to_der(&self) -> Vec<u8> {
        let body = encode_all(&[der_integer(&self.r), der_integer(&self.s)]);
        Tlv {
            tag: DER_SEQUENCE_TAG,
            value: body,
        }
        .to_bytes()
    }
}

fn fixed_width(integer: &Tlv, width: usize) -> Result<Vec<u8>> {
    if integer.tag != DER_INTEGER_TAG {
        return Err(ProtocolError::UnexpectedTag {
            expected: DER_INTEGER_TAG,
            actual: integer.tag,
        });
    }
    let start = integer
        .value
        .iter()
        .position(|b| *b != 0)
        .unwrap_or(integer.value.len());
    let magnitude = &integer.value[start..];
    if magnitude.len() > width {
        return Err(ProtocolError::InvalidLength {
            what: "DER integer",
            got: magnitude.len(),
        });
    }
    let mut out = vec![0u8; width - magnitude.len()];
    out.extend_from_slice(magnitude);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_tlv_roundtrip() {
        let raw: Vec<u8> = (1..=8).collect();
        let sig = VdsSignature::from_raw(&raw).unwrap();
        assert_eq!(sig.r(), &[1, 2, 3, 4]);
        assert_eq!(sig.s(), &[5, 6, 7, 8]);

        let framed = sig.to_raw_tlv();
        assert_eq!(framed[..2], [0xFF, 0x08]);
        assert_eq!(VdsSignature::from_raw_tlv(&framed).unwrap(), sig);
    }

    #[test]
    fn test_wrong_tag_rejected() {
        let sig = IdbSignature::from_raw(&[1, 2]).unwrap();
        let framed = sig.to_raw_tlv();
        assert_eq!(framed[0], 0x7F);
        assert_eq!(
            VdsSignature::from_raw_tlv(&framed).unwrap_err(),
            ProtocolError::UnexpectedTag {
                expected: 0xFF,
                actual: 0x7F
            }
        );
    }

    #[test]
    fn test_odd_length() {
        assert_eq!(
            VdsSignature::from_raw(&[1, 2, 3]).unwrap_err(),
            ProtocolError::OddLength(3)
        );
    }

    #[test]
    fn test_component_length_errors() {
        assert_eq!(
            VdsSignature::new(Vec::new(), Vec::new()).unwrap_err(),
            ProtocolError::InvalidLength {
                what: "signature r component",
                got: 0
            }
        );
        assert_eq!(
            VdsSignature::new(vec![1, 2], vec![3]).unwrap_err(),
            ProtocolError::InvalidLength {
                what: "signature s component",
                got: 1
            }
        );
        assert_eq!(
            VdsSignature::from_raw(&[]).unwrap_err(),
            ProtocolError::InvalidLength {
                what: "signature",
                got: 0
            }
        );
    }

    #[test]
    fn test_der_encoding() {
        let sig = VdsSignature::new(vec![0x00, 0x7F], vec![0x80, 0x01]).unwrap();
        assert_eq!(
            sig.to_der(),
            vec![0x30, 0x08, 0x02, 0x01, 0x7F, 0x02, 0x03, 0x00, 0x80, 0x01]
        );
    }

    #[test]
    fn test_der_roundtrip_keeps_width() {
        let mut r = vec![0u8; 32];
        r[5] = 0x42;
        let mut s = vec![0xFFu8; 32];
        s[0] = 0x80;
        let sig = IdbSignature::new(r, s).unwrap();
        let der = sig.to_der();
        assert_eq!(IdbSignature::from_der(&der, sig.component_len()).unwrap(), sig);
    }

    #[test]
    fn test_der_component_too_wide() {
        let sig = VdsSignature::new(vec![0x11; 4], vec![0x22; 4]).unwrap();
        assert!(matches!(
            VdsSignature::from_der(&sig.to_der(), 3),
            Err(ProtocolError::InvalidLength { .. })
        ));
    }
}
