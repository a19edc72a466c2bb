//! Visible Digital Seal header
//!
//! ```text
//! ┌───────┬─────────┬──────────┬────────────────────────┬────────┬────────┬──────┬──────┐
//! │ 0xDC  │ Version │ Country  │ Signer + Cert reference│ Issued │ Signed │ Feat │ Cat  │
//! │ (1B)  │ (1B)    │ C40 (2B) │ C40 (6B or 4B + var)   │ (3B)   │ (3B)   │ (1B) │ (1B) │
//! └───────┴─────────┴──────────┴────────────────────────┴────────┴────────┴──────┴──────┘
//! ```
//!
//! Version 4 (raw 3) writes the signer identifier followed by the certificate
//! reference length as two hex digits, then the certificate reference itself.
//! Version 3 (raw 2) writes the signer identifier followed by a certificate
//! reference padded to five characters.

use crate::binary::{read_array, read_bytes, read_u8, write_bytes, write_u8, BinaryRead, BinaryWrite};
use crate::c40;
use crate::date::{decode_date, encode_date, DATE_LEN};
use crate::error::{ProtocolError, Result};
use crate::vds::MAGIC;
use chrono::NaiveDate;
use std::io::{Read, Write};

/// Length of the signer identifier
pub const SIGNER_IDENTIFIER_LEN: usize = 4;

/// Width of a version 3 certificate reference
pub const V3_CERTIFICATE_REFERENCE_LEN: usize = 5;

/// Seal format version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum VdsVersion {
    /// ICAO version 3, raw discriminator 2
    V3 = 0x02,
    /// ICAO version 4, raw discriminator 3
    V4 = 0x03,
}

impl VdsVersion {
    /// Parse the raw version byte
    pub fn from_raw(raw: u8) -> Result<Self> {
        match raw {
            0x02 => Ok(VdsVersion::V3),
            0x03 => Ok(VdsVersion::V4),
            other => Err(ProtocolError::UnsupportedVersion(other)),
        }
    }

    /// Raw version byte as written on the wire
    pub fn raw(self) -> u8 {
        self as u8
    }

    /// Version number as named by ICAO
    pub fn icao_version(self) -> u8 {
        self.raw() + 1
    }
}

/// VDS header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VdsHeader {
    pub version: VdsVersion,
    /// Three letter issuing country, filler as `<`
    pub issuing_country: String,
    /// Four character signer identifier
    pub signer_identifier: String,
    pub certificate_reference: String,
    pub issuing_date: NaiveDate,
    pub signature_date: NaiveDate,
    doc_feature_ref: u8,
    doc_type_category: u8,
}

impl VdsHeader {
    /// Create a header, validating every field against its wire constraints
    pub fn new(
        version: VdsVersion,
        issuing_country: impl Into<String>,
        signer_identifier: impl Into<String>,
        certificate_reference: impl Into<String>,
        issuing_date: NaiveDate,
        signature_date: NaiveDate,
        document_ref: u16,
    ) -> Result<Self> {
        let issuing_country = issuing_country.into().to_ascii_uppercase();
        let signer_identifier = signer_identifier.into().to_ascii_uppercase();
        let mut certificate_reference = certificate_reference.into().to_ascii_uppercase();

        check_len("issuing country", &issuing_country, 3..=3)?;
        check_len(
            "signer identifier",
            &signer_identifier,
            SIGNER_IDENTIFIER_LEN..=SIGNER_IDENTIFIER_LEN,
        )?;
        match version {
            VdsVersion::V3 => {
                check_len(
                    "certificate reference",
                    &certificate_reference,
                    0..=V3_CERTIFICATE_REFERENCE_LEN,
                )?;
                while certificate_reference.len() < V3_CERTIFICATE_REFERENCE_LEN {
                    certificate_reference.push('0');
                }
            }
            VdsVersion::V4 => check_len("certificate reference", &certificate_reference, 0..=0xFF)?,
        }

        let (doc_feature_ref, doc_type_category) = split_document_ref(document_ref)?;
        Ok(Self {
            version,
            issuing_country,
            signer_identifier,
            certificate_reference,
            issuing_date,
            signature_date,
            doc_feature_ref,
            doc_type_category,
        })
    }

    /// Document feature reference (1..=254)
    pub fn doc_feature_ref(&self) -> u8 {
        self.doc_feature_ref
    }

    /// Document type category (1..=253)
    pub fn doc_type_category(&self) -> u8 {
        self.doc_type_category
    }

    /// Combined document reference `(feature << 8) | category`
    pub fn document_ref(&self) -> u16 {
        u16::from_be_bytes([self.doc_feature_ref, self.doc_type_category])
    }

    /// Replace both document reference bytes
    pub fn set_document_ref(&mut self, document_ref: u16) -> Result<()> {
        let (feature, category) = split_document_ref(document_ref)?;
        self.doc_feature_ref = feature;
        self.doc_type_category = category;
        Ok(())
    }

    fn identity_text(&self) -> String {
        match self.version {
            VdsVersion::V4 => format!(
                "{}{:02X}",
                self.signer_identifier,
                self.certificate_reference.len()
            ),
            VdsVersion::V3 => format!(
                "{}{:0<width$}",
                self.signer_identifier,
                self.certificate_reference,
                width = V3_CERTIFICATE_REFERENCE_LEN
            ),
        }
    }
}

impl BinaryRead for VdsHeader {
    fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let magic = read_u8(reader, "magic byte")?;
        if magic != MAGIC {
            return Err(ProtocolError::InvalidMagic(magic));
        }
        let version = VdsVersion::from_raw(read_u8(reader, "version")?)?;
        let country = c40::decode(&read_array::<_, 2>(reader, "issuing country")?)?;

        let (signer_identifier, certificate_reference) = match version {
            VdsVersion::V4 => {
                let identity = c40::decode(&read_array::<_, 4>(reader, "signer identifier")?)?;
                if identity.len() != SIGNER_IDENTIFIER_LEN + 2 {
                    return Err(ProtocolError::InvalidFormat(format!(
                        "signer block '{}' is not signer + hex length",
                        identity
                    )));
                }
                let (signer, hex_len) = identity.split_at(SIGNER_IDENTIFIER_LEN);
                let cert_len = usize::from_str_radix(hex_len, 16).map_err(|_| {
                    ProtocolError::InvalidFormat(format!(
                        "certificate reference length '{}' is not hex",
                        hex_len
                    ))
                })?;
                let cert_bytes =
                    read_bytes(reader, c40::encoded_len(cert_len), "certificate reference")?;
                let certificate_reference = c40::decode(&cert_bytes)?;
                if certificate_reference.len() != cert_len {
                    return Err(ProtocolError::InvalidFormat(format!(
                        "certificate reference '{}' does not have the declared {} characters",
                        certificate_reference, cert_len
                    )));
                }
                (signer.to_string(), certificate_reference)
            }
            VdsVersion::V3 => {
                let identity = c40::decode(&read_array::<_, 6>(reader, "signer identifier")?)?;
                if identity.len() < SIGNER_IDENTIFIER_LEN {
                    return Err(ProtocolError::InvalidFormat(format!(
                        "signer block '{}' is too short",
                        identity
                    )));
                }
                let (signer, cert) = identity.split_at(SIGNER_IDENTIFIER_LEN);
                (signer.to_string(), cert.to_string())
            }
        };

        let issuing_date = decode_date(&read_array::<_, DATE_LEN>(reader, "issuing date")?)?;
        let signature_date = decode_date(&read_array::<_, DATE_LEN>(reader, "signature date")?)?;
        let doc_feature_ref = read_u8(reader, "document feature reference")?;
        let doc_type_category = read_u8(reader, "document type category")?;

        Self::new(
            version,
            country.replace(' ', "<"),
            signer_identifier,
            certificate_reference,
            issuing_date,
            signature_date,
            u16::from_be_bytes([doc_feature_ref, doc_type_category]),
        )
    }
}

impl BinaryWrite for VdsHeader {
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_u8(writer, MAGIC)?;
        write_u8(writer, self.version.raw())?;
        write_bytes(writer, &c40::encode(&self.issuing_country)?)?;
        write_bytes(writer, &c40::encode(&self.identity_text())?)?;
        if self.version == VdsVersion::V4 {
            write_bytes(writer, &c40::encode(&self.certificate_reference)?)?;
        }
        write_bytes(writer, &encode_date(self.issuing_date)?)?;
        write_bytes(writer, &encode_date(self.signature_date)?)?;
        write_u8(writer, self.doc_feature_ref)?;
        write_u8(writer, self.doc_type_category)
    }

    fn serialized_size(&self) -> usize {
        let identity = match self.version {
            VdsVersion::V4 => {
                c40::encoded_len(SIGNER_IDENTIFIER_LEN + 2)
                    + c40::encoded_len(self.certificate_reference.len())
            }
            VdsVersion::V3 => c40::encoded_len(SIGNER_IDENTIFIER_LEN + V3_CERTIFICATE_REFERENCE_LEN),
        };
        2 + c40::encoded_len(3) + identity + 2 * DATE_LEN + 2
    }
}

fn split_document_ref(document_ref: u16) -> Result<(u8, u8)> {
    let [feature, category] = document_ref.to_be_bytes();
    if !(1..=254).contains(&feature) {
        return Err(ProtocolError::OutOfRange {
            field: "document feature reference",
            value: feature as u16,
        });
    }
    // ICAO-assigned categories are odd, but issued seals do not always follow that
    if !(1..=253).contains(&category) {
        return Err(ProtocolError::OutOfRange {
            field: "document type category",
            value: category as u16,
        });
    }
    Ok((feature, category))
}

fn check_len(what: &'static str, text: &str, range: std::ops::RangeInclusive<usize>) -> Result<()> {
    if range.contains(&text.len()) {
        Ok(())
    } else {
        Err(ProtocolError::InvalidLength {
            what,
            got: text.len(),
        })
    }
}
