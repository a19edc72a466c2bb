//! IDB header
//!
//! ```text
//! ┌──────────┬───────────┬──────────────────┬─────────────────┐
//! │ Country  │ Algorithm │ Certificate ref  │ Signature date  │
//! │ C40 (2B) │ (1B)      │ (5B)             │ masked (4B)     │
//! └──────────┴───────────┴──────────────────┴─────────────────┘
//!             └──────────── signed barcodes only ──────────────┘
//! ```

use crate::binary::{read_array, read_u8, write_bytes, write_u8, BinaryRead, BinaryWrite};
use crate::c40;
use crate::date::{MaskedDate, MASKED_DATE_LEN};
use crate::error::{ProtocolError, Result};
use std::io::{Cursor, Read, Write};

/// Length of an unsigned header
pub const UNSIGNED_HEADER_LEN: usize = 2;

/// Length of a signed header
pub const SIGNED_HEADER_LEN: usize = 12;

/// Length of the certificate reference in a signed header
pub const CERTIFICATE_REFERENCE_LEN: usize = 5;

/// Signature algorithm declared in a signed header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SignatureAlgorithm {
    EcdsaSha256 = 0x01,
    EcdsaSha384 = 0x02,
    EcdsaSha512 = 0x03,
}

impl SignatureAlgorithm {
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0x01 => Ok(SignatureAlgorithm::EcdsaSha256),
            0x02 => Ok(SignatureAlgorithm::EcdsaSha384),
            0x03 => Ok(SignatureAlgorithm::EcdsaSha512),
            other => Err(ProtocolError::OutOfRange {
                field: "signature algorithm",
                value: other as u16,
            }),
        }
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

/// Signature fields of a signed header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdbSignatureInfo {
    pub algorithm: SignatureAlgorithm,
    pub certificate_reference: [u8; CERTIFICATE_REFERENCE_LEN],
    pub signature_creation_date: MaskedDate,
}

impl BinaryRead for IdbSignatureInfo {
    fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let algorithm = SignatureAlgorithm::from_byte(read_u8(reader, "signature algorithm")?)?;
        let certificate_reference = read_array(reader, "certificate reference")?;
        let date = read_array::<_, MASKED_DATE_LEN>(reader, "signature creation date")?;
        Ok(Self {
            algorithm,
            certificate_reference,
            signature_creation_date: MaskedDate::decode(&date)?,
        })
    }
}

impl BinaryWrite for IdbSignatureInfo {
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_u8(writer, self.algorithm.as_byte())?;
        write_bytes(writer, &self.certificate_reference)?;
        write_bytes(writer, &self.signature_creation_date.encode())
    }

    fn serialized_size(&self) -> usize {
        SIGNED_HEADER_LEN - UNSIGNED_HEADER_LEN
    }
}

/// IDB header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdbHeader {
    /// Issuing country, filler as `<`
    pub country_identifier: String,
    /// Present exactly when the barcode is signed
    pub signature: Option<IdbSignatureInfo>,
}

impl IdbHeader {
    /// Header of an unsigned barcode
    pub fn unsigned(country_identifier: impl Into<String>) -> Result<Self> {
        let country_identifier = country_identifier.into().to_ascii_uppercase();
        if c40::normalize(&country_identifier).chars().count() != 3 {
            return Err(ProtocolError::InvalidLength {
                what: "country identifier",
                got: country_identifier.len(),
            });
        }
        Ok(Self {
            country_identifier,
            signature: None,
        })
    }

    /// Header of a signed barcode
    pub fn signed(country_identifier: impl Into<String>, info: IdbSignatureInfo) -> Result<Self> {
        let mut header = Self::unsigned(country_identifier)?;
        header.signature = Some(info);
        Ok(header)
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// Decode a complete header; its length selects the layout
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let signed = match bytes.len() {
            UNSIGNED_HEADER_LEN => false,
            SIGNED_HEADER_LEN => true,
            other => {
                return Err(ProtocolError::InvalidLength {
                    what: "IDB header",
                    got: other,
                })
            }
        };
        Self::read_from_payload(&mut Cursor::new(bytes), signed)
    }

    /// Read a header whose layout is fixed by the barcode flag
    pub fn read_from_payload<R: Read>(reader: &mut R, signed: bool) -> Result<Self> {
        let country = c40::decode(&read_array::<_, 2>(reader, "country identifier")?)?;
        let signature = if signed {
            Some(IdbSignatureInfo::read_from(reader)?)
        } else {
            None
        };
        Ok(Self {
            country_identifier: country.replace(' ', "<"),
            signature,
        })
    }
}

impl BinaryWrite for IdbHeader {
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_bytes(writer, &c40::encode(&self.country_identifier)?)?;
        match &self.signature {
            Some(info) => info.write_to(writer),
            None => Ok(()),
        }
    }

    fn serialized_size(&self) -> usize {
        if self.is_signed() {
            SIGNED_HEADER_LEN
        } else {
            UNSIGNED_HEADER_LEN
        }
    }
}
