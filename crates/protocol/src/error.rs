//! Error type for wire-format operations
//!
//! Every decoder and encoder in this crate fails fast: the first structural
//! violation is reported and no partial result is returned.

use std::io;
use thiserror::Error;

/// Result alias used throughout the protocol crate
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while encoding or decoding seals and barcodes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("Malformed TLV length: {0}")]
    MalformedLength(String),

    #[error("Truncated input while reading {0}")]
    TruncatedInput(&'static str),

    #[error("Unsupported seal version: raw value {0}")]
    UnsupportedVersion(u8),

    #[error("Invalid magic byte 0x{0:02X} (expected 0xDC)")]
    InvalidMagic(u8),

    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: u16 },

    #[error("Character {0:?} cannot be C40 encoded")]
    InvalidCharacter(char),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Invalid length for {what}: {got}")]
    InvalidLength { what: &'static str, got: usize },

    #[error("Signature value has odd length {0}")]
    OddLength(usize),

    #[error("Unexpected tag 0x{actual:02X} (expected 0x{expected:02X})")]
    UnexpectedTag { expected: u8, actual: u8 },

    #[error("Unknown top-level tag 0x{0:02X}")]
    UnknownTag(u8),

    #[error("Duplicate {0} element")]
    DuplicateElement(&'static str),

    #[error("Message group (tag 0x61) is missing")]
    MissingMessageGroup,

    #[error("Schema mismatch: expected {expected}, found {found}")]
    SchemaMismatch { expected: String, found: String },

    #[error("No schema registered for document ref 0x{document_ref:04X} version {version}")]
    UnknownSchema { document_ref: u16, version: u8 },

    #[error("Required feature '{0}' is missing")]
    RequiredFeatureMissing(String),

    #[error("Feature '{0}' holds a negative integer")]
    NegativeInteger(String),

    #[error("Feature '{feature}' expects a {expected} value")]
    TypeMismatch {
        feature: String,
        expected: &'static str,
    },

    #[error("Unrecognized barcode identifier '{0}'")]
    UnrecognizedIdentifier(String),

    #[error("Compression error: {0}")]
    Compression(String),
}

impl ProtocolError {
    /// Returns true if the error was raised by the schema mapper
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Self::SchemaMismatch { .. }
                | Self::UnknownSchema { .. }
                | Self::RequiredFeatureMissing(_)
                | Self::NegativeInteger(_)
                | Self::TypeMismatch { .. }
        )
    }

    /// Returns true if the input bytes or text were structurally invalid
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Self::MalformedLength(_)
                | Self::TruncatedInput(_)
                | Self::InvalidMagic(_)
                | Self::UnknownTag(_)
                | Self::UnexpectedTag { .. }
                | Self::DuplicateElement(_)
                | Self::MissingMessageGroup
                | Self::UnrecognizedIdentifier(_)
        )
    }

    /// Returns a suggestion for how to fix this error, if available
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::UnsupportedVersion(_) => Some("Only ICAO VDS versions 3 and 4 are supported"),
            Self::InvalidCharacter(_) => {
                Some("C40 text may only contain A-Z, 0-9, space and the filler '<'")
            }
            Self::UnknownSchema { .. } => {
                Some("Register a schema for this document type in the SchemaRegistry")
            }
            Self::UnrecognizedIdentifier(_) => {
                Some("Barcode text must start with 'RDB1' (or legacy 'NDB1')")
            }
            _ => None,
        }
    }
}

impl From<io::Error> for ProtocolError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => ProtocolError::TruncatedInput("binary field"),
            _ => ProtocolError::InvalidFormat(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let err = ProtocolError::RequiredFeatureMissing("MRZ".to_string());
        assert!(err.is_schema_error());
        assert!(!err.is_malformed_input());

        let err = ProtocolError::UnknownTag(0x42);
        assert!(err.is_malformed_input());
        assert!(!err.is_schema_error());
    }

    #[test]
    fn test_io_eof_maps_to_truncated() {
        let io_err = io::Error::new(io::ErrorKind::UnexpectedEof, "eof");
        assert_eq!(
            ProtocolError::from(io_err),
            ProtocolError::TruncatedInput("binary field")
        );
    }

    #[test]
    fn test_error_display() {
        let err = ProtocolError::UnknownTag(0x42);
        assert_eq!(err.to_string(), "Unknown top-level tag 0x42");
        assert!(ProtocolError::UnsupportedVersion(7).suggestion().is_some());
    }
}
