//! Unified error type for the public API
//!
//! The protocol and crypto crates keep their own error types for precise
//! handling. This type wraps both so callers of the high-level API deal with
//! a single error.
//!
//! # Example
//!
//! ```no_run
//! use icao_seal::{IcaoSealError, SealDocument};
//!
//! fn read_seal(bytes: &[u8]) -> Result<(), IcaoSealError> {
//!     let document = SealDocument::decode(bytes)?;
//!     println!("{}", document.schema_name());
//!     Ok(())
//! }
//! ```

use icao_seal_crypto::CryptoError;
use icao_seal_protocol::ProtocolError;
use thiserror::Error;

/// Unified error type for all seal and barcode operations
///
/// # Error Categories
///
/// - **Protocol**: malformed wire data, schema mismatches, bad field values
/// - **Crypto**: key, digest or signature failures
/// - **Builder**: a builder was finished without a required setting
#[derive(Debug, Error)]
pub enum IcaoSealError {
    /// Wire format or schema error
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Signing or verification error
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Builder finished without a required setting
    #[error("Missing required field: {field}")]
    MissingRequiredField { field: &'static str },
}

impl IcaoSealError {
    /// The underlying protocol error, including one raised inside a crypto operation
    pub fn protocol_error(&self) -> Option<&ProtocolError> {
        match self {
            Self::Protocol(e) | Self::Crypto(CryptoError::Protocol(e)) => Some(e),
            _ => None,
        }
    }

    /// Returns true if this is a wire format or schema error
    pub fn is_protocol_error(&self) -> bool {
        self.protocol_error().is_some()
    }

    /// Returns true if this is a cryptographic error
    pub fn is_crypto_error(&self) -> bool {
        matches!(self, Self::Crypto(e) if !matches!(e, CryptoError::Protocol(_)))
    }

    /// Returns true if the data did not match the expected schema
    pub fn is_schema_error(&self) -> bool {
        self.protocol_error()
            .map(ProtocolError::is_schema_error)
            .unwrap_or(false)
    }

    /// Returns a suggestion for resolving this error
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Crypto(CryptoError::UnsupportedFieldSize(_)) => {
                Some("Curves wider than 512 bits need SignOptions { prehash: true }")
            }
            Self::Crypto(CryptoError::MissingSignatureAlgorithm) => {
                Some("Call BarcodeBuilder::signed_by before signing a barcode")
            }
            Self::MissingRequiredField { .. } => Some("Set the field on the builder before building"),
            _ => self.protocol_error().and_then(ProtocolError::suggestion),
        }
    }
}
