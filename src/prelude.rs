//! ICAO Seal Prelude
//!
//! The prelude module provides a convenient way to import commonly used types and traits.
//!
//! # Example
//!
//! ```rust
//! use icao_seal::prelude::*;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = SchemaRegistry::builtin().get(0x5E03, 4).unwrap();
//! let key = PrivateKey::generate(EcCurve::P256)?;
//! let seal = SealBuilder::new(schema)
//!     .issuing_country("UTO")
//!     .signer("UTTS", "5B")
//!     .field("MRZ", "I<UTOERIKSSON<<ANNA<MARIA")
//!     .sign(&key, SignOptions::default())?;
//! let bytes = seal.to_bytes()?; // Works without importing anything else
//! # Ok(())
//! # }
//! ```

// Re-export core types
pub use crate::document::{BarcodeBuilder, SealBuilder, SealDocument};
pub use crate::error::IcaoSealError;

// Re-export protocol types
pub use icao_seal_protocol::{
    BinaryRead, BinaryWrite, Feature, FeatureType, FieldMap, FieldValue, IcaoBarcode, IdbHeader,
    IdbPayload, IdbSignature, IdbSignatureInfo, MaskedDate, ProtocolError, Schema,
    SchemaRegistry, Seal, SignatureAlgorithm, Tlv, VdsHeader, VdsSignature, VdsVersion,
};

// Re-export crypto types
pub use icao_seal_crypto::{
    sign_barcode, sign_seal, verify_barcode, verify_seal, CryptoError, DigestAlgorithm, EcCurve,
    PrivateKey, PublicKey, SignOptions,
};
