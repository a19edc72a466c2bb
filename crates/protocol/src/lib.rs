//! ICAO Seal Protocol Types
//!
//! Wire format for ICAO 9303 machine-readable security markings:
//! - TLV codec with DER-style lengths
//! - C40 text compaction and date packing
//! - Visible Digital Seal header and seal structure
//! - ICAO Datastructure for Barcode payload and text envelope
//! - Schema-driven mapping between message TLVs and named fields
//!
//! This crate contains NO cryptographic operations and NO I/O.
//! Signing and verification live in `icao-seal-crypto`.

pub mod binary;
pub mod c40;
pub mod date;
pub mod error;
pub mod idb;
pub mod schema;
pub mod signature;
pub mod tlv;
pub mod vds;

// Re-export commonly used types
pub use binary::{BinaryRead, BinaryWrite};
pub use date::MaskedDate;
pub use error::{ProtocolError, Result};
pub use idb::{IcaoBarcode, IdbHeader, IdbPayload, IdbSignatureInfo, SignatureAlgorithm};
pub use schema::{Feature, FeatureType, FieldMap, FieldValue, Schema, SchemaRegistry};
pub use signature::{EcdsaSignature, IdbSignature, VdsSignature};
pub use tlv::Tlv;
pub use vds::{Seal, VdsHeader, VdsVersion};
