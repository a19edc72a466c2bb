//! ICAO Datastructure for Barcode
//!
//! # Text form
//!
//! ```text
//! ┌──────────┬──────┬──────────────────────────────────────┐
//! │ "RDB1"   │ flag │ base32 (no padding) of the payload,   │
//! │          │ A..D │ zlib-compressed when the flag says so │
//! └──────────┴──────┴──────────────────────────────────────┘
//! ```
//!
//! The flag is `'A' + signed + 2·zipped`.
//!
//! # Payload
//!
//! ```text
//! ┌────────────────────────────┐
//! │ Header (2 or 12 bytes)     │
//! ├────────────────────────────┤
//! │ TLV(0x61, message TLVs)    │
//! ├────────────────────────────┤
//! │ TLV(0x7E, certificate)     │  optional
//! ├────────────────────────────┤
//! │ TLV(0x7F, r ‖ s)           │  optional
//! └────────────────────────────┘
//! ```

pub mod barcode;
pub mod header;
pub mod payload;

pub use barcode::IcaoBarcode;
pub use header::{IdbHeader, IdbSignatureInfo, SignatureAlgorithm};
pub use payload::IdbPayload;

/// Tag of the message group
pub const MESSAGE_GROUP_TAG: u8 = 0x61;

/// Tag of the signer certificate
pub const CERTIFICATE_TAG: u8 = 0x7E;

/// Barcode identifier written by this crate
pub const IDENTIFIER: &str = "RDB1";

/// Legacy identifier accepted when decoding
pub const LEGACY_IDENTIFIER: &str = "NDB1";
