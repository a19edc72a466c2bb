//! Visible Digital Seal (ICAO 9303 Part 13)
//!
//! A seal is a header followed by document-specific message TLVs and an
//! optional signature TLV:
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Header (18 bytes or more)         │
//! ├─────────────────────────────────────┤
//! │   Message TLVs                      │
//! ├─────────────────────────────────────┤
//! │   TLV(0xFF, r ‖ s)  (optional)      │
//! └─────────────────────────────────────┘
//! ```
//!
//! The signature covers the header and message bytes only.

pub mod header;
pub mod seal;

pub use header::{VdsHeader, VdsVersion};
pub use seal::Seal;

/// First byte of every seal
pub const MAGIC: u8 = 0xDC;
