//! ICAO Seal Cryptographic Operations
//!
//! ECDSA signing and verification for Visible Digital Seals and IDB barcodes:
//! - Curve inference from raw key lengths (P-256, P-384, P-521)
//! - Field-size-driven digest selection (SHA-224 to SHA-512)
//! - Raw `r ‖ s` signatures on the wire, DER for verification
//!
//! # Security Features
//!
//! - **Zeroization**: private scalars are held in `zeroize::Zeroizing`
//! - **Feature-gated curves**: `p256`, `p384` and `p521` can be disabled
//!
//! # Example
//!
//! ```
//! use icao_seal_crypto::{sign_seal, verify_seal, EcCurve, PrivateKey, SignOptions};
//! use icao_seal_protocol::{Seal, Tlv, VdsHeader, VdsVersion};
//! use chrono::NaiveDate;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let header = VdsHeader::new(VdsVersion::V4, "UTO", "UTTS", "5B", date, date, 0x5E03)?;
//! let mut seal = Seal::new(header, vec![Tlv::new(0x02, vec![0x01])?]);
//!
//! let key = PrivateKey::generate(EcCurve::P256)?;
//! sign_seal(&mut seal, &key, SignOptions::default())?;
//! assert!(verify_seal(&seal, &key.public_key()?, SignOptions::default())?);
//! # Ok(())
//! # }
//! ```

pub mod digest;
pub mod ecdsa;
pub mod error;
pub mod keys;
pub mod signing;

// Re-export commonly used types
pub use digest::DigestAlgorithm;
pub use error::{CryptoError, Result};
pub use keys::{EcCurve, PrivateKey, PublicKey};
pub use signing::{sign_barcode, sign_seal, verify_barcode, verify_seal, SignOptions};

#[cfg(feature = "p256")]
pub use p256;

#[cfg(feature = "p384")]
pub use p384;

#[cfg(feature = "p521")]
pub use p521;
