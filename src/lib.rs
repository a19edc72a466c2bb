//! ICAO Visible Digital Seals and IDB barcodes
//!
//! This crate ties the wire format (`icao-seal-protocol`) and the signature
//! subsystem (`icao-seal-crypto`) together behind one error type and a small
//! builder API.
//!
//! ```no_run
//! use icao_seal::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let barcode = IcaoBarcode::decode("RDB1ANK6GCEQECCYLDMVTWS23NN5YXG5LXPF5X27Q")?;
//! assert_eq!(barcode.payload.header.country_identifier, "D<<");
//! # Ok(())
//! # }
//! ```

mod document;
mod error;
pub mod prelude;

pub use document::{BarcodeBuilder, SealBuilder, SealDocument};
pub use error::IcaoSealError;

pub use icao_seal_crypto as crypto;
pub use icao_seal_protocol as protocol;
