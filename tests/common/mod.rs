//! Common test utilities for icao-seal integration tests
//!
//! Published ICAO sample data and small constructors shared by the
//! integration test files.

#![allow(dead_code)]

use chrono::NaiveDate;
use icao_seal::prelude::*;

/// ICAO sample emergency travel document seal (hex)
pub const ETD_SEAL_HEX: &str = "dc03d9c5d9cac8a73a990f7134b834595e0302308a0d62b9d917a4cca93ca4d0edfc133c133c133c133c133c3fef3a2938ee43f1593d1ae52dbb26751fe64b7c133c136bff403644690e5f2dd4e39b8bf10b4db669a38e60c8e6a46b3da0d7ad0f6aaf59af2326e924e4f96033ea096e89b8a5265aa9f2a39435f17120febf9334af51618d94";

/// MRZ carried by [`ETD_SEAL_HEX`]
pub const ETD_MRZ: &str =
    "I<GBRSUPAMANN<<MARY<<<<<<<<<<<<<<<<<6525845096USA7008038M2201018<<<<<<06";

/// Unsigned, uncompressed sample barcode
pub const UNSIGNED_BARCODE: &str = "RDB1ANK6GCEQECCYLDMVTWS23NN5YXG5LXPF5X27Q";

pub fn etd_seal_bytes() -> Vec<u8> {
    hex::decode(ETD_SEAL_HEX).expect("valid hex")
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Visa seal with every required field set
pub fn visa_builder() -> SealBuilder<'static> {
    let schema = SchemaRegistry::builtin()
        .get(0x5D01, 4)
        .expect("builtin visa schema");
    SealBuilder::new(schema)
        .issuing_country("D<<")
        .signer("DETS", "32")
        .issuing_date(date(2023, 9, 1))
        .signature_date(date(2023, 9, 2))
        .field("PASSPORT_NUMBER", "C01X00T47")
        .field("DURATION_OF_STAY", vec![0x00, 0x5A, 0x00])
}

/// Install a test subscriber honouring RUST_LOG; safe to call repeatedly
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
