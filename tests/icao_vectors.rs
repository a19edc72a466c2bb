//! ICAO Sample Data Tests
//!
//! Decoding and re-encoding of published ICAO samples:
//! - Emergency travel document seal (VDS version 4, signed)
//! - Unsigned IDB barcode
//! - C40 compaction examples

mod common;

use common::*;
use icao_seal::prelude::*;
use icao_seal::protocol::c40;

#[test]
fn test_etd_seal_header() {
    let seal = Seal::from_bytes(&etd_seal_bytes()).expect("sample seal decodes");
    let header = &seal.header;

    assert_eq!(header.version, VdsVersion::V4);
    assert_eq!(header.issuing_country, "UTO");
    assert_eq!(header.signer_identifier, "UTTS");
    assert_eq!(header.certificate_reference, "5B");
    assert_eq!(header.issuing_date, date(2020, 1, 1));
    assert_eq!(header.signature_date, date(2025, 12, 7));
    assert_eq!(header.document_ref(), 0x5E03);

    assert_eq!(seal.messages.len(), 1);
    assert_eq!(seal.messages[0].tag, 0x02);
    assert_eq!(seal.messages[0].value.len(), 48);

    let signature = seal.signature.as_ref().expect("sample seal is signed");
    assert_eq!(signature.component_len(), 32);
}

#[test]
fn test_etd_seal_mrz() {
    let document = SealDocument::decode(&etd_seal_bytes()).expect("sample seal maps");
    assert_eq!(document.schema_name(), "icao_emergency_travel_document");
    assert_eq!(document.field("MRZ").and_then(FieldValue::as_text), Some(ETD_MRZ));
}

#[test]
fn test_etd_seal_reencodes_identically() {
    let bytes = etd_seal_bytes();
    let seal = Seal::from_bytes(&bytes).unwrap();
    assert_eq!(seal.to_bytes().unwrap(), bytes);

    let signed = seal.signed_bytes().unwrap();
    assert_eq!(signed.len(), bytes.len() - 66);
    assert_eq!(seal.signature_bytes().unwrap(), bytes[signed.len()..].to_vec());
}

#[test]
fn test_etd_schema_mismatch_against_visa() {
    let seal = Seal::from_bytes(&etd_seal_bytes()).unwrap();
    let visa = SchemaRegistry::builtin().get(0x5D01, 4).unwrap();
    let err = visa.decode_seal(&seal).unwrap_err();
    assert!(matches!(err, ProtocolError::SchemaMismatch { .. }));
    assert!(err.is_schema_error());
}

#[test]
fn test_unknown_schema() {
    let seal = Seal::from_bytes(&etd_seal_bytes()).unwrap();
    let err = SealDocument::decode_with(&seal.to_bytes().unwrap(), &SchemaRegistry::new())
        .unwrap_err();
    assert!(err.is_schema_error());
    assert!(err.suggestion().is_some());
}

#[test]
fn test_unsigned_barcode() {
    let barcode = IcaoBarcode::decode(UNSIGNED_BARCODE).unwrap();
    assert!(!barcode.is_signed());
    assert!(!barcode.is_zipped);
    assert_eq!(barcode.payload.header.country_identifier, "D<<");

    let message = barcode.payload.message(4).unwrap();
    assert_eq!(
        hex::encode(&message.value),
        "b0b1b2b3b4b5b6b7b8b9babbbcbdbebf"
    );
    assert_eq!(barcode.encode().unwrap(), UNSIGNED_BARCODE);
}

#[test]
fn test_c40_examples() {
    assert_eq!(c40::encode("XK CD").unwrap(), vec![0xEB, 0x04, 0x66, 0xA9]);
    assert_eq!(c40::encode("XKCD").unwrap(), vec![0xEB, 0x11, 0xFE, 0x45]);
    assert_eq!(c40::decode(&[0xEB, 0x11, 0xFE, 0x45]).unwrap(), "XKCD");
}

#[test]
fn test_builder_output_reencodes_identically() {
    let seal = visa_builder()
        .field("VISA_TYPE", vec![0x01])
        .build()
        .unwrap();
    let bytes = seal.to_bytes().unwrap();
    assert_eq!(Seal::from_bytes(&bytes).unwrap().to_bytes().unwrap(), bytes);
}

#[test]
fn test_custom_registry_from_json() {
    let etd = SchemaRegistry::builtin().get(0x5E03, 4).unwrap();
    let json = serde_json::to_string(&vec![etd.clone()]).unwrap();
    let registry = SchemaRegistry::from_json(&json).unwrap();
    assert_eq!(registry.len(), 1);

    let document = SealDocument::decode_with(&etd_seal_bytes(), &registry).unwrap();
    assert_eq!(document.field("MRZ").and_then(FieldValue::as_text), Some(ETD_MRZ));

    // a renamed feature shows up under the new name
    let renamed = serde_json::json!([{
        "name": "etd_short",
        "documentRef": 0x5E03,
        "version": 4,
        "features": [{ "tag": 2, "name": "MACHINE_READABLE_ZONE", "type": "mrz" }]
    }]);
    let registry = SchemaRegistry::from_json(&renamed.to_string()).unwrap();
    let document = SealDocument::decode_with(&etd_seal_bytes(), &registry).unwrap();
    assert_eq!(document.schema_name(), "etd_short");
    assert!(document.field("MRZ").is_none());
    assert!(document.field("MACHINE_READABLE_ZONE").is_some());
}
