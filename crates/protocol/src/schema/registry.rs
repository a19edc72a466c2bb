//! Schema lookup by document reference and version

use crate::error::{ProtocolError, Result};
use crate::schema::{Feature, FeatureType, FieldMap, Schema};
use crate::vds::Seal;
use lazy_static::lazy_static;
use std::collections::HashMap;

/// Document reference of the ICAO visa
pub const ICAO_VISA: u16 = 0x5D01;

/// Document reference of the ICAO emergency travel document
pub const ICAO_EMERGENCY_TRAVEL_DOCUMENT: u16 = 0x5E03;

lazy_static! {
    static ref BUILTIN: SchemaRegistry = {
        let mut registry = SchemaRegistry::new();
        registry.register(icao_visa());
        registry.register(icao_emergency_travel_document());
        registry
    };
}

/// Schemas keyed by `(document_ref, version)`
///
/// Populate once, then share immutably.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<(u16, u8), Schema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the ICAO visa and emergency travel document schemas
    pub fn builtin() -> &'static SchemaRegistry {
        &BUILTIN
    }

    /// Load a JSON array of schemas
    pub fn from_json(json: &str) -> Result<Self> {
        let schemas: Vec<Schema> = serde_json::from_str(json)
            .map_err(|e| ProtocolError::InvalidFormat(format!("schema JSON: {}", e)))?;
        let mut registry = Self::new();
        for schema in schemas {
            registry.register(schema);
        }
        Ok(registry)
    }

    /// Add a schema, returning any schema it replaces
    pub fn register(&mut self, schema: Schema) -> Option<Schema> {
        self.schemas
            .insert((schema.document_ref, schema.version), schema)
    }

    pub fn get(&self, document_ref: u16, version: u8) -> Option<&Schema> {
        self.schemas.get(&(document_ref, version))
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.values()
    }

    /// Find the schema named by the seal header and map the seal's fields
    pub fn decode_seal(&self, seal: &Seal) -> Result<(&Schema, FieldMap)> {
        let document_ref = seal.header.document_ref();
        let version = seal.header.version.icao_version();
        let schema = self
            .get(document_ref, version)
            .ok_or(ProtocolError::UnknownSchema {
                document_ref,
                version,
            })?;
        Ok((schema, schema.decode_seal(seal)?))
    }
}

fn icao_visa() -> Schema {
    Schema::new(
        "icao_visa",
        ICAO_VISA,
        4,
        vec![
            Feature::optional(0x01, "MRZ_MRVA", FeatureType::Mrz),
            Feature::optional(0x02, "MRZ_MRVB", FeatureType::Mrz),
            Feature::optional(0x03, "NUMBER_OF_ENTRIES", FeatureType::Integer),
            Feature::required(0x04, "DURATION_OF_STAY", FeatureType::Bytes),
            Feature::required(0x05, "PASSPORT_NUMBER", FeatureType::C40),
            Feature::optional(0x06, "VISA_TYPE", FeatureType::Bytes),
            Feature::optional(0x07, "ADDITIONAL_FEATURE", FeatureType::Bytes),
        ],
    )
}

fn icao_emergency_travel_document() -> Schema {
    Schema::new(
        "icao_emergency_travel_document",
        ICAO_EMERGENCY_TRAVEL_DOCUMENT,
        4,
        vec![Feature::required(0x02, "MRZ", FeatureType::Mrz)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_schemas() {
        let registry = SchemaRegistry::builtin();
        assert_eq!(registry.len(), 2);
        let visa = registry.get(ICAO_VISA, 4).unwrap();
        assert_eq!(visa.name, "icao_visa");
        assert!(visa.feature("PASSPORT_NUMBER").unwrap().required);
        assert!(registry.get(ICAO_VISA, 3).is_none());
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = SchemaRegistry::new();
        assert!(registry.register(icao_visa()).is_none());
        let replaced = registry.register(Schema::new("custom", ICAO_VISA, 4, Vec::new()));
        assert_eq!(replaced.unwrap().name, "icao_visa");
        assert_eq!(registry.get(ICAO_VISA, 4).unwrap().name, "custom");
    }

    #[test]
    fn test_from_json() {
        let registry = SchemaRegistry::from_json(
            r#"[
                { "name": "a", "documentRef": 4097, "version": 3,
                  "features": [{ "tag": 1, "name": "X", "type": "bytes" }] },
                { "name": "b", "documentRef": 4097, "version": 4, "features": [] }
            ]"#,
        )
        .unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(0x1001, 3).unwrap().name, "a");

        assert!(matches!(
            SchemaRegistry::from_json("{"),
            Err(ProtocolError::InvalidFormat(_))
        ));
    }
}
