//! Declarative mapping between message TLVs and named fields
//!
//! A [`Schema`] lists the features a document type carries: tag, name,
//! semantic type and whether the feature must be present. The mapper walks
//! that list in order, so decoding does not depend on where a tag sits in the
//! message list, and encoding always emits features in schema order.
//!
//! Schemas are plain data. They deserialize from JSON:
//!
//! ```json
//! {
//!   "name": "icao_etd",
//!   "documentRef": 24067,
//!   "version": 4,
//!   "features": [
//!     { "tag": 2, "name": "MRZ", "type": "mrz", "required": true }
//!   ]
//! }
//! ```

pub mod registry;

pub use registry::SchemaRegistry;

use crate::c40;
use crate::date::{decode_date, encode_date, MaskedDate};
use crate::error::{ProtocolError, Result};
use crate::tlv::Tlv;
use crate::vds::{Seal, VdsHeader};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Decoded fields keyed by feature name
pub type FieldMap = BTreeMap<String, FieldValue>;

/// How a feature's value bytes are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureType {
    /// C40 text, spaces kept as spaces
    C40,
    /// C40 text with spaces shown as the MRZ filler `<`
    Mrz,
    Utf8String,
    Bytes,
    /// Unsigned big-endian integer
    Integer,
    Date,
    MaskedDate,
}

impl FeatureType {
    fn value_kind(self) -> &'static str {
        match self {
            FeatureType::C40 | FeatureType::Mrz | FeatureType::Utf8String => "text",
            FeatureType::Bytes => "bytes",
            FeatureType::Integer => "integer",
            FeatureType::Date => "date",
            FeatureType::MaskedDate => "masked date",
        }
    }
}

/// One feature of a document type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub tag: u8,
    pub name: String,
    #[serde(rename = "type")]
    pub feature_type: FeatureType,
    #[serde(default)]
    pub required: bool,
}

impl Feature {
    pub fn new(tag: u8, name: impl Into<String>, feature_type: FeatureType, required: bool) -> Self {
        Self {
            tag,
            name: name.into(),
            feature_type,
            required,
        }
    }

    pub fn required(tag: u8, name: impl Into<String>, feature_type: FeatureType) -> Self {
        Self::new(tag, name, feature_type, true)
    }

    pub fn optional(tag: u8, name: impl Into<String>, feature_type: FeatureType) -> Self {
        Self::new(tag, name, feature_type, false)
    }
}

/// Typed field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Bytes(Vec<u8>),
    Integer(i64),
    Date(NaiveDate),
    MaskedDate(MaskedDate),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FieldValue::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(date) => Some(*date),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Text(text.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        FieldValue::Text(text)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(bytes: Vec<u8>) -> Self {
        FieldValue::Bytes(bytes)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(date: NaiveDate) -> Self {
        FieldValue::Date(date)
    }
}

impl From<MaskedDate> for FieldValue {
    fn from(date: MaskedDate) -> Self {
        FieldValue::MaskedDate(date)
    }
}

/// Feature list of one document type and version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    pub name: String,
    /// `(feature reference << 8) | type category`
    pub document_ref: u16,
    /// ICAO version (3 or 4)
    pub version: u8,
    pub features: Vec<Feature>,
}

impl Schema {
    pub fn new(
        name: impl Into<String>,
        document_ref: u16,
        version: u8,
        features: Vec<Feature>,
    ) -> Self {
        Self {
            name: name.into(),
            document_ref,
            version,
            features,
        }
    }

    pub fn feature(&self, name: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.name == name)
    }

    /// Fail unless the header names this schema's document type and version
    pub fn check(&self, header: &VdsHeader) -> Result<()> {
        let version = header.version.icao_version();
        if version != self.version || header.document_ref() != self.document_ref {
            return Err(ProtocolError::SchemaMismatch {
                expected: describe(self.document_ref, self.version),
                found: describe(header.document_ref(), version),
            });
        }
        Ok(())
    }

    /// Check the seal header and map its messages to fields
    pub fn decode_seal(&self, seal: &Seal) -> Result<FieldMap> {
        self.check(&seal.header)?;
        self.decode_messages(&seal.messages)
    }

    /// Map message TLVs to fields, in schema order
    pub fn decode_messages(&self, messages: &[Tlv]) -> Result<FieldMap> {
        let mut fields = FieldMap::new();
        for feature in &self.features {
            match messages.iter().find(|m| m.tag == feature.tag) {
                Some(message) => {
                    let value = decode_value(feature.feature_type, &message.value)?;
                    fields.insert(feature.name.clone(), value);
                }
                None if feature.required => {
                    return Err(ProtocolError::RequiredFeatureMissing(feature.name.clone()))
                }
                None => {}
            }
        }
        Ok(fields)
    }

    /// Build message TLVs from named fields, in schema order
    pub fn encode_fields(&self, fields: &FieldMap) -> Result<Vec<Tlv>> {
        let mut messages = Vec::with_capacity(fields.len());
        for feature in &self.features {
            match fields.get(&feature.name) {
                Some(value) => messages.push(Tlv::new(feature.tag, encode_value(feature, value)?)?),
                None if feature.required => {
                    return Err(ProtocolError::RequiredFeatureMissing(feature.name.clone()))
                }
                None => {}
            }
        }
        Ok(messages)
    }
}

fn describe(document_ref: u16, version: u8) -> String {
    format!("document 0x{:04X} version {}", document_ref, version)
}

/// Interpret value bytes according to `feature_type`
pub fn decode_value(feature_type: FeatureType, bytes: &[u8]) -> Result<FieldValue> {
    Ok(match feature_type {
        FeatureType::C40 => FieldValue::Text(c40::decode(bytes)?),
        FeatureType::Mrz => FieldValue::Text(c40::decode(bytes)?.replace(' ', "<")),
        FeatureType::Utf8String => FieldValue::Text(
            String::from_utf8(bytes.to_vec())
                .map_err(|e| ProtocolError::InvalidFormat(e.to_string()))?,
        ),
        FeatureType::Bytes => FieldValue::Bytes(bytes.to_vec()),
        FeatureType::Integer => FieldValue::Integer(decode_integer(bytes)?),
        FeatureType::Date => FieldValue::Date(decode_date(bytes)?),
        FeatureType::MaskedDate => FieldValue::MaskedDate(MaskedDate::decode(bytes)?),
    })
}

/// Produce value bytes for `feature`
pub fn encode_value(feature: &Feature, value: &FieldValue) -> Result<Vec<u8>> {
    let mismatch = || ProtocolError::TypeMismatch {
        feature: feature.name.clone(),
        expected: feature.feature_type.value_kind(),
    };
    match (feature.feature_type, value) {
        (FeatureType::C40 | FeatureType::Mrz, FieldValue::Text(text)) => c40::encode(text),
        (FeatureType::Utf8String, FieldValue::Text(text)) => Ok(text.as_bytes().to_vec()),
        (FeatureType::Bytes, FieldValue::Bytes(bytes)) => Ok(bytes.clone()),
        (FeatureType::Integer, FieldValue::Integer(value)) => {
            if *value < 0 {
                return Err(ProtocolError::NegativeInteger(feature.name.clone()));
            }
            Ok(encode_integer(*value as u64))
        }
        (FeatureType::Date, FieldValue::Date(date)) => Ok(encode_date(*date)?.to_vec()),
        (FeatureType::MaskedDate, FieldValue::MaskedDate(date)) => Ok(date.encode().to_vec()),
        (FeatureType::MaskedDate, FieldValue::Text(text)) => {
            Ok(text.parse::<MaskedDate>()?.encode().to_vec())
        }
        _ => Err(mismatch()),
    }
}

fn encode_integer(value: u64) -> Vec<u8> {
    if value == 0 {
        return vec![0x00];
    }
    let bytes = value.to_be_bytes();
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len() - 1);
    bytes[start..].to_vec()
}

fn decode_integer(bytes: &[u8]) -> Result<i64> {
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    let magnitude = &bytes[start..];
    if magnitude.len() > 8 || (magnitude.len() == 8 && magnitude[0] & 0x80 != 0) {
        return Err(ProtocolError::InvalidLength {
            what: "integer",
            got: magnitude.len(),
        });
    }
    Ok(magnitude.iter().fold(0i64, |acc, b| (acc << 8) | *b as i64))
}
