//! High-level seal and barcode API
//!
//! This module provides a fluent API for the common operations: decoding a
//! seal straight to named fields, and building (optionally signed) seals and
//! barcodes from named fields.

use crate::error::IcaoSealError;
use chrono::{NaiveDate, Utc};
use icao_seal_crypto::{sign_barcode, sign_seal, verify_seal, PrivateKey, PublicKey, SignOptions};
use icao_seal_protocol::{
    FieldMap, FieldValue, IcaoBarcode, IdbHeader, IdbPayload, IdbSignatureInfo, MaskedDate,
    Schema, SchemaRegistry, Seal, SignatureAlgorithm, Tlv, VdsHeader, VdsVersion,
};
use tracing::debug;

type Result<T> = std::result::Result<T, IcaoSealError>;

/// A decoded seal together with its schema-mapped fields
///
/// # Examples
///
/// ```no_run
/// use icao_seal::SealDocument;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let bytes: Vec<u8> = Vec::new();
/// let document = SealDocument::decode(&bytes)?;
/// if let Some(mrz) = document.field("MRZ").and_then(|v| v.as_text()) {
///     println!("{}", mrz);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealDocument {
    seal: Seal,
    schema_name: String,
    fields: FieldMap,
}

impl SealDocument {
    /// Decode with the built-in ICAO schemas
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Self::decode_with(bytes, SchemaRegistry::builtin())
    }

    /// Decode, looking the schema up in `registry`
    pub fn decode_with(bytes: &[u8], registry: &SchemaRegistry) -> Result<Self> {
        let seal = Seal::from_bytes(bytes)?;
        let (schema, fields) = registry.decode_seal(&seal)?;
        debug!(schema = %schema.name, fields = fields.len(), "decoded seal");
        Ok(Self {
            schema_name: schema.name.clone(),
            fields,
            seal,
        })
    }

    pub fn seal(&self) -> &Seal {
        &self.seal
    }

    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Verify the seal signature
    pub fn verify(&self, key: &PublicKey, options: SignOptions) -> Result<bool> {
        Ok(verify_seal(&self.seal, key, options)?)
    }

    pub fn into_seal(self) -> Seal {
        self.seal
    }
}

/// Builder for a seal of a given schema
pub struct SealBuilder<'a> {
    schema: &'a Schema,
    issuing_country: Option<String>,
    signer_identifier: Option<String>,
    certificate_reference: String,
    issuing_date: Option<NaiveDate>,
    signature_date: Option<NaiveDate>,
    fields: FieldMap,
}

impl<'a> SealBuilder<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            issuing_country: None,
            signer_identifier: None,
            certificate_reference: String::new(),
            issuing_date: None,
            signature_date: None,
            fields: FieldMap::new(),
        }
    }

    /// Three letter issuing country
    #[must_use]
    pub fn issuing_country(mut self, country: impl Into<String>) -> Self {
        self.issuing_country = Some(country.into());
        self
    }

    /// Signer identifier and certificate reference
    #[must_use]
    pub fn signer(mut self, identifier: impl Into<String>, certificate_reference: impl Into<String>) -> Self {
        self.signer_identifier = Some(identifier.into());
        self.certificate_reference = certificate_reference.into();
        self
    }

    /// Set the issuing date (default: today, UTC)
    #[must_use]
    pub fn issuing_date(mut self, date: NaiveDate) -> Self {
        self.issuing_date = Some(date);
        self
    }

    /// Set the signature date (default: today, UTC)
    #[must_use]
    pub fn signature_date(mut self, date: NaiveDate) -> Self {
        self.signature_date = Some(date);
        self
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Build an unsigned seal
    pub fn build(self) -> Result<Seal> {
        let issuing_country = self
            .issuing_country
            .ok_or(IcaoSealError::MissingRequiredField {
                field: "issuing_country",
            })?;
        let signer_identifier = self
            .signer_identifier
            .ok_or(IcaoSealError::MissingRequiredField { field: "signer" })?;
        let today = Utc::now().date_naive();
        let version = VdsVersion::from_raw(self.schema.version.wrapping_sub(1))?;

        let header = VdsHeader::new(
            version,
            issuing_country,
            signer_identifier,
            self.certificate_reference,
            self.issuing_date.unwrap_or(today),
            self.signature_date.unwrap_or(today),
            self.schema.document_ref,
        )?;
        let messages = self.schema.encode_fields(&self.fields)?;
        Ok(Seal::new(header, messages))
    }

    /// Build and sign
    pub fn sign(self, key: &PrivateKey, options: SignOptions) -> Result<Seal> {
        let mut seal = self.build()?;
        sign_seal(&mut seal, key, options)?;
        Ok(seal)
    }
}

/// Builder for an IDB barcode
#[derive(Debug, Clone)]
pub struct BarcodeBuilder {
    country: String,
    messages: Vec<(u8, Vec<u8>)>,
    zipped: bool,
    signature_info: Option<IdbSignatureInfo>,
    certificate: Option<Vec<u8>>,
}

impl BarcodeBuilder {
    pub fn new(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            messages: Vec::new(),
            zipped: false,
            signature_info: None,
            certificate: None,
        }
    }

    /// Append a message to the message group
    #[must_use]
    pub fn message(mut self, tag: u8, value: impl Into<Vec<u8>>) -> Self {
        self.messages.push((tag, value.into()));
        self
    }

    /// Compress the payload
    #[must_use]
    pub fn zipped(mut self, zipped: bool) -> Self {
        self.zipped = zipped;
        self
    }

    /// Declare the signature algorithm, certificate reference and date
    #[must_use]
    pub fn signed_by(
        mut self,
        algorithm: SignatureAlgorithm,
        certificate_reference: [u8; 5],
        signature_creation_date: MaskedDate,
    ) -> Self {
        self.signature_info = Some(IdbSignatureInfo {
            algorithm,
            certificate_reference,
            signature_creation_date,
        });
        self
    }

    /// Embed the signer certificate
    #[must_use]
    pub fn certificate(mut self, certificate: impl Into<Vec<u8>>) -> Self {
        self.certificate = Some(certificate.into());
        self
    }

    /// Build without signing
    pub fn build(self) -> Result<IcaoBarcode> {
        let header = match self.signature_info {
            Some(info) => IdbHeader::signed(self.country, info)?,
            None => IdbHeader::unsigned(self.country)?,
        };
        let messages = self
            .messages
            .into_iter()
            .map(|(tag, value)| Tlv::new(tag, value))
            .collect::<icao_seal_protocol::Result<Vec<_>>>()?;

        let mut payload = IdbPayload::new(header, messages);
        payload.certificate = self.certificate;
        Ok(IcaoBarcode::new(payload, self.zipped))
    }

    /// Build and sign with the declared algorithm
    pub fn sign(self, key: &PrivateKey) -> Result<IcaoBarcode> {
        let mut barcode = self.build()?;
        sign_barcode(&mut barcode, key)?;
        Ok(barcode)
    }
}
