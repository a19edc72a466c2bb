//! Seal and barcode signatures
//!
//! | Format  | Signed bytes                      | Digest                       |
//! |---------|-----------------------------------|------------------------------|
//! | VDS     | header ‖ message TLVs             | from the key's field size    |
//! | IDB     | header ‖ TLV(0x61, messages)      | from the header's algorithm  |

use crate::digest::DigestAlgorithm;
use crate::ecdsa::{sign, verify, SigningInput};
use crate::error::{CryptoError, Result};
use crate::keys::{PrivateKey, PublicKey};
use icao_seal_protocol::{IcaoBarcode, IdbSignature, Seal, VdsSignature};
use tracing::debug;

/// Options for seal signing and verification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignOptions {
    /// Let the curve hash the message with its own digest instead of picking
    /// one from the field size
    pub prehash: bool,
}

/// Sign a seal in place, replacing any existing signature
pub fn sign_seal(seal: &mut Seal, key: &PrivateKey, options: SignOptions) -> Result<()> {
    let data = seal.signed_bytes()?;
    let raw = if options.prehash {
        sign(key, SigningInput::Message(&data))?
    } else {
        let digest = DigestAlgorithm::for_field_size(key.field_size())?.digest(&data);
        sign(key, SigningInput::Digest(&digest))?
    };
    seal.signature = Some(VdsSignature::from_raw(&raw)?);
    debug!(curve = key.curve().name(), "signed seal");
    Ok(())
}

/// Verify a seal's signature
pub fn verify_seal(seal: &Seal, key: &PublicKey, options: SignOptions) -> Result<bool> {
    let signature = seal.signature.as_ref().ok_or(CryptoError::EmptySignature)?;
    let data = seal.signed_bytes()?;
    let der = signature.to_der();
    if options.prehash {
        verify(key, &der, SigningInput::Message(&data))
    } else {
        let digest = DigestAlgorithm::for_field_size(key.field_size())?.digest(&data);
        verify(key, &der, SigningInput::Digest(&digest))
    }
}

/// Sign a barcode in place with the algorithm its header declares
pub fn sign_barcode(barcode: &mut IcaoBarcode, key: &PrivateKey) -> Result<()> {
    let digest = barcode_digest(barcode)?.digest(&barcode.signed_bytes()?);
    let raw = sign(key, SigningInput::Digest(&digest))?;
    barcode.payload.signature = Some(IdbSignature::from_raw(&raw)?);
    debug!(curve = key.curve().name(), "signed barcode");
    Ok(())
}

/// Verify a barcode's signature
pub fn verify_barcode(barcode: &IcaoBarcode, key: &PublicKey) -> Result<bool> {
    let signature = barcode
        .payload
        .signature
        .as_ref()
        .ok_or(CryptoError::EmptySignature)?;
    let digest = barcode_digest(barcode)?.digest(&barcode.signed_bytes()?);
    verify(key, &signature.to_der(), SigningInput::Digest(&digest))
}

fn barcode_digest(barcode: &IcaoBarcode) -> Result<DigestAlgorithm> {
    barcode
        .payload
        .header
        .signature
        .as_ref()
        .map(|info| DigestAlgorithm::from(info.algorithm))
        .ok_or(CryptoError::MissingSignatureAlgorithm)
}
