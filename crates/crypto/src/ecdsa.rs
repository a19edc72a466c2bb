//! ECDSA over raw key bytes
//!
//! Signing yields the raw `r ‖ s` form the seal formats carry; verification
//! takes ASN.1 DER. High-S signatures are accepted.

use crate::error::{CryptoError, Result};
use crate::keys::{with_curve, PrivateKey, PublicKey};
use tracing::debug;

/// What the signer is handed
#[derive(Debug, Clone, Copy)]
pub enum SigningInput<'a> {
    /// A digest computed by the caller
    Digest(&'a [u8]),
    /// The message itself, hashed with the curve's own digest
    Message(&'a [u8]),
}

/// Sign and return the raw `r ‖ s` encoding
pub fn sign(key: &PrivateKey, input: SigningInput<'_>) -> Result<Vec<u8>> {
    with_curve!(key.curve(), c => {
        use c::ecdsa::signature::hazmat::PrehashSigner;
        use c::ecdsa::signature::Signer;

        let signing_key = c::ecdsa::SigningKey::from_slice(key.as_bytes())
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        let signature: c::ecdsa::Signature = match input {
            SigningInput::Digest(digest) => signing_key.sign_prehash(digest),
            SigningInput::Message(message) => signing_key.try_sign(message),
        }
        .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
        Ok(signature.to_bytes().to_vec())
    })
}

/// Verify a DER signature
///
/// Returns `Ok(false)` for a well-formed signature that does not verify.
pub fn verify(key: &PublicKey, der: &[u8], input: SigningInput<'_>) -> Result<bool> {
    let valid = with_curve!(key.curve(), c => {
        use c::ecdsa::signature::hazmat::PrehashVerifier;
        use c::ecdsa::signature::Verifier;

        let verifying_key = c::ecdsa::VerifyingKey::from_sec1_bytes(key.as_bytes())
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        let signature = c::ecdsa::Signature::from_der(der)
            .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
        Ok::<_, CryptoError>(match input {
            SigningInput::Digest(digest) => verifying_key.verify_prehash(digest, &signature),
            SigningInput::Message(message) => verifying_key.verify(message, &signature),
        }
        .is_ok())
    })?;
    debug!(curve = key.curve().name(), valid, "verified signature");
    Ok(valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::DigestAlgorithm;
    use crate::keys::EcCurve;
    use icao_seal_protocol::VdsSignature;

    #[test]
    fn test_sign_verify_digest() {
        for (curve, algorithm) in [
            (EcCurve::P256, DigestAlgorithm::Sha256),
            (EcCurve::P384, DigestAlgorithm::Sha384),
            (EcCurve::P521, DigestAlgorithm::Sha512),
        ] {
            let private = PrivateKey::generate(curve).unwrap();
            let public = private.public_key().unwrap();
            let digest = algorithm.digest(b"seal bytes");

            let raw = sign(&private, SigningInput::Digest(&digest)).unwrap();
            assert_eq!(raw.len(), 2 * curve.scalar_len());

            let der = VdsSignature::from_raw(&raw).unwrap().to_der();
            assert!(verify(&public, &der, SigningInput::Digest(&digest)).unwrap());

            let other = algorithm.digest(b"other bytes");
            assert!(!verify(&public, &der, SigningInput::Digest(&other)).unwrap());
        }
    }

    #[test]
    fn test_sign_verify_message() {
        let private = PrivateKey::generate(EcCurve::P521).unwrap();
        let public = private.public_key().unwrap();
        let raw = sign(&private, SigningInput::Message(b"payload")).unwrap();
        let der = VdsSignature::from_raw(&raw).unwrap().to_der();
        assert!(verify(&public, &der, SigningInput::Message(b"payload")).unwrap());
    }

    #[test]
    fn test_garbage_der() {
        let public = PrivateKey::generate(EcCurve::P256)
            .unwrap()
            .public_key()
            .unwrap();
        assert!(matches!(
            verify(&public, &[0x30, 0x01, 0x00], SigningInput::Message(b"x")),
            Err(CryptoError::InvalidSignature(_))
        ));
    }
}
