//! Digest selection
//!
//! Seals pick the hash from the signing curve's field size so that the
//! digest strength matches the key. Barcodes name the hash in their header.

use crate::error::{CryptoError, Result};
use icao_seal_protocol::SignatureAlgorithm;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl DigestAlgorithm {
    /// Hash matching a curve field of `bits` bits
    pub fn for_field_size(bits: usize) -> Result<Self> {
        let algorithm = match bits {
            1..=224 => DigestAlgorithm::Sha224,
            225..=256 => DigestAlgorithm::Sha256,
            257..=384 => DigestAlgorithm::Sha384,
            385..=512 => DigestAlgorithm::Sha512,
            other => return Err(CryptoError::UnsupportedFieldSize(other)),
        };
        debug!(field_size = bits, ?algorithm, "selected digest");
        Ok(algorithm)
    }

    /// Output length in bytes
    pub fn output_len(self) -> usize {
        match self {
            DigestAlgorithm::Sha224 => 28,
            DigestAlgorithm::Sha256 => 32,
            DigestAlgorithm::Sha384 => 48,
            DigestAlgorithm::Sha512 => 64,
        }
    }

    pub fn digest(self, data: &[u8]) -> Vec<u8> {
        match self {
            DigestAlgorithm::Sha224 => Sha224::digest(data).to_vec(),
            DigestAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
            DigestAlgorithm::Sha384 => Sha384::digest(data).to_vec(),
            DigestAlgorithm::Sha512 => Sha512::digest(data).to_vec(),
        }
    }
}

impl From<SignatureAlgorithm> for DigestAlgorithm {
    fn from(algorithm: SignatureAlgorithm) -> Self {
        match algorithm {
            SignatureAlgorithm::EcdsaSha256 => DigestAlgorithm::Sha256,
            SignatureAlgorithm::EcdsaSha384 => DigestAlgorithm::Sha384,
            SignatureAlgorithm::EcdsaSha512 => DigestAlgorithm::Sha512,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_size_boundaries() {
        let cases = [
            (160, DigestAlgorithm::Sha224),
            (224, DigestAlgorithm::Sha224),
            (225, DigestAlgorithm::Sha256),
            (256, DigestAlgorithm::Sha256),
            (384, DigestAlgorithm::Sha384),
            (512, DigestAlgorithm::Sha512),
        ];
        for (bits, expected) in cases {
            assert_eq!(DigestAlgorithm::for_field_size(bits).unwrap(), expected);
        }
        assert!(matches!(
            DigestAlgorithm::for_field_size(528),
            Err(CryptoError::UnsupportedFieldSize(528))
        ));
        assert!(DigestAlgorithm::for_field_size(0).is_err());
    }

    #[test]
    fn test_digest_lengths() {
        for algorithm in [
            DigestAlgorithm::Sha224,
            DigestAlgorithm::Sha256,
            DigestAlgorithm::Sha384,
            DigestAlgorithm::Sha512,
        ] {
            assert_eq!(algorithm.digest(b"abc").len(), algorithm.output_len());
        }
        assert_eq!(
            hex::encode(DigestAlgorithm::Sha256.digest(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_from_signature_algorithm() {
        assert_eq!(
            DigestAlgorithm::from(SignatureAlgorithm::EcdsaSha384),
            DigestAlgorithm::Sha384
        );
    }
}
