//! Curve and key types
//!
//! Keys are held as raw bytes: a private key is the big-endian scalar, a
//! public key is the uncompressed SEC1 point. The curve is inferred from the
//! length, and the field size used for digest selection is derived from the
//! same length.

use crate::error::{CryptoError, Result};
use rand::rngs::OsRng;
use std::fmt;
use zeroize::Zeroizing;

/// Run `$body` with `$krate` bound to the curve crate for `$curve`
macro_rules! with_curve {
    ($curve:expr, $krate:ident => $body:expr) => {
        match $curve {
            #[cfg(feature = "p256")]
            $crate::keys::EcCurve::P256 => {
                use ::p256 as $krate;
                $body
            }
            #[cfg(feature = "p384")]
            $crate::keys::EcCurve::P384 => {
                use ::p384 as $krate;
                $body
            }
            #[cfg(feature = "p521")]
            $crate::keys::EcCurve::P521 => {
                use ::p521 as $krate;
                $body
            }
            #[allow(unreachable_patterns)]
            other => Err($crate::error::CryptoError::CurveDisabled(other.name())),
        }
    };
}

pub(crate) use with_curve;

/// Supported NIST curves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EcCurve {
    /// NIST P-256 (secp256r1)
    P256,
    /// NIST P-384 (secp384r1)
    P384,
    /// NIST P-521 (secp521r1)
    P521,
}

impl EcCurve {
    pub fn name(self) -> &'static str {
        match self {
            EcCurve::P256 => "P-256",
            EcCurve::P384 => "P-384",
            EcCurve::P521 => "P-521",
        }
    }

    /// Scalar width, also the width of each signature component
    pub fn scalar_len(self) -> usize {
        match self {
            EcCurve::P256 => 32,
            EcCurve::P384 => 48,
            EcCurve::P521 => 66,
        }
    }

    /// Curve of a raw private scalar
    pub fn from_private_key_len(len: usize) -> Result<Self> {
        [EcCurve::P256, EcCurve::P384, EcCurve::P521]
            .into_iter()
            .find(|curve| curve.scalar_len() == len)
            .ok_or(CryptoError::UnsupportedKeyLength(len))
    }

    /// Curve of a compressed or uncompressed SEC1 point
    pub fn from_public_key_len(len: usize) -> Result<Self> {
        [EcCurve::P256, EcCurve::P384, EcCurve::P521]
            .into_iter()
            .find(|curve| len == curve.scalar_len() + 1 || len == 2 * curve.scalar_len() + 1)
            .ok_or(CryptoError::UnsupportedKeyLength(len))
    }
}

/// Private signing key
#[derive(Clone)]
pub struct PrivateKey {
    curve: EcCurve,
    scalar: Zeroizing<Vec<u8>>,
}

impl PrivateKey {
    /// Load a raw big-endian scalar
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let curve = EcCurve::from_private_key_len(bytes.len())?;
        with_curve!(curve, c => c::ecdsa::SigningKey::from_slice(bytes)
            .map(|_| ())
            .map_err(|e| CryptoError::InvalidKey(e.to_string())))?;
        Ok(Self {
            curve,
            scalar: Zeroizing::new(bytes.to_vec()),
        })
    }

    /// Generate a fresh key from the OS random source
    pub fn generate(curve: EcCurve) -> Result<Self> {
        let scalar = with_curve!(curve, c => Ok::<_, CryptoError>(
            c::ecdsa::SigningKey::random(&mut OsRng).to_bytes().to_vec()
        ))?;
        Ok(Self {
            curve,
            scalar: Zeroizing::new(scalar),
        })
    }

    pub fn curve(&self) -> EcCurve {
        self.curve
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.scalar
    }

    /// Field size in bits, from the scalar length
    pub fn field_size(&self) -> usize {
        self.scalar.len() * 8
    }

    /// The matching public key
    pub fn public_key(&self) -> Result<PublicKey> {
        let point = with_curve!(self.curve, c => {
            let signing_key = c::ecdsa::SigningKey::from_slice(&self.scalar)
                .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
            let verifying_key = c::ecdsa::VerifyingKey::from(&signing_key);
            Ok::<_, CryptoError>(verifying_key.to_encoded_point(false).as_bytes().to_vec())
        })?;
        Ok(PublicKey {
            curve: self.curve,
            point,
        })
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("curve", &self.curve)
            .finish_non_exhaustive()
    }
}

/// Public verification key, kept as an uncompressed SEC1 point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    curve: EcCurve,
    point: Vec<u8>,
}

impl PublicKey {
    /// Load a SEC1 point; compressed points are expanded
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self> {
        let curve = EcCurve::from_public_key_len(bytes.len())?;
        let point = with_curve!(curve, c => {
            let key = c::ecdsa::VerifyingKey::from_sec1_bytes(bytes)
                .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
            Ok::<_, CryptoError>(key.to_encoded_point(false).as_bytes().to_vec())
        })?;
        Ok(Self { curve, point })
    }

    pub fn curve(&self) -> EcCurve {
        self.curve
    }

    /// Uncompressed SEC1 encoding
    pub fn as_bytes(&self) -> &[u8] {
        &self.point
    }

    /// Field size in bits, from the uncompressed point length
    pub fn field_size(&self) -> usize {
        (self.point.len() - 1) * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_from_lengths() {
        assert_eq!(EcCurve::from_private_key_len(32).unwrap(), EcCurve::P256);
        assert_eq!(EcCurve::from_private_key_len(66).unwrap(), EcCurve::P521);
        assert_eq!(EcCurve::from_public_key_len(97).unwrap(), EcCurve::P384);
        assert_eq!(EcCurve::from_public_key_len(33).unwrap(), EcCurve::P256);
        assert!(matches!(
            EcCurve::from_private_key_len(31),
            Err(CryptoError::UnsupportedKeyLength(31))
        ));
    }

    #[test]
    fn test_field_sizes() {
        for (curve, bits) in [(EcCurve::P256, 256), (EcCurve::P384, 384), (EcCurve::P521, 528)] {
            let private = PrivateKey::generate(curve).unwrap();
            assert_eq!(private.field_size(), bits);
            let public = private.public_key().unwrap();
            assert_eq!(public.field_size(), bits);
            assert_eq!(public.curve(), curve);
        }
    }

    #[test]
    fn test_public_key_derivation_per_curve() {
        for curve in [EcCurve::P256, EcCurve::P384, EcCurve::P521] {
            let public = PrivateKey::generate(curve).unwrap().public_key().unwrap();
            assert_eq!(public.as_bytes()[0], 0x04);
            assert_eq!(public.as_bytes().len(), 1 + 2 * curve.scalar_len());
            assert_eq!(PublicKey::from_sec1_bytes(public.as_bytes()).unwrap(), public);
        }
    }

    #[test]
    fn test_roundtrip_bytes() {
        let private = PrivateKey::generate(EcCurve::P256).unwrap();
        let reloaded = PrivateKey::from_bytes(private.as_bytes()).unwrap();
        assert_eq!(
            reloaded.public_key().unwrap(),
            private.public_key().unwrap()
        );
    }

    #[test]
    fn test_compressed_point_expanded() {
        let public = PrivateKey::generate(EcCurve::P256)
            .unwrap()
            .public_key()
            .unwrap();
        let point = public.as_bytes();
        let mut compressed = vec![0x02 | (point[64] & 1)];
        compressed.extend_from_slice(&point[1..33]);
        assert_eq!(PublicKey::from_sec1_bytes(&compressed).unwrap(), public);
    }

    #[test]
    fn test_zero_scalar_rejected() {
        assert!(matches!(
            PrivateKey::from_bytes(&[0u8; 32]),
            Err(CryptoError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_debug_hides_scalar() {
        let private = PrivateKey::generate(EcCurve::P384).unwrap();
        assert!(!format!("{:?}", private).contains("scalar"));
    }
}
