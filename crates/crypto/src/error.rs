use icao_seal_protocol::ProtocolError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CryptoError>;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Unsupported field size: {0} bits")]
    UnsupportedFieldSize(usize),

    #[error("Unsupported key length: {0} bytes")]
    UnsupportedKeyLength(usize),

    #[error("Curve {0} is not enabled in this build")]
    CurveDisabled(&'static str),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid signature encoding: {0}")]
    InvalidSignature(String),

    #[error("No signature present")]
    EmptySignature,

    #[error("Header declares no signature algorithm")]
    MissingSignatureAlgorithm,

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl CryptoError {
    /// Returns true if the error concerns key material rather than data
    pub fn is_key_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFieldSize(_)
                | Self::UnsupportedKeyLength(_)
                | Self::CurveDisabled(_)
                | Self::InvalidKey(_)
        )
    }
}
