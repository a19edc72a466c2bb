//! IDB payload: header, message group, certificate and signature

use crate::binary::BinaryWrite;
use crate::error::{ProtocolError, Result};
use crate::idb::header::{IdbHeader, SIGNED_HEADER_LEN, UNSIGNED_HEADER_LEN};
use crate::idb::{CERTIFICATE_TAG, MESSAGE_GROUP_TAG};
use crate::signature::{IdbSignature, IDB_SIGNATURE_TAG};
use crate::tlv::{encode_all, Tlv};
use tracing::warn;

/// Decoded IDB payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdbPayload {
    pub header: IdbHeader,
    /// Entries of the message group, in wire order
    pub messages: Vec<Tlv>,
    /// Signer certificate as opaque bytes
    pub certificate: Option<Vec<u8>>,
    pub signature: Option<IdbSignature>,
}

impl IdbPayload {
    pub fn new(header: IdbHeader, messages: Vec<Tlv>) -> Self {
        Self {
            header,
            messages,
            certificate: None,
            signature: None,
        }
    }

    /// Decode payload bytes; `is_signed` comes from the barcode flag
    pub fn decode(bytes: &[u8], is_signed: bool) -> Result<Self> {
        let header_len = if is_signed {
            SIGNED_HEADER_LEN
        } else {
            UNSIGNED_HEADER_LEN
        };
        if bytes.len() < header_len {
            return Err(ProtocolError::TruncatedInput("IDB header"));
        }
        let header = IdbHeader::decode(&bytes[..header_len])?;

        let mut messages = None;
        let mut certificate = None;
        let mut signature = None;
        for entry in Tlv::decode_all(&bytes[header_len..])? {
            match entry.tag {
                MESSAGE_GROUP_TAG => {
                    if messages.is_some() {
                        return Err(ProtocolError::DuplicateElement("message group"));
                    }
                    messages = Some(Tlv::decode_all(&entry.value)?);
                }
                CERTIFICATE_TAG => {
                    if certificate.is_some() {
                        return Err(ProtocolError::DuplicateElement("certificate"));
                    }
                    certificate = Some(entry.value);
                }
                IDB_SIGNATURE_TAG => {
                    if signature.is_some() {
                        return Err(ProtocolError::DuplicateElement("signature"));
                    }
                    signature = Some(IdbSignature::from_tlv(&entry)?);
                }
                other => return Err(ProtocolError::UnknownTag(other)),
            }
        }

        Ok(Self {
            header,
            messages: messages.ok_or(ProtocolError::MissingMessageGroup)?,
            certificate,
            signature,
        })
    }

    /// The message group as it appears on the wire
    pub fn message_group(&self) -> Result<Tlv> {
        Tlv::new(MESSAGE_GROUP_TAG, encode_all(&self.messages))
    }

    /// Bytes covered by the signature: header and message group
    pub fn signed_bytes(&self) -> Result<Vec<u8>> {
        let mut out = self.header.to_bytes()?;
        self.message_group()?.write_into(&mut out);
        Ok(out)
    }

    /// Encode the full payload
    pub fn encode(&self) -> Result<Vec<u8>> {
        if self.header.is_signed() && self.signature.is_none() {
            warn!(
                country = %self.header.country_identifier,
                "IDB header declares a signature algorithm but the payload carries no signature"
            );
        }

        let mut out = self.signed_bytes()?;
        if let Some(certificate) = &self.certificate {
            Tlv::new(CERTIFICATE_TAG, certificate.clone())?.write_into(&mut out);
        }
        if let Some(signature) = &self.signature {
            signature.to_tlv().write_into(&mut out);
        }
        Ok(out)
    }

    /// First message carrying `tag`
    pub fn message(&self, tag: u8) -> Option<&Tlv> {
        self.messages.iter().find(|m| m.tag == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idb::{IdbSignatureInfo, SignatureAlgorithm};
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    fn unsigned_payload() -> IdbPayload {
        IdbPayload::new(
            IdbHeader::unsigned("D<<").unwrap(),
            vec![Tlv::new(0x04, (0xB0..=0xBF).collect::<Vec<u8>>()).unwrap()],
        )
    }

    #[test]
    fn test_unsigned_layout() {
        let bytes = unsigned_payload().encode().unwrap();
        assert_eq!(&bytes[..6], &[0x6A, 0xBC, 0x61, 0x12, 0x04, 0x10]);
        assert_eq!(bytes.len(), 2 + 2 + 18);
        assert_eq!(IdbPayload::decode(&bytes, false).unwrap(), unsigned_payload());
    }

    #[test]
    fn test_signed_parts_excluded_from_signed_bytes() {
        let info = IdbSignatureInfo {
            algorithm: SignatureAlgorithm::EcdsaSha256,
            certificate_reference: [9; 5],
            signature_creation_date: "2024-01-15".parse().unwrap(),
        };
        let mut payload = IdbPayload::new(
            IdbHeader::signed("UTO", info).unwrap(),
            vec![Tlv::new(0x01, vec![0x42]).unwrap()],
        );
        payload.certificate = Some(vec![0x30, 0x00]);
        payload.signature = Some(IdbSignature::from_raw(&[0x55; 64]).unwrap());

        let signed = payload.signed_bytes().unwrap();
        assert_eq!(signed.len(), 12 + 2 + 3);

        let bytes = payload.encode().unwrap();
        assert_eq!(&bytes[..signed.len()], signed.as_slice());
        assert_eq!(&bytes[signed.len()..signed.len() + 2], &[0x7E, 0x02]);
        assert_eq!(IdbPayload::decode(&bytes, true).unwrap(), payload);
    }

    #[test]
    fn test_missing_message_group() {
        assert_eq!(
            IdbPayload::decode(&[0x6A, 0xBC, 0x7E, 0x01, 0x00], false).unwrap_err(),
            ProtocolError::MissingMessageGroup
        );
    }

    #[test]
    fn test_unknown_top_level_tag() {
        assert_eq!(
            IdbPayload::decode(&[0x6A, 0xBC, 0x61, 0x00, 0x62, 0x00], false).unwrap_err(),
            ProtocolError::UnknownTag(0x62)
        );
    }

    #[test]
    fn test_duplicate_message_group() {
        assert_eq!(
            IdbPayload::decode(&[0x6A, 0xBC, 0x61, 0x00, 0x61, 0x00], false).unwrap_err(),
            ProtocolError::DuplicateElement("message group")
        );
    }

    #[test]
    fn test_header_shorter_than_flag_implies() {
        assert_eq!(
            IdbPayload::decode(&[0x6A, 0xBC, 0x61, 0x00], true).unwrap_err(),
            ProtocolError::TruncatedInput("IDB header")
        );
    }

    #[test]
    fn test_missing_signature_only_warns() {
        let info = IdbSignatureInfo {
            algorithm: SignatureAlgorithm::EcdsaSha512,
            certificate_reference: [0; 5],
            signature_creation_date: "xxxx-xx-xx".parse().unwrap(),
        };
        let payload = IdbPayload::new(IdbHeader::signed("UTO", info).unwrap(), Vec::new());
        let bytes = payload.encode().unwrap();
        assert_eq!(bytes.len(), 12 + 2);
        assert_eq!(IdbPayload::decode(&bytes, true).unwrap(), payload);
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn encode_capturing_logs(payload: &IdbPayload) -> String {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        tracing::subscriber::with_default(subscriber, || payload.encode().unwrap());
        let bytes = logs.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_missing_signature_warning_is_emitted() {
        let info = IdbSignatureInfo {
            algorithm: SignatureAlgorithm::EcdsaSha256,
            certificate_reference: [0; 5],
            signature_creation_date: "2024-03-xx".parse().unwrap(),
        };
        let mut payload = IdbPayload::new(
            IdbHeader::signed("UTO", info).unwrap(),
            vec![Tlv::new(0x01, vec![0x01]).unwrap()],
        );

        let logs = encode_capturing_logs(&payload);
        assert!(logs.contains("WARN"), "{}", logs);
        assert!(logs.contains("declares a signature algorithm"), "{}", logs);
        assert!(logs.contains("country=UTO"), "{}", logs);

        payload.signature = Some(IdbSignature::from_raw(&[0x11; 64]).unwrap());
        assert!(encode_capturing_logs(&payload).is_empty());

        let unsigned = IdbPayload::new(IdbHeader::unsigned("UTO").unwrap(), Vec::new());
        assert!(encode_capturing_logs(&unsigned).is_empty());
    }
}
