//! Decoder for the JSON interchange form of a certificate, the format used
//! by exports and by tests. Scanned payloads may carry the `WC1:` scheme
//! prefix in front of the JSON body.

use crate::certificate_decoder::{error::DecodeError, CertificateDecoder};
use crate::common_models::certificate::Certificate;

pub const PAYLOAD_PREFIX: &str = "WC1:";

#[derive(Debug, Default)]
pub struct JsonCertificateDecoder;

impl CertificateDecoder for JsonCertificateDecoder {
    fn decode(&self, raw_payload: &str) -> Result<Certificate, DecodeError> {
        let payload = raw_payload.trim();
        if payload.is_empty() {
            return Err(DecodeError::EmptyPayload);
        }

        let body = match payload.strip_prefix(PAYLOAD_PREFIX) {
            Some(body) => body,
            None if payload.starts_with('{') => payload,
            None => {
                let prefix = payload.split(':').next().unwrap_or(payload);
                return Err(DecodeError::UnsupportedPrefix(format!("{prefix}:")));
            }
        };

        let certificate: Certificate = serde_json::from_str(body)?;
        validate(&certificate)?;
        Ok(certificate)
    }
}

fn validate(certificate: &Certificate) -> Result<(), DecodeError> {
    if certificate.name.standardized_family_name.trim().is_empty() {
        return Err(DecodeError::MissingField("standardizedFamilyName"));
    }
    if certificate.date_of_birth.trim().is_empty() {
        return Err(DecodeError::MissingField("dateOfBirth"));
    }
    if certificate.entries.is_empty() {
        return Err(DecodeError::MissingField("entries"));
    }
    if certificate.expires_at <= certificate.issued_at {
        return Err(DecodeError::InvalidValidityWindow);
    }
    Ok(())
}
