//! Tools for turning scanned payloads into decoded certificates.
//!
//! The wallet never interprets raw payloads itself; everything entering the
//! collection passes through a [`CertificateDecoder`]. A failed decode leaves
//! the collection untouched.

use crate::certificate_decoder::error::DecodeError;
use crate::common_models::certificate::Certificate;

pub mod error;
pub mod imp;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait CertificateDecoder: Send + Sync {
    /// Decodes and structurally validates one scanned payload.
    fn decode(&self, raw_payload: &str) -> Result<Certificate, DecodeError>;
}
