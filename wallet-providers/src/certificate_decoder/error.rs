use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Empty payload")]
    EmptyPayload,
    #[error("Unsupported payload prefix: `{0}`")]
    UnsupportedPrefix(String),
    #[error("Malformed payload: `{0}`")]
    Malformed(#[from] serde_json::Error),
    #[error("Missing field: `{0}`")]
    MissingField(&'static str),
    #[error("Certificate expires before it was issued")]
    InvalidValidityWindow,
}
