use thiserror::Error;

/// Failure to project a dynamic value onto JSON.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("Converting circular structure to JSON")]
    Circular,
}

/// Failure to decode a compressed metadata payload.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Inflate error: {0}")]
    Inflate(#[from] std::io::Error),
    #[error("Decompressed payload is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
