use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ColstoreError {
    #[error("Cannot parse config: {0}")]
    ConfigParsingError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Out of range: {0}")]
    OutOfRange(String),
    #[error("Unsupported read: {0}")]
    UnsupportedRead(String),
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),
    #[error("Metadata error: {0}")]
    MetadataError(String),
    #[error("Closed: {0}")]
    Closed(String),
}

impl From<std::io::Error> for ColstoreError {
    fn from(err: std::io::Error) -> Self {
        ColstoreError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for ColstoreError {
    fn from(err: serde_json::Error) -> Self {
        ColstoreError::MetadataError(err.to_string())
    }
}
