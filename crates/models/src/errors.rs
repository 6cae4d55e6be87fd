use thiserror::Error;

/// Reasons a request body is rejected before it reaches storage.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Invalid user data: {0}")]
    Validation(String),
    #[error("Invalid payload: {0}")]
    Payload(String),
    #[error("Unsupported Content-Type")]
    UnsupportedContentType,
}
