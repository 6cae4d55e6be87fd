use axum::extract::rejection::{BytesRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use service::ServiceError;
use thiserror::Error;
use tracing::error;

use crate::response::Outcome;

const INTERNAL_MESSAGE: &str = "Internal Server Error";

/// Error boundary of the dispatcher: every failure becomes a status code
/// and a `{"message": ...}` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn route_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Route not found")
    }

    /// Internal detail is logged, never sent to the client.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        error!(error = %detail, "request failed with internal error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::BadRequest(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            ServiceError::Model(m) => Self::new(StatusCode::BAD_REQUEST, m.to_string()),
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, msg),
            ServiceError::Storage(detail) => Self::internal(detail),
        }
    }
}

impl ApiError {
    /// Extractor rejections keep their status; server-side ones are hidden
    /// like any other internal error.
    fn rejected(status: StatusCode, text: String) -> Self {
        if status.is_server_error() {
            Self::internal(text)
        } else {
            Self::new(status, text)
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(r: PathRejection) -> Self {
        Self::rejected(r.status(), r.body_text())
    }
}

impl From<BytesRejection> for ApiError {
    fn from(r: BytesRejection) -> Self {
        Self::rejected(r.status(), r.body_text())
    }
}

impl From<minijinja::Error> for ApiError {
    fn from(e: minijinja::Error) -> Self {
        Self::internal(format!("template rendering failed: {e}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        Outcome::message(self.status, self.message).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
