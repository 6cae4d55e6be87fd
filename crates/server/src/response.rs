//! Response writer: one `Outcome` per request, serialized exactly once.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::errors::ApiError;

/// Response payload: structured JSON or pre-rendered text.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    Html(String),
}

/// Status plus body. Converting into a `Response` consumes it.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub status: StatusCode,
    pub body: Body,
}

impl Outcome {
    pub fn json<T: Serialize>(status: StatusCode, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::internal(e.to_string()))?;
        Ok(Self { status, body: Body::Json(value) })
    }

    pub fn html(status: StatusCode, page: String) -> Self {
        Self { status, body: Body::Html(page) }
    }

    /// `{"message": ...}` body, the shape every error and notice uses.
    pub fn message(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, body: Body::Json(serde_json::json!({ "message": message.into() })) }
    }
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self.body {
            Body::Json(value) => (self.status, Json(value)).into_response(),
            Body::Html(page) => (self.status, Html(page)).into_response(),
        }
    }
}
