use serde_json::{Map, Value};

use crate::errors::ModelError;
use crate::user::UserCandidate;

/// Media type declared by a request's `Content-Type` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Json,
    Form,
    Unsupported,
}

impl ContentKind {
    /// Classify a `Content-Type` header value. Parameters such as
    /// `charset` are ignored and the comparison is case-insensitive.
    pub fn from_header(value: Option<&str>) -> Self {
        let essence = value
            .and_then(|v| v.split(';').next())
            .map(str::trim)
            .unwrap_or_default();
        if essence.eq_ignore_ascii_case("application/json") {
            ContentKind::Json
        } else if essence.eq_ignore_ascii_case("application/x-www-form-urlencoded") {
            ContentKind::Form
        } else {
            ContentKind::Unsupported
        }
    }
}

/// A decoded request body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Map<String, Value>),
    Form(Vec<(String, String)>),
}

impl Payload {
    pub fn decode(kind: ContentKind, body: &[u8]) -> Result<Self, ModelError> {
        match kind {
            ContentKind::Json => Self::json(body),
            ContentKind::Form => Self::form(body),
            ContentKind::Unsupported => Err(ModelError::UnsupportedContentType),
        }
    }

    /// Decode a body that must be a JSON object.
    pub fn json(body: &[u8]) -> Result<Self, ModelError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ModelError::Payload(format!("malformed JSON: {e}")))?;
        match value {
            Value::Object(map) => Ok(Payload::Json(map)),
            _ => Err(ModelError::Payload("expected a JSON object".into())),
        }
    }

    pub fn form(body: &[u8]) -> Result<Self, ModelError> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
            .map_err(|e| ModelError::Payload(format!("malformed form body: {e}")))?;
        Ok(Payload::Form(pairs))
    }

    /// Fold the body into the single shape the validator understands.
    pub fn into_candidate(self) -> UserCandidate {
        match self {
            Payload::Json(map) => UserCandidate::from_fields(map),
            Payload::Form(pairs) => {
                UserCandidate::from_fields(pairs.into_iter().map(|(k, v)| (k, Value::String(v))))
            }
        }
    }
}
