use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by any REST call.
///
/// Transport and authentication failures are intercepted centrally by the
/// session manager; everything else is attached to the relevant store
/// slice's `error` field.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Session expired, please log in again")]
    SessionExpired,

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Not found")]
    NotFound,

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify a non-success HTTP response.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let json: Option<Value> = serde_json::from_slice(body).ok();

        match status {
            401 => ApiError::Unauthorized,
            404 => ApiError::NotFound,
            400..=499 => {
                if let Some(message) = json.as_ref().and_then(message_field) {
                    return ApiError::Rejected { status, message };
                }
                match json.as_ref().and_then(FieldErrors::from_json) {
                    Some(fields) if !fields.is_empty() => ApiError::Validation(fields),
                    _ => ApiError::Rejected {
                        status,
                        message: "Request rejected".to_string(),
                    },
                }
            }
            _ => ApiError::Server {
                status,
                message: json
                    .as_ref()
                    .and_then(message_field)
                    .unwrap_or_else(|| "Internal server error".to_string()),
            },
        }
    }

    /// Classify a failure from a sign-in endpoint, where 401 means wrong
    /// credentials rather than a missing session.
    pub fn from_credentials_status(status: u16, body: &[u8]) -> Self {
        if status != 401 {
            return Self::from_status(status, body);
        }
        let message = serde_json::from_slice::<Value>(body)
            .ok()
            .as_ref()
            .and_then(message_field)
            .unwrap_or_else(|| "Invalid credentials".to_string());
        ApiError::Rejected { status, message }
    }

    /// Text shown to the user when the error lands in a slice.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Validation(fields) => fields.to_string(),
            ApiError::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Whether the caller should treat the session as gone.
    pub fn is_session_fatal(&self) -> bool {
        matches!(self, ApiError::SessionExpired)
    }
}

impl From<SchemaError> for ApiError {
    fn from(e: SchemaError) -> Self {
        ApiError::Decode(e.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

fn message_field(v: &Value) -> Option<String> {
    ["detail", "error", "message"]
        .iter()
        .find_map(|k| v.get(k).and_then(Value::as_str).map(str::to_string))
}

/// Per-field validation messages, kept verbatim from the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(pub BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Accepts both `{"field": ["msg"]}` and `{"errors": {"field": "msg"}}`.
    pub fn from_json(v: &Value) -> Option<Self> {
        let obj = match v.get("errors") {
            Some(Value::Object(inner)) => inner,
            _ => v.as_object()?,
        };

        let mut fields = BTreeMap::new();
        for (key, value) in obj {
            let messages: Vec<String> = match value {
                Value::String(s) => vec![s.clone()],
                Value::Array(items) => items
                    .iter()
                    .map(|i| match i {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
                Value::Null => continue,
                other => vec![other.to_string()],
            };
            fields.insert(key.clone(), messages);
        }
        Some(Self(fields))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            first = false;
            if field == "non_field_errors" || field == "detail" {
                write!(f, "{}", messages.join(", "))?;
            } else {
                write!(f, "{field}: {}", messages.join(", "))?;
            }
        }
        Ok(())
    }
}

/// A payload parsed but failed boundary validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("{entity}: invalid id {id}")]
    InvalidId { entity: &'static str, id: i64 },

    #[error("{entity}.{field}: value {value} out of range")]
    OutOfRange {
        entity: &'static str,
        field: &'static str,
        value: f64,
    },

    #[error("{entity}: {reason}")]
    Inconsistent {
        entity: &'static str,
        reason: String,
    },

    #[error("Unrecognised response shape: {0}")]
    UnknownShape(String),
}
