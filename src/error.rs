use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Everything that can go wrong between a form submission and a rendered response.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Could not read response: {0}")]
    Decode(String),

    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Message the backend sent along with the failure, if there was one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized(m) | Self::Forbidden(m) | Self::NotFound(m) => {
                (!m.is_empty()).then_some(m.as_str())
            }
            Self::Server { message, .. } => (!message.is_empty()).then_some(message.as_str()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Builds the error for a non-success response from its status and raw body.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = extract_message(body)
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_default();

        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized(message),
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            _ => Self::Server {
                status: status.as_u16(),
                message,
            },
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

/// Pulls a human readable message out of an error body.
///
/// Understands `{"message": ..}`, `{"error": ..}`, problem details with a
/// `title` and an `errors` map of field -> messages. Non-JSON bodies are
/// returned trimmed as-is.
pub fn extract_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => return Some(body.to_string()),
    };

    match &value {
        Value::String(s) if !s.is_empty() => return Some(s.clone()),
        Value::Object(_) => {}
        _ => return None,
    }

    if let Some(errors) = value.get("errors").and_then(Value::as_object) {
        let mut parts = Vec::new();
        for (field, messages) in errors {
            match messages {
                Value::Array(list) => parts.extend(
                    list.iter()
                        .filter_map(Value::as_str)
                        .map(|m| format!("{}: {}", field, m)),
                ),
                Value::String(m) => parts.push(format!("{}: {}", field, m)),
                _ => {}
            }
        }
        if !parts.is_empty() {
            return Some(parts.join("; "));
        }
    }

    ["message", "error", "title", "detail"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// A single failed form rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be at least {min}")]
    BelowMin { field: String, min: String },

    #[error("{field} must be at most {max}")]
    AboveMax { field: String, max: String },

    #[error("{field} is invalid: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("{field} does not match {other}")]
    Mismatch { field: String, other: String },
}

impl ValidationError {
    pub fn field(&self) -> &str {
        match self {
            Self::Required { field }
            | Self::TooShort { field, .. }
            | Self::TooLong { field, .. }
            | Self::BelowMin { field, .. }
            | Self::AboveMax { field, .. }
            | Self::InvalidFormat { field, .. }
            | Self::Mismatch { field, .. } => field,
        }
    }
}

/// All rule failures collected for one form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", join_messages(.0))]
pub struct ValidationErrors(Vec<ValidationError>);

fn join_messages(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    /// Records the failure of a validator result, if any.
    pub fn check(&mut self, result: std::result::Result<(), ValidationError>) {
        if let Err(e) = result {
            self.push(e);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field() == field)
    }

    /// `Ok(value)` when nothing failed, otherwise the collected errors.
    pub fn into_result<T>(self, value: T) -> std::result::Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}
