//! Client-side error taxonomy and the single place backend error bodies are
//! flattened into display text.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::ValidationErrors;

/// Error returned by every client call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Transport failure: DNS, refused connection, timeout, aborted body.
    #[error("Network error: {0}")]
    Network(String),
    /// Non-2xx response. `body` is kept raw; see [`ApiError::normalize`].
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Deserialization error: {0}")]
    Deserialize(String),
    /// Rejected before any request was sent.
    #[error("Invalid input: {0}")]
    Invalid(ValidationErrors),
    /// The role gate refused the action; nothing was sent.
    #[error("Requires one of: {}", .required.join(", "))]
    Forbidden { required: Vec<String> },
}

/// Coarse classification used to pick how a failure is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Validation,
    Network,
    Auth,
    Server,
}

/// Tagged, display-ready form of an [`ApiError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedError {
    pub kind: ErrorKind,
    pub messages: Vec<String>,
}

impl NormalizedError {
    pub fn new(kind: ErrorKind, messages: Vec<String>) -> Self {
        Self { kind, messages }
    }

    pub fn message(&self) -> String {
        self.messages.join(", ")
    }
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Network(_) | ApiError::Deserialize(_) => ErrorKind::Network,
            ApiError::Invalid(_) => ErrorKind::Validation,
            ApiError::Forbidden { .. } => ErrorKind::Auth,
            ApiError::Http { status, .. } => match status {
                401 | 403 => ErrorKind::Auth,
                500..=u16::MAX => ErrorKind::Server,
                _ => ErrorKind::Validation,
            },
        }
    }

    pub fn normalize(&self) -> NormalizedError {
        let messages = match self {
            ApiError::Network(msg) | ApiError::Deserialize(msg) => vec![msg.clone()],
            ApiError::Invalid(errors) => errors.messages(),
            ApiError::Forbidden { .. } => vec![self.to_string()],
            ApiError::Http { status, body } => body_messages(body)
                .unwrap_or_else(|| vec![format!("Request failed with status {status}")]),
        };
        NormalizedError::new(self.kind(), messages)
    }

    /// The string an inline alert shows.
    pub fn user_message(&self) -> String {
        self.normalize().message()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Invalid(errors)
    }
}

/// Flatten a FastAPI-style error body.
///
/// `detail` may be a string, a list of `{loc, msg}` field errors, or an
/// arbitrary object; some handlers use `message` instead.
pub fn body_messages(body: &str) -> Option<Vec<String>> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    let obj = parsed.as_object()?;

    match obj.get("detail") {
        Some(Value::String(detail)) if !detail.trim().is_empty() => {
            return Some(vec![detail.clone()]);
        }
        _ => {}
    }
    if let Some(Value::String(message)) = obj.get("message") {
        if !message.trim().is_empty() {
            return Some(vec![message.clone()]);
        }
    }

    match obj.get("detail")? {
        Value::Array(items) if !items.is_empty() => {
            Some(items.iter().map(field_error_message).collect())
        }
        detail @ Value::Object(_) => Some(vec![format!("Validation error: {detail}")]),
        _ => None,
    }
}

fn field_error_message(item: &Value) -> String {
    if let Value::String(s) = item {
        return s.clone();
    }
    if let Some(msg) = item.get("msg").and_then(Value::as_str) {
        let loc = match item.get("loc").and_then(Value::as_array) {
            Some(parts) if !parts.is_empty() => parts
                .iter()
                .map(|p| match p {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("."),
            _ => "field".to_string(),
        };
        return format!("{loc}: {msg}");
    }
    item.get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| "Validation error".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FieldError;

    fn http(status: u16, body: &str) -> ApiError {
        ApiError::Http {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn string_detail_is_surfaced_verbatim() {
        let err = http(401, r#"{"detail":"Incorrect username or password"}"#);
        let normalized = err.normalize();
        assert_eq!(normalized.kind, ErrorKind::Auth);
        assert_eq!(err.user_message(), "Incorrect username or password");
    }

    #[test]
    fn field_error_list_is_flattened() {
        let body = r#"{"detail":[
            {"loc":["body","title"],"msg":"field required","type":"value_error.missing"},
            {"loc":["body","order",0],"msg":"ensure this value is greater than 0"},
            {"msg":"no location"},
            "plain string",
            {"unexpected":true}
        ]}"#;
        let normalized = http(422, body).normalize();
        assert_eq!(normalized.kind, ErrorKind::Validation);
        assert_eq!(
            normalized.messages,
            vec![
                "body.title: field required",
                "body.order.0: ensure this value is greater than 0",
                "field: no location",
                "plain string",
                "Validation error",
            ]
        );
    }

    #[test]
    fn message_field_and_object_detail() {
        assert_eq!(
            http(400, r#"{"message":"Deck is locked"}"#).user_message(),
            "Deck is locked"
        );
        assert_eq!(
            http(400, r#"{"detail":{"code":3}}"#).user_message(),
            r#"Validation error: {"code":3}"#
        );
    }

    #[test]
    fn unparseable_body_falls_back_to_status() {
        let err = http(502, "<html>bad gateway</html>");
        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(err.user_message(), "Request failed with status 502");
    }

    #[test]
    fn transport_and_client_side_errors() {
        let net = ApiError::Network("connection refused".into());
        assert_eq!(net.normalize().kind, ErrorKind::Network);
        assert_eq!(net.user_message(), "connection refused");

        let mut errors = ValidationErrors::default();
        errors.push(FieldError::new("difficulty", "Difficulty is required"));
        let invalid = ApiError::from(errors);
        assert_eq!(invalid.kind(), ErrorKind::Validation);
        assert_eq!(invalid.user_message(), "difficulty: Difficulty is required");

        let denied = ApiError::Forbidden {
            required: vec!["TEACHER".into(), "ADMIN".into()],
        };
        assert_eq!(denied.kind(), ErrorKind::Auth);
        assert_eq!(denied.user_message(), "Requires one of: TEACHER, ADMIN");
    }
}
