//! HTTP response handling and the Salesforce error envelope.

use std::sync::LazyLock;

use regex_lite::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Error code Salesforce returns when the bearer token is no longer valid.
pub const SESSION_EXPIRED_CODE: &str = "INVALID_SESSION_ID";

/// A fully-read HTTP response: status, content type and body text.
///
/// The transport never interprets the body; classification happens in the
/// layers above.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    status: u16,
    content_type: Option<String>,
    body: String,
}

impl RawResponse {
    /// Create a response from its parts.
    pub fn new(status: u16, content_type: Option<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns true if the response status is successful (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Get the response body text.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns true if the body is empty or whitespace only.
    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }

    /// Consume the response and return the body text.
    pub fn into_body(self) -> String {
        self.body
    }

    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(Into::into)
    }
}

/// One entry of the Salesforce error envelope.
///
/// Salesforce reports REST and query failures as a JSON array of these
/// objects, e.g. `[{"errorCode":"INVALID_SESSION_ID","message":"Session expired or invalid"}]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code.
    pub error_code: String,
    /// Human-readable message. Empty when Salesforce sends none or `null`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
    /// Extra description attached by this library (e.g. reattempt counts).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
    /// Fields the error refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

impl ApiError {
    /// Create an error entry with the given code and message.
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            error_description: None,
            fields: None,
        }
    }

    /// Returns true if this entry signals an invalid or expired session.
    pub fn is_session_expired(&self) -> bool {
        self.error_code == SESSION_EXPIRED_CODE
    }

    /// Try to read an error envelope from a JSON value.
    ///
    /// Accepts an array whose first element carries `errorCode`, or a single
    /// object carrying `errorCode`. Returns `None` for anything else.
    pub fn envelope_from_value(value: &serde_json::Value) -> Option<Vec<ApiError>> {
        match value {
            serde_json::Value::Array(items) => {
                let first = items.first()?;
                let code = first.get("errorCode")?.as_str()?;
                let mut errors: Vec<ApiError> = items
                    .iter()
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect();
                // The first entry decides the outcome even if its other fields are odd
                if !errors.first().is_some_and(|e| e.error_code == code) {
                    let message = first.get("message").and_then(|m| m.as_str()).unwrap_or_default();
                    errors.insert(0, ApiError::new(code, message));
                }
                Some(errors)
            }
            serde_json::Value::Object(map) => {
                let code = map.get("errorCode")?.as_str()?;
                let error = serde_json::from_value(value.clone()).unwrap_or_else(|_| {
                    let message = map.get("message").and_then(|m| m.as_str()).unwrap_or_default();
                    ApiError::new(code, message)
                });
                Some(vec![error])
            }
            _ => None,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code, sanitize_error_message(&self.message))?;
        if let Some(ref description) = self.error_description {
            write!(f, " ({})", description)?;
        }
        Ok(())
    }
}

// Salesforce tokens start with the 15-char org id followed by "!"
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"00[A-Za-z0-9]{13,}[!][A-Za-z0-9_.]+").unwrap()
});

static SESSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"sid=[A-Za-z0-9]{20,}").unwrap()
});

/// Sanitize an error message to prevent exposing sensitive data.
///
/// This function:
/// - Truncates messages longer than 500 characters
/// - Removes potential tokens (anything that looks like an access token)
/// - Removes potential session IDs
pub fn sanitize_error_message(message: &str) -> String {
    const MAX_LENGTH: usize = 500;

    let mut sanitized = message.to_string();

    sanitized = TOKEN_PATTERN
        .replace_all(&sanitized, "[REDACTED_TOKEN]")
        .to_string();

    sanitized = SESSION_PATTERN
        .replace_all(&sanitized, "sid=[REDACTED]")
        .to_string();

    if sanitized.len() > MAX_LENGTH {
        let mut cut = MAX_LENGTH;
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized.truncate(cut);
        sanitized.push_str("...[truncated]");
    }

    sanitized
}
