//! Error types for sfconn-client.

/// Result type alias for sfconn-client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for sfconn-client operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if the request never produced an HTTP response
    /// (network, TLS, timeout or body read failure).
    pub fn is_transport(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Timeout | ErrorKind::Connection(_) | ErrorKind::Transport(_)
        )
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Request timeout.
    #[error("Request timeout")]
    Timeout,

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Any other failure while sending the request or reading the body.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A response body was not the JSON the caller asked for.
    #[error("JSON error: {0}")]
    Json(String),

    /// reqwest refused to build the request, usually a bad URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A request body could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // reqwest includes the full URL in its message; query strings may carry SOQL
        let message = match err.url() {
            Some(url) => err.to_string().replace(url.as_str(), "[url]"),
            None => err.to_string(),
        };
        let message = crate::response::sanitize_error_message(&message);
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connection(message)
        } else if err.is_builder() {
            ErrorKind::InvalidUrl(message)
        } else {
            ErrorKind::Transport(message)
        };

        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}
