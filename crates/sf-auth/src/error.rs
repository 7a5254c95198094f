//! Error types for sfconn-auth.
//!
//! Error messages are designed to avoid exposing sensitive credential data.

/// Result type alias for sfconn-auth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for sfconn-auth operations.
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

    /// Returns true if nothing came back from the token endpoint.
    pub fn is_transport(&self) -> bool {
        matches!(self.kind, ErrorKind::Transport(_))
    }
}

/// The kind of error that occurred.
///
/// Error messages avoid including credential values.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// The token endpoint rejected the grant.
    #[error("OAuth error: {error} - {description}")]
    OAuth { error: String, description: String },

    /// The token endpoint answered with something other than a token or an
    /// OAuth error.
    #[error("Malformed token response: {0}")]
    MalformedResponse(String),

    /// Invalid credentials configuration.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Transport failure talking to the token endpoint.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request could not be built or sent for a non-network reason.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Environment variable not set.
    #[error("Environment variable not set: {0}")]
    EnvVar(String),
}

impl From<sfconn_client::Error> for Error {
    fn from(err: sfconn_client::Error) -> Self {
        let message = sfconn_client::sanitize_error_message(&err.to_string());
        let kind = if err.is_transport() {
            ErrorKind::Transport(message)
        } else {
            ErrorKind::Http(message)
        };
        Error::with_source(kind, err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(
            ErrorKind::InvalidCredentials(format!("invalid token endpoint: {err}")),
            err,
        )
    }
}
