//! Error types for sfconn-rest.

use sfconn_client::ApiError;

/// Result type alias for sfconn-rest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for REST and query calls.
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

    /// Returns true if the failure happened before any response came back.
    pub fn is_transport(&self) -> bool {
        matches!(self.kind, ErrorKind::Transport(_))
    }

    /// Returns true if the session kept expiring until reattempts ran out.
    pub fn is_session_expired(&self) -> bool {
        matches!(self.kind, ErrorKind::SessionExpired { .. })
    }

    /// The Salesforce error envelope carried by this error, if any.
    pub fn api_errors(&self) -> Option<&[ApiError]> {
        match &self.kind {
            ErrorKind::SessionExpired { errors, .. } | ErrorKind::Application(errors) => {
                Some(errors.as_slice())
            }
            _ => None,
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Network or IO failure. Never retried.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The token endpoint rejected the password grant.
    #[error("Authentication failed: {code} - {description}")]
    Auth { code: String, description: String },

    /// Every reattempt came back with an expired session.
    #[error("Session expired after {attempts} reattempt(s): {}", first_error(.errors))]
    SessionExpired { attempts: u32, errors: Vec<ApiError> },

    /// Validation or business error reported by Salesforce.
    #[error("Salesforce API error: {}", first_error(.0))]
    Application(Vec<ApiError>),

    /// A body that should have been JSON was not, or lacked required fields.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Non-success status whose body is not a Salesforce error envelope.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A request body could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

fn first_error(errors: &[ApiError]) -> String {
    match errors {
        [] => "no error details".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{} (and {} more)", first, rest.len()),
    }
}

impl From<sfconn_client::Error> for Error {
    fn from(err: sfconn_client::Error) -> Self {
        use sfconn_client::ErrorKind as ClientKind;

        let message = sfconn_client::sanitize_error_message(&err.to_string());
        let kind = if err.is_transport() {
            ErrorKind::Transport(message)
        } else {
            match &err.kind {
                ClientKind::Json(_) => ErrorKind::MalformedResponse(message),
                ClientKind::Serialization(_) => ErrorKind::Serialization(message),
                _ => ErrorKind::Config(message),
            }
        };
        Error::with_source(kind, err)
    }
}

impl From<sfconn_auth::Error> for Error {
    fn from(err: sfconn_auth::Error) -> Self {
        use sfconn_auth::ErrorKind as AuthKind;

        let kind = match &err.kind {
            AuthKind::OAuth { error, description } => ErrorKind::Auth {
                code: error.clone(),
                description: description.clone(),
            },
            AuthKind::Transport(message) => ErrorKind::Transport(message.clone()),
            AuthKind::MalformedResponse(message) => ErrorKind::MalformedResponse(message.clone()),
            AuthKind::InvalidCredentials(message) | AuthKind::Http(message) => {
                ErrorKind::Config(message.clone())
            }
            AuthKind::EnvVar(name) => {
                ErrorKind::Config(format!("environment variable not set: {name}"))
            }
        };
        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::MalformedResponse(err.to_string()), err)
    }
}
