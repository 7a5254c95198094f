//! Password-grant credentials for a service account.
//!
//! Secrets are redacted in Debug output.

use crate::error::{Error, ErrorKind, Result};

/// Environment variable holding the password-grant token endpoint.
pub const ENV_ENDPOINT: &str = "SALESFORCE_ENDPOINT";
/// Environment variable holding the connected-app consumer key.
pub const ENV_CLIENT_ID: &str = "SALESFORCE_CLIENT_ID";
/// Environment variable holding the connected-app consumer secret.
pub const ENV_CLIENT_SECRET: &str = "SALESFORCE_CLIENT_SECRET";
/// Environment variable holding the service account username.
pub const ENV_USERNAME: &str = "SALESFORCE_USERNAME";
/// Environment variable holding the service account password.
pub const ENV_PASSWORD: &str = "SALESFORCE_PASSWORD";

/// Everything needed for one OAuth 2.0 username-password grant.
#[derive(Clone)]
pub struct PasswordCredentials {
    endpoint: String,
    client_id: String,
    client_secret: String,
    username: String,
    password: String,
}

impl std::fmt::Debug for PasswordCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordCredentials")
            .field("endpoint", &self.endpoint)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl PasswordCredentials {
    /// Create credentials from explicit values.
    pub fn new(
        endpoint: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Load credentials from environment variables.
    ///
    /// Reads `SALESFORCE_ENDPOINT`, `SALESFORCE_CLIENT_ID`,
    /// `SALESFORCE_CLIENT_SECRET`, `SALESFORCE_USERNAME` and
    /// `SALESFORCE_PASSWORD`. All are required.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load credentials through an arbitrary key lookup.
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| Error::new(ErrorKind::EnvVar(key.to_string())))
        };

        let creds = Self::new(
            required(ENV_ENDPOINT)?,
            required(ENV_CLIENT_ID)?,
            required(ENV_CLIENT_SECRET)?,
            required(ENV_USERNAME)?,
            required(ENV_PASSWORD)?,
        );
        creds.validate()?;
        Ok(creds)
    }

    /// Set the token endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Check that every field is present and the endpoint is an absolute URL.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("endpoint", &self.endpoint),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("username", &self.username),
            ("password", &self.password),
        ] {
            if value.is_empty() {
                return Err(Error::new(ErrorKind::InvalidCredentials(format!(
                    "{name} is empty"
                ))));
            }
        }
        url::Url::parse(&self.endpoint)?;
        Ok(())
    }

    /// The token endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The connected-app consumer key.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The service account username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The password-grant form fields, in wire order.
    pub(crate) fn grant_form(&self) -> [(&'static str, &str); 5] {
        [
            ("grant_type", "password"),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("username", &self.username),
            ("password", &self.password),
        ]
    }
}
