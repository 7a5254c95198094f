//! OAuth 2.0 username-password flow.
//!
//! The flow posts a form-encoded grant to the token endpoint and reads back
//! the instance URL and access token. It is the only flow a headless service
//! account needs; refresh tokens are never requested.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use sfconn_client::{sanitize_error_message, ClientConfig, SfHttpClient};

use crate::credentials::PasswordCredentials;
use crate::error::{Error, ErrorKind, Result};

/// OAuth client for authenticating with Salesforce.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    http: SfHttpClient,
}

impl OAuthClient {
    /// Create an OAuth client over an existing transport.
    pub fn new(http: SfHttpClient) -> Self {
        Self { http }
    }

    /// Create an OAuth client with a default transport.
    pub fn default_client() -> Result<Self> {
        Ok(Self::new(SfHttpClient::new(ClientConfig::default())?))
    }

    /// Exchange username and password for a session.
    ///
    /// A body carrying an `error` field fails with [`ErrorKind::OAuth`],
    /// whatever the HTTP status. A body without `instance_url` and
    /// `access_token` fails with [`ErrorKind::MalformedResponse`].
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn password_grant(&self, credentials: &PasswordCredentials) -> Result<TokenResponse> {
        let request = self
            .http
            .post(credentials.endpoint())
            .header("Accept", "application/json")
            .form(credentials.grant_form());

        let response = self.http.send(request).await?;

        let value: serde_json::Value = response.json().map_err(|e| {
            Error::with_source(
                ErrorKind::MalformedResponse(format!(
                    "token endpoint returned non-JSON body (status {})",
                    response.status()
                )),
                e,
            )
        })?;

        if value.get("error").is_some() {
            let error: OAuthErrorResponse = serde_json::from_value(value).unwrap_or_default();
            warn!(error = %error.error, "Password grant rejected");
            return Err(Error::new(ErrorKind::OAuth {
                error: error.error,
                description: sanitize_error_message(&error.error_description),
            }));
        }

        let token: TokenResponse = serde_json::from_value(value).map_err(|e| {
            Error::with_source(
                ErrorKind::MalformedResponse(
                    "token response missing instance_url or access_token".to_string(),
                ),
                e,
            )
        })?;

        if token.instance_url.is_empty() || token.access_token.is_empty() {
            return Err(Error::new(ErrorKind::MalformedResponse(
                "token response has empty instance_url or access_token".to_string(),
            )));
        }

        info!(instance_url = %token.instance_url, "Authenticated");
        Ok(token)
    }
}

/// Token response from the password grant.
///
/// The access token and signature are redacted in Debug output.
#[derive(Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    /// Access token.
    pub access_token: String,
    /// Instance URL.
    pub instance_url: String,
    /// User ID URL.
    #[serde(default)]
    pub id: Option<String>,
    /// Token type (usually "Bearer").
    #[serde(default)]
    pub token_type: Option<String>,
    /// Signature for verification.
    #[serde(default)]
    pub signature: Option<String>,
    /// Issued at timestamp.
    #[serde(default)]
    pub issued_at: Option<String>,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("instance_url", &self.instance_url)
            .field("id", &self.id)
            .field("token_type", &self.token_type)
            .field("signature", &self.signature.as_ref().map(|_| "[REDACTED]"))
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

/// OAuth error response.
#[derive(Debug, Default, Deserialize)]
struct OAuthErrorResponse {
    #[serde(default)]
    error: String,
    #[serde(default)]
    error_description: String,
}
