//! Session-managed Salesforce API client.
//!
//! Every call goes through [`SessionManager::ensure_connected`], sends one
//! request, and classifies the response. An expired session is invalidated
//! and the same request is replayed, up to `max_reattempts` times per call.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use sfconn_auth::PasswordCredentials;
use sfconn_client::{
    sanitize_error_message, ClientConfig, RequestBuilder, SfHttpClient, SESSION_EXPIRED_CODE,
};

use crate::config::ApiConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::outcome::ApiOutcome;
use crate::session::{Session, SessionManager};

mod query;
mod rest;

/// Salesforce REST and query client with transparent reauthentication.
///
/// Cloning is cheap. Clones share one [`SessionManager`], so a login done
/// by one clone is reused by all of them.
///
/// # Example
///
/// ```rust,ignore
/// use sfconn_rest::{ApiClient, QueryParam, RestActionRequest};
/// use serde_json::json;
///
/// let client = ApiClient::from_env()?;
///
/// let contacts = client
///     .query(
///         "SELECT Id, Name FROM Contact WHERE Email = $1",
///         Some(&[QueryParam::from("a@b.com")]),
///     )
///     .await?;
///
/// let created = client
///     .rest_action(RestActionRequest::post("Contact").with_body(json!({"LastName": "Smith"})))
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: SfHttpClient,
    session: Arc<SessionManager>,
    config: ApiConfig,
}

impl ApiClient {
    /// Create a client from its parts.
    pub fn new(http: SfHttpClient, session: Arc<SessionManager>, config: ApiConfig) -> Self {
        Self {
            http,
            session,
            config,
        }
    }

    /// Create a client whose login and API calls share one transport.
    pub fn with_credentials(
        http: SfHttpClient,
        credentials: PasswordCredentials,
        config: ApiConfig,
    ) -> Self {
        let session = Arc::new(SessionManager::with_http(http.clone(), credentials));
        Self::new(http, session, config)
    }

    /// Create a client from `SALESFORCE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let http = SfHttpClient::new(ClientConfig::default())?;
        Ok(Self::with_credentials(
            http,
            PasswordCredentials::from_env()?,
            ApiConfig::from_env()?,
        ))
    }

    /// The shared session manager.
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// The endpoint configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Send the request built by `build` until it stops failing with an
    /// expired session or the reattempt bound is reached.
    ///
    /// `build` runs once per attempt against the session of that attempt.
    async fn send_with_reattempts<F>(&self, build: F) -> Result<Option<Value>>
    where
        F: Fn(&Session) -> RequestBuilder,
    {
        let max_reattempts = self.config.max_reattempts;
        let mut reattempts = 0u32;

        loop {
            let session = self.session.ensure_connected().await?;
            let response = self.http.send(build(&session)).await?;
            let outcome = ApiOutcome::decode(&response)?;
            let expired = outcome.is_session_expired();

            if expired {
                self.session.invalidate_session(&session).await;

                if reattempts < max_reattempts {
                    reattempts += 1;
                    warn!(reattempts, max_reattempts, "Session expired, reauthenticating");
                    continue;
                }
            }

            return match outcome {
                ApiOutcome::Success(payload) => {
                    if reattempts > 0 {
                        debug!(reattempts, "Succeeded after reauthentication");
                    }
                    Ok(payload)
                }
                ApiOutcome::ApiErrors(mut errors) if expired => {
                    if let Some(first) = errors.first_mut() {
                        first.error_description = Some(format!(
                            "Got back {SESSION_EXPIRED_CODE} from Salesforce. \
                             {reattempts} attempt(s) tried to get new key."
                        ));
                    }
                    warn!(reattempts, "Giving up after repeated session expiry");
                    Err(Error::new(ErrorKind::SessionExpired {
                        attempts: reattempts,
                        errors,
                    }))
                }
                ApiOutcome::ApiErrors(errors) => {
                    debug!(errors = errors.len(), "Salesforce returned errors");
                    Err(Error::new(ErrorKind::Application(errors)))
                }
                ApiOutcome::Unrecognized { status, body } => Err(Error::new(ErrorKind::Http {
                    status,
                    message: sanitize_error_message(&body),
                })),
            };
        }
    }

    fn url(&self, session: &Session, base_path: &str, rest: &str) -> String {
        format!(
            "{}{}{}",
            session.instance_url().trim_end_matches('/'),
            base_path,
            rest
        )
    }
}
