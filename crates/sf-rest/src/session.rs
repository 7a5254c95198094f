//! Session lifecycle: lazy password-grant login and invalidation on expiry.

use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use sfconn_auth::{OAuthClient, PasswordCredentials};
use sfconn_client::SfHttpClient;

use crate::error::Result;

/// A snapshot of an established session.
///
/// The access token is redacted in Debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    instance_url: String,
    access_token: String,
    generation: u64,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("instance_url", &self.instance_url)
            .field("access_token", &"[REDACTED]")
            .field("generation", &self.generation)
            .finish()
    }
}

impl Session {
    /// The org's instance URL, e.g. `https://na1.salesforce.com`.
    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    /// The bearer token.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Which authentication produced this session. Starts at 1.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Default)]
struct SessionState {
    instance_url: String,
    access_token: String,
    connected: bool,
    generation: u64,
}

impl SessionState {
    fn snapshot(&self) -> Session {
        Session {
            instance_url: self.instance_url.clone(),
            access_token: self.access_token.clone(),
            generation: self.generation,
        }
    }
}

/// Owns the connection state shared by every clone of an `ApiClient`.
///
/// All state changes happen under one async mutex. A caller that finds the
/// session disconnected authenticates while holding it, so concurrent callers
/// wait for that single login and reuse its result.
pub struct SessionManager {
    oauth: OAuthClient,
    credentials: PasswordCredentials,
    state: Mutex<SessionState>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Create a disconnected session manager.
    pub fn new(oauth: OAuthClient, credentials: PasswordCredentials) -> Self {
        Self {
            oauth,
            credentials,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Create a session manager that authenticates over `http`.
    pub fn with_http(http: SfHttpClient, credentials: PasswordCredentials) -> Self {
        Self::new(OAuthClient::new(http), credentials)
    }

    /// Create a session manager from `SALESFORCE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let credentials = PasswordCredentials::from_env()?;
        Ok(Self::new(OAuthClient::default_client()?, credentials))
    }

    /// Return the current session, authenticating first if disconnected.
    ///
    /// While connected this makes no network call. Failed authentication
    /// leaves the manager disconnected.
    #[instrument(skip(self))]
    pub async fn ensure_connected(&self) -> Result<Session> {
        let mut state = self.state.lock().await;
        if state.connected {
            return Ok(state.snapshot());
        }

        debug!("Not connected, authenticating");
        let token = self.oauth.password_grant(&self.credentials).await?;

        state.instance_url = token.instance_url;
        state.access_token = token.access_token;
        state.connected = true;
        state.generation += 1;
        info!(
            instance_url = %state.instance_url,
            generation = state.generation,
            "Session established"
        );

        Ok(state.snapshot())
    }

    /// Mark the session as disconnected.
    ///
    /// The cached URL and token are kept until the next successful login
    /// overwrites them.
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        if state.connected {
            debug!(generation = state.generation, "Session invalidated");
        }
        state.connected = false;
    }

    /// Mark `session` as expired, unless a newer login already replaced it.
    ///
    /// Returns true if this call disconnected the manager.
    pub async fn invalidate_session(&self, session: &Session) -> bool {
        let mut state = self.state.lock().await;
        if state.connected && state.generation == session.generation {
            state.connected = false;
            debug!(generation = session.generation, "Expired session invalidated");
            true
        } else {
            false
        }
    }

    /// Returns true if a session is believed valid.
    pub async fn is_connected(&self) -> bool {
        self.state.lock().await.connected
    }

    /// The current session, if connected. Never touches the network.
    pub async fn current(&self) -> Option<Session> {
        let state = self.state.lock().await;
        state.connected.then(|| state.snapshot())
    }
}
