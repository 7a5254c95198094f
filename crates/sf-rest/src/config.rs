//! Endpoint paths and the reattempt bound.

use crate::error::{Error, ErrorKind, Result};

/// Environment variable holding the REST base path.
pub const ENV_REST_API: &str = "SALESFORCE_REST_API";
/// Environment variable holding the query base path.
pub const ENV_SERVICE_QUERY: &str = "SALESFORCE_SERVICE_QUERY";
/// Environment variable holding the maximum number of reattempts.
pub const ENV_RECONNECT_ATTEMPTS: &str = "SALESFORCE_RECONNECT_ATTEMPTS";

/// Where REST and query calls go, and how often an expired session is
/// re-established within one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Prefix appended to the instance URL for REST actions,
    /// e.g. `/services/data/v62.0/sobjects`.
    pub rest_base_path: String,
    /// Prefix appended to the instance URL before the encoded query,
    /// e.g. `/services/data/v62.0/query?q=`.
    pub query_base_path: String,
    /// Maximum number of reauthenticate-and-replay cycles per call.
    pub max_reattempts: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let version = sfconn_client::DEFAULT_API_VERSION;
        Self {
            rest_base_path: format!("/services/data/v{version}/sobjects"),
            query_base_path: format!("/services/data/v{version}/query?q="),
            max_reattempts: 1,
        }
    }
}

impl ApiConfig {
    /// Create a config with default paths for the current API version.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the config from environment variables.
    ///
    /// Reads `SALESFORCE_REST_API`, `SALESFORCE_SERVICE_QUERY` and
    /// `SALESFORCE_RECONNECT_ATTEMPTS`. All are required.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| {
                    Error::new(ErrorKind::Config(format!(
                        "environment variable not set: {key}"
                    )))
                })
        };

        let attempts = required(ENV_RECONNECT_ATTEMPTS)?;
        let max_reattempts = attempts.trim().parse::<u32>().map_err(|e| {
            Error::with_source(
                ErrorKind::Config(format!(
                    "{ENV_RECONNECT_ATTEMPTS} must be a non-negative integer, got {attempts:?}"
                )),
                e,
            )
        })?;

        Ok(Self {
            rest_base_path: required(ENV_REST_API)?,
            query_base_path: required(ENV_SERVICE_QUERY)?,
            max_reattempts,
        })
    }

    /// Set the REST base path.
    pub fn with_rest_base_path(mut self, path: impl Into<String>) -> Self {
        self.rest_base_path = path.into();
        self
    }

    /// Set the query base path.
    pub fn with_query_base_path(mut self, path: impl Into<String>) -> Self {
        self.query_base_path = path.into();
        self
    }

    /// Set the maximum number of reattempts per call.
    pub fn with_max_reattempts(mut self, max_reattempts: u32) -> Self {
        self.max_reattempts = max_reattempts;
        self
    }
}
