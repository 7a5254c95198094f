//! # sfconn
//!
//! A session-managed Salesforce client for service accounts.
//!
//! Logs in with the OAuth 2.0 username-password flow on first use, keeps the
//! session, and when Salesforce answers `INVALID_SESSION_ID` logs in again and
//! replays the request, a bounded number of times per call.
//!
//! ## Security
//!
//! - Secrets and tokens are redacted in Debug output
//! - Tracing skips credential parameters
//! - Error messages are sanitized before they reach callers
//! - Query parameters are escaped as SOQL string literals
//!
//! ## Crates
//!
//! - **sfconn-client** - HTTP transport, error envelope, escaping utilities
//! - **sfconn-auth** - Password-grant credentials and OAuth client
//! - **sfconn-rest** - Session manager, REST actions, parameterized SOQL
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sfconn::{ApiClient, QueryParam};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sfconn::Error> {
//!     // SALESFORCE_ENDPOINT, SALESFORCE_CLIENT_ID, ... must be set
//!     let client = ApiClient::from_env()?;
//!
//!     let accounts = client
//!         .query(
//!             "SELECT Id, Name FROM Account WHERE Industry = $1 LIMIT 10",
//!             Some(&[QueryParam::from("Energy")]),
//!         )
//!         .await?;
//!
//!     for account in accounts {
//!         println!("{}", account["Name"]);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub use sfconn_auth as auth;
pub use sfconn_client as client;
pub use sfconn_rest as rest;

pub use sfconn_auth::PasswordCredentials;
pub use sfconn_client::{ApiError, ClientConfig, RequestMethod, SfHttpClient};
pub use sfconn_rest::{
    substitute, ApiClient, ApiConfig, Error, ErrorKind, QueryParam, RestActionRequest,
    RestResult, Result, Session, SessionManager,
};
