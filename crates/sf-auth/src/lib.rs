//! # sfconn-auth
//!
//! Salesforce authentication for service accounts using the OAuth 2.0
//! username-password flow.
//!
//! ## Security
//!
//! - Secrets and passwords are redacted in Debug output
//! - Tracing spans skip credential parameters
//! - Error messages never echo credential values
//!
//! ## Example
//!
//! ```rust,ignore
//! use sfconn_auth::{OAuthClient, PasswordCredentials};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sfconn_auth::Error> {
//!     let creds = PasswordCredentials::from_env()?;
//!     let oauth = OAuthClient::default_client()?;
//!
//!     let token = oauth.password_grant(&creds).await?;
//!     println!("connected to {}", token.instance_url);
//!
//!     Ok(())
//! }
//! ```

mod credentials;
mod error;
mod oauth;

pub use credentials::PasswordCredentials;
pub use error::{Error, ErrorKind, Result};
pub use oauth::{OAuthClient, TokenResponse};

/// Default Salesforce token endpoint for production orgs.
pub const PRODUCTION_TOKEN_URL: &str = "https://login.salesforce.com/services/oauth2/token";

/// Default Salesforce token endpoint for sandboxes.
pub const SANDBOX_TOKEN_URL: &str = "https://test.salesforce.com/services/oauth2/token";
