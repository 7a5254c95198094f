//! # sfconn-rest
//!
//! Session-managed Salesforce REST actions and SOQL queries.
//!
//! ## Features
//!
//! - **Lazy login** - the first call performs a password grant, later calls
//!   reuse the session
//! - **Transparent reauthentication** - an `INVALID_SESSION_ID` response
//!   invalidates the session and replays the request, up to a configured
//!   number of reattempts per call
//! - **REST actions** - any method against `{sobject}[/{id}]`
//! - **SOQL queries** - `$1`, `$2`, ... placeholders replaced with escaped
//!   literals
//!
//! ## Example
//!
//! ```rust,ignore
//! use sfconn_rest::{ApiClient, QueryParam, RestActionRequest};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sfconn_rest::Error> {
//!     let client = ApiClient::from_env()?;
//!
//!     let contacts = client
//!         .query(
//!             "SELECT Id FROM Contact WHERE Email = $1",
//!             Some(&[QueryParam::from("a@b.com")]),
//!         )
//!         .await?;
//!
//!     let created = client
//!         .rest_action(RestActionRequest::post("Contact").with_body(json!({"LastName": "Smith"})))
//!         .await?;
//!     println!("{} contact(s), created {}", contacts.len(), created);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod outcome;
mod params;
mod request;
mod session;

pub use client::ApiClient;
pub use config::{ApiConfig, ENV_RECONNECT_ATTEMPTS, ENV_REST_API, ENV_SERVICE_QUERY};
pub use error::{Error, ErrorKind, Result};
pub use outcome::ApiOutcome;
pub use params::{substitute, QueryParam};
pub use request::{RestActionRequest, RestResult};
pub use session::{Session, SessionManager};

pub use sfconn_client::{ApiError, RequestMethod};
