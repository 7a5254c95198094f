//! # sfconn-client
//!
//! HTTP transport infrastructure for Salesforce APIs.
//!
//! This crate provides the leaf layer the session and REST crates build on:
//! - A thin transport over `reqwest` that returns the raw status and body
//! - Request building with bearer auth, JSON and form bodies
//! - The Salesforce error envelope type (`ApiError`)
//! - SOQL and URL escaping utilities
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       ApiClient                             │
//! │  (sfconn-rest: rest_action, query, bounded reattempts)      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     SessionManager                          │
//! │  (sfconn-rest + sfconn-auth: password grant, expiry)        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      SfHttpClient                           │
//! │  - Raw HTTP: method, url, headers, body                     │
//! │  - Returns transport error or (status, body)                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use sfconn_client::{ClientConfig, SfHttpClient};
//!
//! let http = SfHttpClient::new(ClientConfig::default())?;
//! let response = http
//!     .send(http.get("https://na1.salesforce.com/services/data").bearer_auth(token))
//!     .await?;
//!
//! println!("{} {}", response.status(), response.body());
//! ```

mod client;
mod config;
mod error;
mod request;
mod response;
pub mod security;

pub use client::SfHttpClient;
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT};
pub use error::{Error, ErrorKind, Result};
pub use request::{RequestBody, RequestBuilder, RequestMethod};
pub use response::{sanitize_error_message, ApiError, RawResponse, SESSION_EXPIRED_CODE};

/// Default Salesforce API version
pub const DEFAULT_API_VERSION: &str = "62.0";

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("sfconn/", env!("CARGO_PKG_VERSION"));
