//! # Orgo HTTP Client
//!
//! A small JSON REST client for the Orgo API. Every request is sent against a
//! configured base URL and authenticated with the `Api-Token` header.
//!
//! The [`RestClient`] trait is the seam the webhook lifecycle code depends on;
//! [`HttpClient`] is the `reqwest`-backed implementation.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use orgo_http_client::{HttpClient, HttpClientConfig, RestClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = HttpClientConfig::builder()
//!         .base_url("https://app.orgo.space/api/v1")
//!         .api_token("my-token")
//!         .build();
//!
//!     let client = HttpClient::new(config)?;
//!     let me = client.get_json("/me").await?;
//!
//!     println!("Authenticated as: {}", me);
//!     Ok(())
//! }
//! ```
//!
//! ## Raw requests
//!
//! ```rust,no_run
//! use orgo_http_client::{HttpClient, HttpClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpClient::new(
//!         HttpClientConfig::builder()
//!             .base_url("https://app.orgo.space/api/v1")
//!             .api_token("my-token")
//!             .build(),
//!     )?;
//!
//!     let response = client
//!         .get("/webhook_subscriptions")
//!         .query("limit", "25")
//!         .send()
//!         .await?;
//!
//!     println!("Status: {}", response.status());
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod request;
mod response;
mod rest;

pub use client::HttpClient;
pub use config::{API_TOKEN_HEADER, DEFAULT_API_URL, HttpClientConfig, HttpClientConfigBuilder};
pub use error::{HttpClientError, Result};
pub use request::RequestBuilder;
pub use response::Response;
pub use rest::RestClient;

// Re-export common types
pub use bytes::Bytes;
pub use http::{HeaderMap, HeaderValue, Method, StatusCode, header};
pub use url::Url;

/// Prelude for common imports.
///
/// ```
/// use orgo_http_client::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::HttpClient;
    pub use crate::config::{HttpClientConfig, HttpClientConfigBuilder};
    pub use crate::error::{HttpClientError, Result};
    pub use crate::request::RequestBuilder;
    pub use crate::response::Response;
    pub use crate::rest::RestClient;
    pub use http::{Method, StatusCode};
}
