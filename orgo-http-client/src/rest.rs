//! JSON REST seam used by the webhook lifecycle code.

use async_trait::async_trait;
use http::Method;
use serde_json::Value;

use crate::{HttpClient, Result};

/// Issues authenticated JSON requests against the Orgo API.
///
/// Paths are relative to the configured base URL. Successful responses are
/// returned as JSON (`null` for an empty body, a string for a body that is
/// not JSON); non-2xx statuses become
/// [`HttpClientError::Response`](crate::HttpClientError::Response).
#[async_trait]
pub trait RestClient: Send + Sync {
    /// Send one request with an optional JSON body.
    async fn send_json(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value>;

    /// `GET path`
    async fn get_json(&self, path: &str) -> Result<Value> {
        self.send_json(Method::GET, path, None).await
    }

    /// `POST path` with an optional JSON body
    async fn post_json(&self, path: &str, body: Option<Value>) -> Result<Value> {
        self.send_json(Method::POST, path, body).await
    }

    /// `PATCH path` with a JSON body
    async fn patch_json(&self, path: &str, body: Value) -> Result<Value> {
        self.send_json(Method::PATCH, path, Some(body)).await
    }

    /// `DELETE path`
    async fn delete_json(&self, path: &str) -> Result<Value> {
        self.send_json(Method::DELETE, path, None).await
    }
}

#[async_trait]
impl RestClient for HttpClient {
    async fn send_json(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let mut request = self
            .request(method, path)
            .header("Accept", "application/json");

        if let Some(body) = &body {
            request = request.json(body);
        }

        Ok(request.send().await?.error_for_status()?.json_or_text())
    }
}
