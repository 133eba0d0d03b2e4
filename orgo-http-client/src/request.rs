//! Request builder.

use crate::config::API_TOKEN_HEADER;
use crate::{HttpClient, HttpClientError, Response, Result};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use std::time::Duration;

/// HTTP request builder.
pub struct RequestBuilder<'a> {
    client: &'a HttpClient,
    method: Method,
    url: String,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    timeout: Option<Duration>,
    error: Option<HttpClientError>,
}

impl<'a> RequestBuilder<'a> {
    /// Create a new request builder.
    pub(crate) fn new(client: &'a HttpClient, method: Method, url: String) -> Self {
        Self {
            client,
            method,
            url,
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: None,
            timeout: None,
            error: None,
        }
    }

    /// Add a header to the request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match (
            HeaderName::try_from(name.as_str()),
            HeaderValue::try_from(value.as_str()),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => {
                self.error = Some(HttpClientError::RequestBuild(format!(
                    "invalid header: {}",
                    name
                )));
            }
        }
        self
    }

    /// Add a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set the request body as raw bytes.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: Serialize>(mut self, json: &T) -> Self {
        match serde_json::to_vec(json) {
            Ok(bytes) => {
                self.headers.insert(
                    http::header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                );
                self.body = Some(bytes);
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize JSON body");
                self.error = Some(e.into());
            }
        }
        self
    }

    /// Set a custom timeout for this request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the URL with query parameters.
    ///
    /// Relative paths are appended to the configured base URL, keeping any
    /// path prefix the base carries (`/api/v1`).
    fn build_url(&self) -> Result<url::Url> {
        let raw = if self.url.starts_with("http://") || self.url.starts_with("https://") {
            self.url.clone()
        } else {
            join_base(&self.client.config().base_url, &self.url)
        };

        let mut url =
            url::Url::parse(&raw).map_err(|e| HttpClientError::InvalidUrl(e.to_string()))?;

        if !self.query.is_empty() {
            let mut query_pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                query_pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Send the request.
    pub async fn send(mut self) -> Result<Response> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }

        let url = self.build_url()?;
        let config = self.client.config();

        let mut request = self.client.inner().request(self.method.clone(), url);

        for (name, value) in &config.default_headers {
            request = request.header(name.as_str(), value.as_str());
        }

        if let Some(token) = &config.api_token {
            request = request.header(API_TOKEN_HEADER, token.as_str());
        }

        for (name, value) in &self.headers {
            request = request.header(name, value);
        }

        if let Some(body) = self.body {
            request = request.body(body);
        }

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        self.client.execute(request.build()?).await
    }
}

/// Join a base URL and a relative path with exactly one slash between them.
fn join_base(base: &str, path: &str) -> String {
    if path.is_empty() {
        return base.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HttpClientConfig;

    fn client(base: &str) -> HttpClient {
        HttpClient::new(HttpClientConfig::builder().base_url(base).build()).unwrap()
    }

    #[test]
    fn test_join_keeps_base_path() {
        assert_eq!(
            join_base("https://app.orgo.space/api/v1", "/webhook_subscriptions"),
            "https://app.orgo.space/api/v1/webhook_subscriptions"
        );
        assert_eq!(
            join_base("https://app.orgo.space/api/v1/", "me"),
            "https://app.orgo.space/api/v1/me"
        );
        assert_eq!(join_base("http://x", ""), "http://x");
    }

    #[test]
    fn test_build_url_with_query() {
        let client = client("https://app.orgo.space/api/v1");
        let url = client
            .get("/webhook_subscriptions")
            .query("limit", "25")
            .build_url()
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://app.orgo.space/api/v1/webhook_subscriptions?limit=25"
        );
    }

    #[test]
    fn test_absolute_url_ignores_base() {
        let client = client("https://app.orgo.space/api/v1");
        let url = client.get("http://other.host/ping").build_url().unwrap();
        assert_eq!(url.as_str(), "http://other.host/ping");
    }

    #[tokio::test]
    async fn test_invalid_header_is_reported_on_send() {
        let client = client("http://127.0.0.1:9");
        let result = client.get("/me").header("bad header", "x").send().await;
        assert!(matches!(result, Err(HttpClientError::RequestBuild(_))));
    }
}
