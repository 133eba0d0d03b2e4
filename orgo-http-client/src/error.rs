//! HTTP Client error types.

use thiserror::Error;

/// Result type for HTTP client operations.
pub type Result<T> = std::result::Result<T, HttpClientError>;

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum HttpClientError {
    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Request building error.
    #[error("Failed to build request: {0}")]
    RequestBuild(String),

    /// The server answered with a non-success status.
    #[error("Response error: {status} - {message}")]
    Response {
        /// HTTP status code.
        status: u16,
        /// Error message, usually the response body.
        message: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Underlying HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl HttpClientError {
    /// Check if this is a timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }

    /// Check if this is a connection error.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_connect())
    }

    /// Get the HTTP status code if this is a response error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the server reported the resource as missing (404 or 410).
    pub fn is_not_found(&self) -> bool {
        matches!(self.status_code(), Some(404) | Some(410))
    }
}

impl From<serde_json::Error> for HttpClientError {
    fn from(err: serde_json::Error) -> Self {
        HttpClientError::Json(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code() {
        let err = HttpClientError::Response {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert_eq!(err.status_code(), Some(503));
        assert!(!err.is_not_found());

        let err = HttpClientError::InvalidUrl("nope".to_string());
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn test_not_found() {
        let gone = HttpClientError::Response {
            status: 410,
            message: String::new(),
        };
        let missing = HttpClientError::Response {
            status: 404,
            message: "Not Found".to_string(),
        };
        assert!(gone.is_not_found());
        assert!(missing.is_not_found());
    }

    #[test]
    fn test_display_carries_upstream_message() {
        let err = HttpClientError::Response {
            status: 422,
            message: "{\"error\":\"url is invalid\"}".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("422"));
        assert!(display.contains("url is invalid"));
    }
}
