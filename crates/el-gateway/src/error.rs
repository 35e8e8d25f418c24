//! Error types for the gateway client

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Error types for the gateway client
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Authentication failed (401) - bad server key
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Authorization failed (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error (400/422) - malformed payment request
    #[error("Validation error: {0}")]
    Validation(String),

    /// Rate limit exceeded (429)
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Server error (5xx)
    #[error("Gateway server error: {0}")]
    Server(String),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl GatewayError {
    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::RateLimited | GatewayError::Server(_))
    }

    /// Create an error from an HTTP status code and response body
    pub fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            400 | 422 => GatewayError::Validation(message),
            401 => GatewayError::Authentication(message),
            403 => GatewayError::Forbidden(message),
            404 => GatewayError::NotFound(message),
            429 => GatewayError::RateLimited,
            500..=599 => GatewayError::Server(message),
            _ => GatewayError::Other(format!("HTTP {}: {}", status, message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_taxonomy() {
        assert!(matches!(
            GatewayError::from_status(StatusCode::BAD_REQUEST, "bad cart".into()),
            GatewayError::Validation(_)
        ));
        assert!(matches!(
            GatewayError::from_status(StatusCode::UNAUTHORIZED, "bad key".into()),
            GatewayError::Authentication(_)
        ));
        assert!(matches!(
            GatewayError::from_status(StatusCode::BAD_GATEWAY, "down".into()),
            GatewayError::Server(_)
        ));
    }

    #[test]
    fn test_retryability() {
        assert!(GatewayError::RateLimited.is_retryable());
        assert!(GatewayError::Server("503".into()).is_retryable());
        assert!(!GatewayError::Validation("bad".into()).is_retryable());
        assert!(!GatewayError::Authentication("bad".into()).is_retryable());
    }
}
