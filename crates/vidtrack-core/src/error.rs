//! Unified error handling for vidtrack-core

use thiserror::Error;

/// Core error type for vidtrack-core
#[derive(Error, Debug)]
pub enum Error {
    /// The local ledger predicts insufficient budget, or the upstream API
    /// returned a quota/forbidden signal. Never retried automatically.
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {0}")]
    Api(String),

    /// Unexpected payload shape from the upstream API. The offending body is
    /// logged (truncated) at the point of failure; nothing is cached.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for vidtrack-core
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a quota-exceeded error
    pub fn quota_exceeded(msg: impl Into<String>) -> Self {
        Error::QuotaExceeded(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Error::Network(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }

    /// Whether this error is a quota-exceeded signal (local or upstream).
    ///
    /// Callers use this to distinguish "stop issuing requests" from failures
    /// that a higher layer may retry.
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Error::QuotaExceeded(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Network("Request timed out".to_string())
        } else if err.is_connect() {
            Error::Network("Connection failed".to_string())
        } else if err.is_status() {
            match err.status() {
                // 403 is YouTube's quota/forbidden signal; the transport
                // inspects the error body for the exact reason before this
                // conversion is ever reached, so this is the coarse fallback.
                Some(status) if status.as_u16() == 403 => {
                    Error::QuotaExceeded("Access forbidden (HTTP 403)".to_string())
                }
                Some(status) if status.as_u16() == 429 => {
                    Error::QuotaExceeded("Rate limited (HTTP 429)".to_string())
                }
                Some(status) => Error::Api(format!("HTTP {}", status)),
                None => Error::Network(err.to_string()),
            }
        } else if err.is_decode() {
            Error::MalformedResponse(err.to_string())
        } else {
            Error::Network(err.to_string())
        }
    }
}

// Convert to String for embedding hosts (Tauri commands, FFI shims)
impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::quota_exceeded("daily limit reached");
        assert_eq!(err.to_string(), "Quota exceeded: daily limit reached");
    }

    #[test]
    fn test_is_quota_exceeded() {
        assert!(Error::quota_exceeded("x").is_quota_exceeded());
        assert!(!Error::network("x").is_quota_exceeded());
        assert!(!Error::validation("x").is_quota_exceeded());
    }

    #[test]
    fn test_error_conversion_to_string() {
        let err = Error::validation("empty query");
        let s: String = err.into();
        assert!(s.contains("Validation error"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_from_serde() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
