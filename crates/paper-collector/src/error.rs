//! Error types for the paper collector.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.

use std::time::Duration;

/// Errors from the HTTP client layer.
///
/// None of these abort a collection run: adapters degrade every failure to an
/// empty result and the pipeline carries on with whatever it has accumulated.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Rate limited by a provider (429 response)
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Suggested wait time before retry
        retry_after: Duration,
    },

    /// Resource not found (404 response). Terminal: never retried.
    #[error("Resource not found: {resource}")]
    NotFound {
        /// Description of the missing resource
        resource: String,
    },

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Server error (5xx response)
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Unexpected HTTP status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },

    /// The bounded retry loop ran out of attempts.
    #[error("Retry budget exhausted after {attempts} attempts")]
    RetryBudgetExhausted {
        /// Total attempts made, including the first
        attempts: u32,
    },
}

impl ClientError {
    /// Create a rate limited error with retry-after duration.
    #[must_use]
    pub fn rate_limited(seconds: u64) -> Self {
        Self::RateLimited { retry_after: Duration::from_secs(seconds) }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    /// Returns true if this error is retryable.
    ///
    /// Only 404 and an exhausted budget are terminal; everything else gets
    /// another attempt until the budget runs out.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::NotFound { .. } | Self::RetryBudgetExhausted { .. })
    }

    /// Get the retry-after duration if this is a rate limit error.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_retryable() {
        assert!(ClientError::rate_limited(10).is_retryable());
        assert!(ClientError::server(500, "Internal error").is_retryable());
        assert!(
            ClientError::UnexpectedStatus { status: 400, message: "bad query".into() }
                .is_retryable()
        );

        assert!(!ClientError::not_found("10.1234/x").is_retryable());
        assert!(!ClientError::RetryBudgetExhausted { attempts: 4 }.is_retryable());
    }

    #[test]
    fn test_client_error_retry_after() {
        let err = ClientError::rate_limited(10);
        assert_eq!(err.retry_after(), Some(Duration::from_secs(10)));

        let err = ClientError::not_found("paper");
        assert_eq!(err.retry_after(), None);
    }

    #[test]
    fn test_parse_error_from_serde() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let err = ClientError::from(parse_err);
        assert!(err.is_retryable());
        assert!(err.to_string().contains("parse"));
    }
}
