//! Error types for the Outly domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! [`Error`] is the request-level taxonomy every handler maps to a status
//! code; the transport errors below it belong to one collaborator each.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// The top-level error type for a single advisory request.
#[derive(Debug, Error)]
pub enum Error {
    /// The caller exhausted its request budget for the current window.
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited {
        retry_after_secs: u64,
        limit: u32,
        reset_at: DateTime<Utc>,
    },

    /// A required credential or setting is missing. Operator-fixable.
    #[error("{0}")]
    Config(String),

    /// The caller sent a request the server cannot act on.
    #[error("{0}")]
    Validation(String),

    /// A weather or LLM provider call failed. Surfaced verbatim, never retried.
    #[error("{message}")]
    Upstream { message: String, details: String },
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build an [`Error::Upstream`] from any displayable transport error.
    pub fn upstream(message: impl Into<String>, source: &dyn std::error::Error) -> Self {
        Self::Upstream {
            message: message.into(),
            details: source.to_string(),
        }
    }
}

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl From<ProviderError> for Error {
    fn from(err: ProviderError) -> Self {
        let message = match &err {
            ProviderError::Timeout(_) => "LLM provider timed out".to_string(),
            ProviderError::RateLimited { .. } => "LLM provider is rate limiting requests".to_string(),
            ProviderError::AuthenticationFailed(_) => "LLM provider rejected the API key".to_string(),
            ProviderError::ApiError { .. } | ProviderError::Network(_) => {
                "Failed to generate response".to_string()
            }
        };
        Error::Upstream {
            message,
            details: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum WeatherError {
    #[error("Weather API error (status: {status_code}): {message}")]
    Api { status_code: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid weather payload: {0}")]
    Parse(String),
}
