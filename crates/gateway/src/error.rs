//! Mapping of request errors onto HTTP responses.

use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use outly_core::Error;
use serde::Serialize;
use tracing::error;

pub const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
pub const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
pub const X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

/// `X-RateLimit-*` headers; `reset` is the window end in epoch milliseconds.
pub fn rate_headers(limit: u32, remaining: u32, reset: i64) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(limit));
    headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(remaining));
    headers.insert(X_RATELIMIT_RESET, HeaderValue::from(reset));
    headers
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Handler error: any [`outly_core::Error`], rendered as `{ error[, details] }`.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self.0.to_string();
        match self.0 {
            Error::RateLimited {
                retry_after_secs,
                limit,
                reset_at,
            } => {
                let mut headers = rate_headers(limit, 0, reset_at.timestamp_millis());
                headers.insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
                let body = ErrorBody { error, details: None };
                (StatusCode::TOO_MANY_REQUESTS, headers, Json(body)).into_response()
            }
            Error::Validation(_) => {
                let body = ErrorBody { error, details: None };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Error::Config(_) => {
                let body = ErrorBody { error, details: None };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
            Error::Upstream { details, .. } => {
                error!(error = %error, details = %details, "Upstream request failed");
                let body = ErrorBody {
                    error,
                    details: Some(details),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}
