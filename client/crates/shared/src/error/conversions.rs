//! Error conversions - From implementations for common error types
//!
//! Provides automatic conversion from common error types to [`AppError`].

use super::app_error::AppError;
use super::kind::ErrorKind;

// ============================================================================
// Standard library conversions
// ============================================================================

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::Forbidden,
            std::io::ErrorKind::TimedOut => ErrorKind::RequestTimeout,
            _ => ErrorKind::InternalServerError,
        };
        AppError::new(kind, "I/O operation failed").with_source(err)
    }
}

// ============================================================================
// serde_json conversions
// ============================================================================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() || err.is_eof() {
            AppError::bad_gateway(format!("Malformed JSON: {}", err)).with_source(err)
        } else {
            AppError::internal("JSON serialization error").with_source(err)
        }
    }
}

// ============================================================================
// reqwest conversions (feature-gated)
// ============================================================================

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return AppError::gateway_timeout("Authority did not respond in time").with_source(err);
        }
        if err.is_connect() {
            return AppError::service_unavailable("Authority unreachable").with_source(err);
        }
        if let Some(status) = err.status() {
            let kind = ErrorKind::from_status(status.as_u16()).unwrap_or(ErrorKind::BadGateway);
            return AppError::new(kind, format!("Authority responded with {}", status))
                .with_source(err);
        }
        if err.is_decode() {
            return AppError::bad_gateway("Authority returned an unreadable body").with_source(err);
        }
        if err.is_builder() {
            return AppError::internal("Invalid authority request").with_source(err);
        }
        AppError::service_unavailable("Authority request failed").with_source(err)
    }
}

// ============================================================================
// url conversions (feature-gated)
// ============================================================================

#[cfg(feature = "url")]
impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::bad_request(format!("Invalid URL: {}", err)).with_source(err)
    }
}
