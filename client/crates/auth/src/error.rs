//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system, plus the user-facing messages the
//! sign-in flows surface.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::config::EnvError;
use platform::http::HttpError;
use platform::storage::StorageError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Messages shown to the user on the sign-in screen.
pub mod message {
    pub const PAID_REQUIRED: &str =
        "A paid Hollywood Signal subscription is required to access Mandate Wizard.";
    pub const INVALID_LINK: &str = "Invalid or expired magic link.";
    pub const VERIFY_FAILED: &str = "Failed to verify authentication. Please try again.";
    pub const LINK_FAILED: &str = "Failed to send magic link. Please try again.";
    pub const NETWORK_ERROR: &str = "Network error. Please check your connection and try again.";
    pub const INVALID_EMAIL: &str = "Please enter a valid email address.";
    pub const STORAGE_UNAVAILABLE: &str =
        "Your session could not be saved on this device. Please try again.";
    pub const GENERIC: &str = "Something went wrong. Please try again.";
}

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email failed local validation
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// No response from the authority (connect failure, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// The authority answered with something this client cannot use
    #[error("Unexpected authority response: {0}")]
    UnexpectedResponse(String),

    /// Magic-link token rejected, with the authority's message if any
    #[error("Invalid credential: {}", .0.as_deref().unwrap_or("no reason given"))]
    InvalidCredential(Option<String>),

    /// Credential valid but the subscription is not paid
    #[error("Paid subscription required")]
    EntitlementRequired,

    /// Magic-link request refused, with the authority's message if any
    #[error("Magic link refused: {}", .0.as_deref().unwrap_or("no reason given"))]
    LinkRejected(Option<String>),

    /// Stored session no longer accepted by the authority
    #[error("Session not found or expired")]
    SessionInvalid,

    /// The identity changed while the request was in flight
    #[error("Identity changed while the request was in flight")]
    Superseded,

    /// Durable credential storage failed
    #[error("Credential storage error: {0}")]
    Storage(#[from] StorageError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Development-only entry point used without the bypass configured
    #[error("Development bypass is not enabled")]
    DevBypassDisabled,

    /// The session gate was shut down
    #[error("Session gate is shut down")]
    GateClosed,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidEmail(_) | AuthError::LinkRejected(_) => ErrorKind::BadRequest,
            AuthError::Network(_) => ErrorKind::ServiceUnavailable,
            AuthError::UnexpectedResponse(_) => ErrorKind::BadGateway,
            AuthError::InvalidCredential(_) | AuthError::SessionInvalid => ErrorKind::Unauthorized,
            AuthError::EntitlementRequired | AuthError::DevBypassDisabled => ErrorKind::Forbidden,
            AuthError::Superseded => ErrorKind::Conflict,
            AuthError::GateClosed => ErrorKind::ServiceUnavailable,
            AuthError::Storage(_) | AuthError::Config(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Message safe to show on the sign-in screen
    pub fn user_message(&self) -> String {
        match self {
            AuthError::InvalidEmail(_) => message::INVALID_EMAIL.to_string(),
            AuthError::Network(_) => message::NETWORK_ERROR.to_string(),
            AuthError::InvalidCredential(reason) => reason
                .clone()
                .unwrap_or_else(|| message::INVALID_LINK.to_string()),
            AuthError::EntitlementRequired => message::PAID_REQUIRED.to_string(),
            AuthError::LinkRejected(reason) => reason
                .clone()
                .unwrap_or_else(|| message::LINK_FAILED.to_string()),
            AuthError::UnexpectedResponse(_) | AuthError::SessionInvalid => {
                message::VERIFY_FAILED.to_string()
            }
            AuthError::Storage(_) => message::STORAGE_UNAVAILABLE.to_string(),
            _ => message::GENERIC.to_string(),
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.user_message())
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            AuthError::Storage(e) => {
                tracing::error!(error = %e, "Credential storage error");
            }
            AuthError::Config(msg) => {
                tracing::error!(message = %msg, "Auth configuration error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::Network(msg) => {
                tracing::warn!(error = %msg, retryable = self.kind().is_retryable(), "Authority unreachable");
            }
            AuthError::UnexpectedResponse(msg) => {
                tracing::warn!(error = %msg, retryable = self.kind().is_retryable(), "Unexpected authority response");
            }
            AuthError::InvalidCredential(_) => {
                tracing::warn!("Magic link token rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        err.log();
        let app = err.to_app_error();
        app.with_source(err)
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<HttpError> for AuthError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Transport(e) if e.is_builder() => AuthError::Internal(e.to_string()),
            HttpError::Transport(e) => AuthError::Network(e.to_string()),
            HttpError::InvalidUrl(e) => AuthError::Config(format!("invalid authority URL: {e}")),
            other => AuthError::UnexpectedResponse(other.to_string()),
        }
    }
}

impl From<EnvError> for AuthError {
    fn from(err: EnvError) -> Self {
        AuthError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_message_prefers_authority_text() {
        let err = AuthError::InvalidCredential(Some("Token already used".into()));
        assert_eq!(err.user_message(), "Token already used");

        let err = AuthError::InvalidCredential(None);
        assert_eq!(err.user_message(), message::INVALID_LINK);
    }

    #[test]
    fn test_link_message_falls_back() {
        assert_eq!(
            AuthError::LinkRejected(None).user_message(),
            message::LINK_FAILED
        );
        assert_eq!(
            AuthError::Network("refused".into()).user_message(),
            message::NETWORK_ERROR
        );
    }

    #[test]
    fn test_entitlement_is_distinct_from_invalid_credential() {
        assert_eq!(AuthError::EntitlementRequired.kind(), ErrorKind::Forbidden);
        assert_eq!(
            AuthError::InvalidCredential(None).kind(),
            ErrorKind::Unauthorized
        );
        assert_ne!(
            AuthError::EntitlementRequired.user_message(),
            AuthError::InvalidCredential(None).user_message()
        );
    }

    #[test]
    fn test_into_app_error_keeps_kind_and_message() {
        let app: AppError = AuthError::Network("timed out".into()).into();
        assert_eq!(app.kind(), ErrorKind::ServiceUnavailable);
        assert_eq!(app.message(), message::NETWORK_ERROR);
        assert!(app.kind().is_retryable());
    }

    #[test]
    fn test_env_error_is_config() {
        let err: AuthError = EnvError::InvalidBool {
            key: "AUTH_DEV_BYPASS".into(),
            value: "maybe".into(),
        }
        .into();
        assert!(matches!(err, AuthError::Config(_)));
    }
}
