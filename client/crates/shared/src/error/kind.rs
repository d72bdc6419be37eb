//! Error Kind - Classification of errors
//!
//! Defines the [`ErrorKind`] enum. The remote authority is reached over HTTP,
//! so failures are classified the way the authority (or the transport in
//! front of it) would report them.

/// Error classification.
///
/// Each variant maps to an RFC 9110 status code. Transport failures that
/// never produced a response are reported as gateway-side kinds
/// (`BadGateway`, `ServiceUnavailable`, `GatewayTimeout`).
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::Unauthorized;
/// assert_eq!(ErrorKind::from_status(401), Some(kind));
/// assert_eq!(kind.as_str(), "Unauthorized");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// 400 - Bad Request: the input was rejected before reaching the authority
    BadRequest,
    /// 401 - Unauthorized: no valid credential
    Unauthorized,
    /// 403 - Forbidden: valid credential, missing entitlement
    Forbidden,
    /// 404 - Not Found
    NotFound,
    /// 408 - Request Timeout
    RequestTimeout,
    /// 409 - Conflict
    Conflict,
    /// 422 - Unprocessable Entity
    UnprocessableEntity,
    /// 429 - Too Many Requests
    TooManyRequests,
    /// 500 - Internal Error
    InternalServerError,
    /// 502 - Bad Gateway: the authority answered with something unusable
    BadGateway,
    /// 503 - Service Unavailable: the authority could not be reached
    ServiceUnavailable,
    /// 504 - Gateway Timeout: the authority did not answer in time
    GatewayTimeout,
}

impl ErrorKind {
    /// Classify a status code reported by the authority.
    ///
    /// Returns `None` for non-error codes. Unknown 4xx codes fold into
    /// `BadRequest`, unknown 5xx codes into `InternalServerError`.
    pub const fn from_status(status: u16) -> Option<Self> {
        let kind = match status {
            400 => ErrorKind::BadRequest,
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            408 => ErrorKind::RequestTimeout,
            409 => ErrorKind::Conflict,
            422 => ErrorKind::UnprocessableEntity,
            429 => ErrorKind::TooManyRequests,
            502 => ErrorKind::BadGateway,
            503 => ErrorKind::ServiceUnavailable,
            504 => ErrorKind::GatewayTimeout,
            400..=499 => ErrorKind::BadRequest,
            500..=599 => ErrorKind::InternalServerError,
            _ => return None,
        };
        Some(kind)
    }

    /// Standard reason phrase.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad Request",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::RequestTimeout => "Request Timeout",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::UnprocessableEntity => "Unprocessable Entity",
            ErrorKind::TooManyRequests => "Too Many Requests",
            ErrorKind::InternalServerError => "Internal Server Error",
            ErrorKind::BadGateway => "Bad Gateway",
            ErrorKind::ServiceUnavailable => "Service Unavailable",
            ErrorKind::GatewayTimeout => "Gateway Timeout",
        }
    }

    /// Whether repeating the same request later may succeed.
    ///
    /// Logged alongside authority failures.
    #[inline]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::RequestTimeout
                | ErrorKind::TooManyRequests
                | ErrorKind::BadGateway
                | ErrorKind::ServiceUnavailable
                | ErrorKind::GatewayTimeout
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert_eq!(ErrorKind::from_status(200), None);
        assert_eq!(ErrorKind::from_status(302), None);
        assert_eq!(ErrorKind::from_status(401), Some(ErrorKind::Unauthorized));
        assert_eq!(ErrorKind::from_status(418), Some(ErrorKind::BadRequest));
        assert_eq!(ErrorKind::from_status(503), Some(ErrorKind::ServiceUnavailable));
        assert_eq!(ErrorKind::from_status(599), Some(ErrorKind::InternalServerError));
    }

    #[test]
    fn test_is_retryable() {
        assert!(ErrorKind::ServiceUnavailable.is_retryable());
        assert!(ErrorKind::GatewayTimeout.is_retryable());
        assert!(!ErrorKind::Unauthorized.is_retryable());
        assert!(!ErrorKind::Forbidden.is_retryable());
    }
}
