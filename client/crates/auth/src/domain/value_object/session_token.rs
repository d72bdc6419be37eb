//! Session Token Value Object
//!
//! Opaque credential issued by the authority. Never logged.

use std::fmt;

/// Opaque session credential
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a non-blank token
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return None;
        }
        Some(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_token_rejected() {
        assert!(SessionToken::new("").is_none());
        assert!(SessionToken::new("  ").is_none());
        assert_eq!(SessionToken::new("s1").unwrap().as_str(), "s1");
    }

    #[test]
    fn test_debug_is_redacted() {
        let token = SessionToken::new("secret-value").unwrap();
        assert!(!format!("{token:?}").contains("secret-value"));
    }
}
