//! Environment Configuration Helpers
//!
//! Typed readers for environment variables. Unset variables are `Ok(None)`;
//! set-but-invalid variables are errors so misconfiguration is loud.

use std::time::Duration;

use thiserror::Error;

/// Environment variable parse error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvError {
    #[error("{key} must be a boolean (1/0, true/false, yes/no, on/off), got {value:?}")]
    InvalidBool { key: String, value: String },

    #[error("{key} must be a non-negative integer number of milliseconds, got {value:?}")]
    InvalidDuration { key: String, value: String },
}

/// Parse a boolean flag in the usual spellings.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a non-empty string variable (trimmed).
pub fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read a boolean variable.
pub fn env_bool(key: &str) -> Result<Option<bool>, EnvError> {
    match env_string(key) {
        None => Ok(None),
        Some(value) => parse_bool(&value)
            .map(Some)
            .ok_or(EnvError::InvalidBool {
                key: key.to_string(),
                value,
            }),
    }
}

/// Read a duration expressed in milliseconds.
pub fn env_duration_ms(key: &str) -> Result<Option<Duration>, EnvError> {
    match env_string(key) {
        None => Ok(None),
        Some(value) => value
            .parse::<u64>()
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|_| EnvError::InvalidDuration {
                key: key.to_string(),
                value,
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool(" TRUE "), Some(true));
        assert_eq!(parse_bool("on"), Some(true));
        assert_eq!(parse_bool("no"), Some(false));
        assert_eq!(parse_bool("Off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn test_unset_variables_are_none() {
        let key = "PLATFORM_TEST_SURELY_UNSET_VARIABLE";
        assert_eq!(env_string(key), None);
        assert_eq!(env_bool(key), Ok(None));
        assert_eq!(env_duration_ms(key), Ok(None));
    }
}
