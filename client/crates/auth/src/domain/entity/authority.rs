//! Authority Answers
//!
//! What the remote authority reports for each call, as this client reads it.
//! Every field is optional on the wire; absent booleans read as `false`.

use serde::Deserialize;

/// `/auth/check` answer
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionCheck {
    pub success: bool,
    /// Absent on older authorities; only an explicit `false` counts
    pub authenticated: Option<bool>,
    #[serde(deserialize_with = "null_as_false")]
    pub is_paid: bool,
    pub subscription_status: Option<String>,
    pub name: Option<String>,
}

impl SessionCheck {
    /// The stored session may stay: the authority vouches for a paid user
    /// and has not disowned the session
    pub fn is_active(&self) -> bool {
        self.success && self.is_paid && self.authenticated != Some(false)
    }
}

/// `/auth/magic-link` answer
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LinkDispatch {
    pub success: bool,
    pub message: Option<String>,
    pub dev_token: Option<String>,
}

/// `/auth/verify-token` answer
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TokenVerification {
    pub success: bool,
    #[serde(deserialize_with = "null_as_false")]
    pub is_paid: bool,
    pub session_token: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub error: Option<String>,
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}
