//! Application Configuration
//!
//! Configuration for the Auth application layer, read from the environment
//! by the host binary.

use std::time::Duration;

use platform::config::{env_bool, env_duration_ms, env_string};
use platform::http::HttpConfig;
use url::Url;

use crate::domain::entity::identity::Identity;
use crate::domain::entity::session_record::SessionRecord;
use crate::domain::value_object::{email::Email, session_token::SessionToken};
use crate::error::{AuthError, AuthResult};

const DEFAULT_API_URL: &str = "http://localhost:5000";
const DEFAULT_UPSELL_URL: &str = "https://www.hollywoodsignal.com";
const DEFAULT_DEV_EMAIL: &str = "dev@fixed.example";
const DEFAULT_DEV_NAME: &str = "Development User";
const DEV_SESSION_TOKEN: &str = "dev-bypass-session";

/// Keys of the persisted session record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub session_token: String,
    pub email: String,
    pub subscription_tier: String,
    pub is_paid: String,
    pub display_name: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            session_token: "mandate_wizard_session".to_string(),
            email: "mandate_wizard_email".to_string(),
            subscription_tier: "subscription_status".to_string(),
            is_paid: "is_paid".to_string(),
            display_name: "user_name".to_string(),
        }
    }
}

impl StorageKeys {
    /// Every key, in record order
    pub fn all(&self) -> [&str; 5] {
        [
            self.session_token.as_str(),
            self.email.as_str(),
            self.subscription_tier.as_str(),
            self.is_paid.as_str(),
            self.display_name.as_str(),
        ]
    }
}

/// Development bypass: a fixed paid identity adopted without a credential
#[derive(Debug, Clone)]
pub struct DevBypass {
    pub email: Email,
    pub display_name: String,
    /// Placeholder stored in place of a real session token
    pub session_token: SessionToken,
    /// Wait before an inline development token is verified
    pub verify_delay: Duration,
}

impl DevBypass {
    pub fn new(email: Email, display_name: impl Into<String>) -> Self {
        Self {
            email,
            display_name: display_name.into(),
            session_token: SessionToken::new(DEV_SESSION_TOKEN)
                .expect("placeholder token is not blank"),
            verify_delay: Duration::from_secs(2),
        }
    }

    pub fn identity(&self) -> Identity {
        Identity::paid(self.email.clone(), self.display_name.clone())
    }

    pub fn record(&self) -> SessionRecord {
        SessionRecord::new(self.session_token.clone(), self.identity())
    }

    /// True when the stored email (if any) leaves room for the bypass
    pub fn applies_to(&self, stored_email: Option<&Email>) -> bool {
        stored_email.is_none_or(|email| *email == self.email)
    }

    fn from_env() -> AuthResult<Option<Self>> {
        if !env_bool("AUTH_DEV_BYPASS")?.unwrap_or(false) {
            return Ok(None);
        }

        if !cfg!(feature = "dev-bypass") {
            tracing::warn!("AUTH_DEV_BYPASS is set but the dev-bypass feature is not compiled in");
            return Ok(None);
        }

        let email = Email::new(env_string("AUTH_DEV_EMAIL").unwrap_or(DEFAULT_DEV_EMAIL.into()))
            .map_err(|e| AuthError::Config(format!("AUTH_DEV_EMAIL: {e}")))?;
        let name = env_string("AUTH_DEV_NAME").unwrap_or(DEFAULT_DEV_NAME.into());

        let mut bypass = Self::new(email, name);
        if let Some(delay) = env_duration_ms("AUTH_DEV_VERIFY_DELAY_MS")? {
            bypass.verify_delay = delay;
        }

        tracing::warn!(email = %bypass.email, "Development bypass enabled");
        Ok(Some(bypass))
    }
}

impl Default for DevBypass {
    fn default() -> Self {
        Self::new(
            Email::new(DEFAULT_DEV_EMAIL).expect("default development email is valid"),
            DEFAULT_DEV_NAME,
        )
    }
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Base URL of the remote authority
    pub api_base_url: Url,
    /// Per-request timeout
    pub request_timeout: Duration,
    pub storage_keys: StorageKeys,
    /// Where unpaid users are sent to upgrade
    pub upsell_url: Url,
    pub sign_in_path: String,
    pub home_path: String,
    /// Query parameter carrying a magic-link token
    pub token_param: String,
    /// Re-check a stored session with the authority at boot instead of
    /// trusting it as read
    pub revalidate_on_boot: bool,
    pub dev_bypass: Option<DevBypass>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            request_timeout: Duration::from_secs(10),
            storage_keys: StorageKeys::default(),
            upsell_url: Url::parse(DEFAULT_UPSELL_URL).expect("default upsell URL is valid"),
            sign_in_path: "/login".to_string(),
            home_path: "/".to_string(),
            token_param: "token".to_string(),
            revalidate_on_boot: true,
            dev_bypass: None,
        }
    }
}

impl AuthConfig {
    /// Create config for development (bypass on, regardless of features)
    pub fn development() -> Self {
        Self {
            dev_bypass: Some(DevBypass::default()),
            ..Default::default()
        }
    }

    /// Read `AUTH_*` variables over the defaults
    pub fn from_env() -> AuthResult<Self> {
        let mut config = Self::default();

        if let Some(raw) = env_string("AUTH_API_URL") {
            config.api_base_url = parse_url("AUTH_API_URL", &raw)?;
        }
        if let Some(timeout) = env_duration_ms("AUTH_REQUEST_TIMEOUT_MS")? {
            config.request_timeout = timeout;
        }
        if let Some(raw) = env_string("AUTH_UPSELL_URL") {
            config.upsell_url = parse_url("AUTH_UPSELL_URL", &raw)?;
        }
        if let Some(revalidate) = env_bool("AUTH_REVALIDATE_ON_BOOT")? {
            config.revalidate_on_boot = revalidate;
        }
        config.dev_bypass = DevBypass::from_env()?;

        Ok(config)
    }

    /// HTTP client settings for the authority gateway
    pub fn http_config(&self) -> HttpConfig {
        HttpConfig {
            timeout: self.request_timeout,
            ..HttpConfig::new(self.api_base_url.clone())
        }
    }

    pub fn dev_bypass_enabled(&self) -> bool {
        self.dev_bypass.is_some()
    }
}

fn parse_url(key: &str, raw: &str) -> AuthResult<Url> {
    Url::parse(raw).map_err(|e| AuthError::Config(format!("{key} must be an absolute URL: {e}")))
}
