//! Request Magic Link Use Case
//!
//! Asks the authority to email a one-time sign-in link.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::AuthorityGateway;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Link dispatch acknowledged by the authority
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSent {
    pub email: Email,
    /// Inline token for immediate self-verification; only kept when the
    /// development bypass is configured
    pub dev_token: Option<String>,
}

/// Request magic link use case
pub struct RequestMagicLinkUseCase<G>
where
    G: AuthorityGateway,
{
    gateway: Arc<G>,
    config: Arc<AuthConfig>,
}

impl<G> RequestMagicLinkUseCase<G>
where
    G: AuthorityGateway,
{
    pub fn new(gateway: Arc<G>, config: Arc<AuthConfig>) -> Self {
        Self { gateway, config }
    }

    pub async fn execute(&self, email: &str) -> AuthResult<LinkSent> {
        let email = Email::new(email)?;
        let dispatch = self.gateway.request_magic_link(&email).await?;

        if !dispatch.success {
            return Err(AuthError::LinkRejected(
                dispatch.message.filter(|m| !m.trim().is_empty()),
            ));
        }

        let dev_token = match dispatch.dev_token.filter(|t| !t.trim().is_empty()) {
            Some(token) if self.config.dev_bypass_enabled() => Some(token),
            Some(_) => {
                tracing::warn!("Ignoring inline development token: bypass not enabled");
                None
            }
            None => None,
        };

        tracing::info!(email = %email, "Magic link sent");
        Ok(LinkSent { email, dev_token })
    }
}
