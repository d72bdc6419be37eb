//! Verify Token Use Case
//!
//! Exchanges a magic-link token for a session. Only a paid subscriber is
//! signed in; a valid credential without a paid subscription persists nothing.

use std::sync::Arc;

use crate::application::context::IdentityContext;
use crate::domain::entity::identity::Identity;
use crate::domain::repository::AuthorityGateway;
use crate::domain::value_object::{email::Email, session_token::SessionToken};
use crate::error::{AuthError, AuthResult};

/// Verify token use case
pub struct VerifyTokenUseCase<G>
where
    G: AuthorityGateway,
{
    gateway: Arc<G>,
    context: IdentityContext,
}

impl<G> VerifyTokenUseCase<G>
where
    G: AuthorityGateway,
{
    pub fn new(gateway: Arc<G>, context: IdentityContext) -> Self {
        Self { gateway, context }
    }

    pub async fn execute(&self, token: &str) -> AuthResult<Identity> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::InvalidCredential(None));
        }

        let epoch = self.context.epoch();
        let answer = self.gateway.verify_token(token).await?;

        if !answer.success {
            return Err(AuthError::InvalidCredential(
                answer.error.filter(|e| !e.trim().is_empty()),
            ));
        }

        if !answer.is_paid {
            tracing::info!(email = ?answer.email, "Verified user has no paid subscription");
            return Err(AuthError::EntitlementRequired);
        }

        let session_token = answer
            .session_token
            .and_then(SessionToken::new)
            .ok_or_else(|| AuthError::UnexpectedResponse("verification without session_token".into()))?;
        let email = answer
            .email
            .ok_or_else(|| AuthError::UnexpectedResponse("verification without email".into()))
            .and_then(|e| {
                Email::new(e).map_err(|e| AuthError::UnexpectedResponse(e.to_string()))
            })?;

        let identity = Identity::paid(email, answer.name.unwrap_or_default());

        if !self
            .context
            .login_if_current(epoch, identity.clone(), session_token)?
        {
            return Err(AuthError::Superseded);
        }

        Ok(identity)
    }
}
