//! Check Session Use Case
//!
//! Revalidates a stored session with the authority. A session the authority
//! no longer vouches for (unknown, or no longer paid) is revoked; a network
//! failure leaves the store alone.

use std::sync::Arc;

use crate::application::context::IdentityContext;
use crate::domain::entity::identity::Identity;
use crate::domain::entity::session_record::SessionRecord;
use crate::domain::repository::AuthorityGateway;
use crate::domain::value_object::subscription_tier::SubscriptionTier;
use crate::error::{AuthError, AuthResult};

/// Check session use case
pub struct CheckSessionUseCase<G>
where
    G: AuthorityGateway,
{
    gateway: Arc<G>,
    context: IdentityContext,
}

impl<G> CheckSessionUseCase<G>
where
    G: AuthorityGateway,
{
    pub fn new(gateway: Arc<G>, context: IdentityContext) -> Self {
        Self { gateway, context }
    }

    /// Revalidate `stored` and adopt the refreshed identity.
    ///
    /// Errors: `SessionInvalid` when revoked (store cleared), `Network` when
    /// the authority is unreachable (store kept), `Superseded` when the
    /// identity changed meanwhile.
    pub async fn execute(&self, stored: SessionRecord) -> AuthResult<Identity> {
        let epoch = self.context.epoch();
        let check = self.gateway.check_session(stored.email()).await?;

        if !check.is_active() {
            tracing::info!(
                email = %stored.email(),
                success = check.success,
                is_paid = check.is_paid,
                "Stored session no longer valid"
            );
            self.context.revoke_if_current(epoch)?;
            return Err(AuthError::SessionInvalid);
        }

        let display_name = check
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(stored.identity.display_name);
        let tier = SubscriptionTier::reconcile(check.subscription_status.as_deref(), check.is_paid);
        let identity = Identity::new(stored.identity.email, display_name, tier);

        if !self
            .context
            .login_if_current(epoch, identity.clone(), stored.session_token)?
        {
            return Err(AuthError::Superseded);
        }

        Ok(identity)
    }
}
