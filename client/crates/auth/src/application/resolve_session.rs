//! Session Resolver
//!
//! Runs once at boot and produces the one authoritative identity.
//!
//! Precedence:
//! 1. A `token` query parameter is verified first (explicit, fresher intent).
//!    It is stripped from the address bar before verification, whatever the
//!    outcome, so a refresh never re-verifies it.
//! 2. If that did not sign anyone in, the development bypass (when
//!    configured) adopts its fixed identity if the stored email is absent or
//!    is the development email.
//! 3. Otherwise a stored record is revalidated with the authority, or
//!    trusted as read when revalidation is off.
//! 4. Otherwise nobody is signed in.

use std::sync::Arc;

use platform::location::{AddressBar, take_query_param};

use crate::application::check_session::CheckSessionUseCase;
use crate::application::config::AuthConfig;
use crate::application::context::IdentityContext;
use crate::application::verify_token::VerifyTokenUseCase;
use crate::domain::entity::identity::Identity;
use crate::domain::repository::AuthorityGateway;
use crate::error::AuthError;

/// Result of boot-time resolution
#[derive(Debug)]
pub enum BootOutcome {
    Authenticated(Identity),
    /// Nobody signed in; `error` is the failure to show, if a
    /// user-initiated step (the URL token) failed
    Unauthenticated { error: Option<AuthError> },
}

impl BootOutcome {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            BootOutcome::Authenticated(identity) => Some(identity),
            BootOutcome::Unauthenticated { .. } => None,
        }
    }
}

/// Session resolver
pub struct SessionResolver<G>
where
    G: AuthorityGateway,
{
    context: IdentityContext,
    address_bar: Arc<dyn AddressBar>,
    config: Arc<AuthConfig>,
    check: CheckSessionUseCase<G>,
    verify: VerifyTokenUseCase<G>,
}

impl<G> SessionResolver<G>
where
    G: AuthorityGateway,
{
    pub fn new(
        gateway: Arc<G>,
        context: IdentityContext,
        address_bar: Arc<dyn AddressBar>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            check: CheckSessionUseCase::new(gateway.clone(), context.clone()),
            verify: VerifyTokenUseCase::new(gateway, context.clone()),
            context,
            address_bar,
            config,
        }
    }

    /// Consume the pending verification token from the address bar
    pub fn take_pending_token(&self) -> Option<String> {
        let token = take_query_param(&*self.address_bar, &self.config.token_param);
        if token.is_some() {
            tracing::debug!("Consumed verification token from URL");
        }
        token
    }

    /// Resolve the boot identity. `pending` is the token taken with
    /// [`Self::take_pending_token`].
    pub async fn resolve(&self, pending: Option<String>) -> BootOutcome {
        let mut token_error = None;

        if let Some(token) = pending {
            match self.verify.execute(&token).await {
                Ok(identity) => {
                    tracing::info!(email = %identity.email, outcome = "verified", "Boot resolved");
                    return BootOutcome::Authenticated(identity);
                }
                Err(e) => {
                    e.log();
                    token_error = Some(e);
                }
            }
        }

        match self.resolve_stored().await {
            Some(identity) => BootOutcome::Authenticated(identity),
            None => BootOutcome::Unauthenticated { error: token_error },
        }
    }

    async fn resolve_stored(&self) -> Option<Identity> {
        let epoch = self.context.epoch();
        let stored = match self.context.store().read() {
            Ok(stored) => stored,
            Err(e) => {
                e.log();
                None
            }
        };

        if let Some(bypass) = &self.config.dev_bypass {
            if bypass.applies_to(stored.as_ref().map(|r| r.email())) {
                return match self
                    .context
                    .login_if_current(epoch, bypass.identity(), bypass.session_token.clone())
                {
                    Ok(true) => {
                        tracing::warn!(email = %bypass.email, outcome = "dev_bypass", "Boot resolved");
                        Some(bypass.identity())
                    }
                    Ok(false) => self.context.current(),
                    Err(e) => {
                        e.log();
                        None
                    }
                };
            }
        }

        let stored = stored?;

        if !self.config.revalidate_on_boot {
            let identity = stored.identity.clone();
            if self.context.restore_if_current(epoch, stored) {
                tracing::info!(email = %identity.email, outcome = "trusted", "Boot resolved");
                return Some(identity);
            }
            return self.context.current();
        }

        match self.check.execute(stored).await {
            Ok(identity) => {
                tracing::info!(email = %identity.email, outcome = "revalidated", "Boot resolved");
                Some(identity)
            }
            Err(AuthError::Network(msg)) => {
                tracing::warn!(error = %msg, outcome = "unreachable", "Session check failed; staying signed out");
                None
            }
            Err(AuthError::Superseded) => self.context.current(),
            Err(e) => {
                e.log();
                None
            }
        }
    }
}
