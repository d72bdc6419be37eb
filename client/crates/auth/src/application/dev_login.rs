//! Development Login Use Case
//!
//! Adopts the configured development identity on demand (the `/dev-login`
//! route). Refuses unless the development bypass is configured.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::context::IdentityContext;
use crate::domain::entity::identity::Identity;
use crate::error::{AuthError, AuthResult};

/// Development login use case
pub struct DevLoginUseCase {
    context: IdentityContext,
    config: Arc<AuthConfig>,
}

impl DevLoginUseCase {
    pub fn new(context: IdentityContext, config: Arc<AuthConfig>) -> Self {
        Self { context, config }
    }

    pub fn execute(&self) -> AuthResult<Identity> {
        let bypass = self
            .config
            .dev_bypass
            .as_ref()
            .ok_or(AuthError::DevBypassDisabled)?;

        let identity = bypass.identity();
        self.context
            .login(identity.clone(), bypass.session_token.clone())?;

        tracing::warn!(email = %identity.email, "Signed in with development identity");
        Ok(identity)
    }
}
