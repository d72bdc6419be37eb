//! Sign Out Use Case
//!
//! Local-first: the session is gone locally before the authority hears
//! about it, and the authority's answer does not matter.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::application::context::IdentityContext;
use crate::domain::repository::AuthorityGateway;
use crate::error::AuthResult;

/// Sign out use case
pub struct SignOutUseCase<G>
where
    G: AuthorityGateway,
{
    gateway: Arc<G>,
    context: IdentityContext,
}

impl<G> SignOutUseCase<G>
where
    G: AuthorityGateway + Send + Sync + 'static,
{
    pub fn new(gateway: Arc<G>, context: IdentityContext) -> Self {
        Self { gateway, context }
    }

    /// Clear the local session, then notify the authority in the background.
    ///
    /// The remote call is detached; the handle is returned for callers that
    /// want to wait for it (tests, process shutdown). A local store failure
    /// is returned after the remote call has been started.
    pub fn execute(&self) -> (AuthResult<()>, JoinHandle<()>) {
        let local = self.context.logout();

        let gateway = self.gateway.clone();
        let remote = tokio::spawn(async move {
            if let Err(e) = gateway.logout().await {
                tracing::warn!(error = %e, "Remote logout failed (ignored)");
            }
        });

        (local, remote)
    }
}
