//! Identity Context
//!
//! The single process-wide holder of "who is signed in". Every flow reads
//! and writes identity through it; the credential store is only touched here.
//!
//! ## Session epochs
//! Each identity transition (login, logout, revoke) advances an epoch. A flow
//! captures the epoch before its network call and commits with the
//! `*_if_current` methods; if anything else changed the identity meanwhile,
//! the commit is dropped. So a verification resolving after logout cannot
//! re-populate the store. The epoch check, the store write and the in-memory
//! update happen under one lock.

use std::sync::Arc;

use parking_lot::Mutex;
use reqwest::header::{HeaderName, HeaderValue};
use tokio::sync::watch;

use crate::domain::entity::identity::Identity;
use crate::domain::entity::session_record::SessionRecord;
use crate::domain::repository::CredentialStore;
use crate::domain::value_object::session_token::SessionToken;
use crate::error::AuthResult;

/// Header downstream API calls use to identify the user
pub const IDENTITY_HEADER: &str = "x-user-email";

/// Identity generation marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Epoch(u64);

struct Shared {
    store: Arc<dyn CredentialStore>,
    epoch: Mutex<u64>,
    identity: watch::Sender<Option<Identity>>,
}

/// Process-wide identity holder (cheap to clone)
#[derive(Clone)]
pub struct IdentityContext {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for IdentityContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityContext")
            .field("epoch", &*self.shared.epoch.lock())
            .field("identity", &*self.shared.identity.borrow())
            .finish()
    }
}

impl IdentityContext {
    /// Empty context over a credential store. Nothing is read until a
    /// resolver restores or logs in an identity.
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            shared: Arc::new(Shared {
                store,
                epoch: Mutex::new(0),
                identity: watch::Sender::new(None),
            }),
        }
    }

    /// The store this context persists to
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.shared.store
    }

    /// Capture the current epoch before starting a flow
    pub fn epoch(&self) -> Epoch {
        Epoch(*self.shared.epoch.lock())
    }

    pub fn is_authenticated(&self) -> bool {
        self.shared.identity.borrow().is_some()
    }

    pub fn current(&self) -> Option<Identity> {
        self.shared.identity.borrow().clone()
    }

    /// Observe every identity change
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.shared.identity.subscribe()
    }

    /// Adopt an identity and persist it, unconditionally.
    pub fn login(&self, identity: Identity, session_token: SessionToken) -> AuthResult<()> {
        let mut epoch = self.shared.epoch.lock();
        self.commit_login(&mut epoch, identity, session_token)
    }

    /// Adopt an identity only if nothing changed since `since`.
    ///
    /// Returns `false` (and writes nothing) when the commit is stale.
    pub fn login_if_current(
        &self,
        since: Epoch,
        identity: Identity,
        session_token: SessionToken,
    ) -> AuthResult<bool> {
        let mut epoch = self.shared.epoch.lock();
        if *epoch != since.0 {
            tracing::debug!(epoch = *epoch, since = since.0, "Dropping stale login");
            return Ok(false);
        }
        self.commit_login(&mut epoch, identity, session_token)?;
        Ok(true)
    }

    /// Adopt a stored record in memory without re-verifying or rewriting it
    /// (trust-on-read).
    pub fn restore_if_current(&self, since: Epoch, record: SessionRecord) -> bool {
        let mut epoch = self.shared.epoch.lock();
        if *epoch != since.0 {
            tracing::debug!(epoch = *epoch, since = since.0, "Dropping stale restore");
            return false;
        }
        *epoch += 1;
        tracing::info!(email = %record.email(), epoch = *epoch, "Session restored");
        self.shared.identity.send_replace(Some(record.identity));
        true
    }

    /// Drop the session because the authority no longer accepts it, unless
    /// something changed since `since`.
    pub fn revoke_if_current(&self, since: Epoch) -> AuthResult<bool> {
        let mut epoch = self.shared.epoch.lock();
        if *epoch != since.0 {
            tracing::debug!(epoch = *epoch, since = since.0, "Dropping stale revoke");
            return Ok(false);
        }
        *epoch += 1;
        self.shared.identity.send_replace(None);
        self.shared.store.clear()?;
        tracing::info!(epoch = *epoch, outcome = "revoked", "Session revoked");
        Ok(true)
    }

    /// Sign out locally. The in-memory identity is cleared even if the store
    /// fails; the store error is still returned.
    pub fn logout(&self) -> AuthResult<()> {
        let mut epoch = self.shared.epoch.lock();
        *epoch += 1;
        let previous = self.shared.identity.send_replace(None);
        let cleared = self.shared.store.clear();

        match &previous {
            Some(identity) => {
                tracing::info!(email = %identity.email, epoch = *epoch, "User signed out")
            }
            None => tracing::debug!(epoch = *epoch, "Logout without identity"),
        }
        cleared
    }

    /// Invalidate every in-flight flow without changing the identity
    pub fn supersede(&self) {
        let mut epoch = self.shared.epoch.lock();
        *epoch += 1;
    }

    /// `X-User-Email` header for the current identity
    pub fn identity_header(&self) -> Option<(HeaderName, HeaderValue)> {
        let identity = self.current()?;
        let value = HeaderValue::from_str(identity.email.as_str()).ok()?;
        Some((HeaderName::from_static(IDENTITY_HEADER), value))
    }

    /// Attach the identity header to a downstream request, when signed in
    pub fn attach_identity(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.identity_header() {
            Some((name, value)) => request.header(name, value),
            None => request,
        }
    }

    fn commit_login(
        &self,
        epoch: &mut u64,
        identity: Identity,
        session_token: SessionToken,
    ) -> AuthResult<()> {
        let record = SessionRecord::new(session_token, identity);
        self.shared.store.write(&record)?;
        *epoch += 1;
        tracing::info!(
            email = %record.email(),
            tier = %record.tier(),
            epoch = *epoch,
            "User signed in"
        );
        self.shared.identity.send_replace(Some(record.identity));
        Ok(())
    }
}
