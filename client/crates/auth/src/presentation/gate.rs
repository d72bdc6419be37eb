//! Global Session Gate
//!
//! Wraps the whole application: renders a neutral loading view until boot
//! resolution completes, then the sign-in flow or the application.
//!
//! ## States
//! ```text
//! CheckingSession ──boot──▶ Authenticated | Unauthenticated
//!        │ token in URL
//!        ▼
//!    Verifying ──▶ Authenticated | Unauthenticated(error)
//!
//! Unauthenticated: Idle ──request──▶ Sending ──▶ LinkSent | Idle(error)
//!                  LinkSent ──reset──▶ Idle
//! ```
//!
//! Failures never escape: every flow ends in a state carrying the message to
//! show. Identity itself lives in the [`IdentityContext`]; the gate only
//! tracks where the sign-in flow is, and `state()` reconciles the two.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use platform::location::AddressBar;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::application::config::AuthConfig;
use crate::application::context::IdentityContext;
use crate::application::request_magic_link::RequestMagicLinkUseCase;
use crate::application::resolve_session::{BootOutcome, SessionResolver};
use crate::application::sign_out::SignOutUseCase;
use crate::application::verify_token::VerifyTokenUseCase;
use crate::domain::entity::identity::Identity;
use crate::domain::repository::AuthorityGateway;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult, message};
use crate::presentation::view::{GateView, SignInView};

/// Where the magic-link request stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkPhase {
    Idle,
    Sending,
    LinkSent {
        email: Email,
        dev_token: Option<String>,
    },
}

/// Gate state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    CheckingSession,
    Verifying,
    Unauthenticated {
        phase: LinkPhase,
        error: Option<String>,
    },
    Authenticated(Identity),
}

impl GateState {
    pub fn signed_out(error: Option<String>) -> Self {
        GateState::Unauthenticated {
            phase: LinkPhase::Idle,
            error,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, GateState::CheckingSession | GateState::Verifying)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, GateState::Authenticated(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            GateState::Unauthenticated { error, .. } => error.as_deref(),
            _ => None,
        }
    }
}

/// Gate state as seen through the identity context: an identity adopted
/// or dropped elsewhere overrides the flow's own notion
fn reconcile(state: GateState, identity: Option<Identity>) -> GateState {
    match (state, identity) {
        (GateState::Authenticated(_), None) => GateState::signed_out(None),
        (GateState::Authenticated(_) | GateState::Unauthenticated { .. }, Some(identity)) => {
            GateState::Authenticated(identity)
        }
        (state, _) => state,
    }
}

/// Observer of the reconciled gate state.
///
/// Wakes on flow transitions and on identity changes made through any
/// handle of the shared context.
pub struct GateSubscription {
    flow: watch::Receiver<GateState>,
    identity: watch::Receiver<Option<Identity>>,
}

impl GateSubscription {
    /// Something changed since the last `borrow_and_update`
    pub fn has_changed(&self) -> bool {
        self.flow.has_changed().unwrap_or(false) || self.identity.has_changed().unwrap_or(false)
    }

    /// Wait for the next change. `false` once the gate is gone.
    pub async fn changed(&mut self) -> bool {
        tokio::select! {
            flow = self.flow.changed() => flow.is_ok(),
            identity = self.identity.changed() => identity.is_ok(),
        }
    }

    /// Current state, marking it seen
    pub fn borrow_and_update(&mut self) -> GateState {
        let flow = self.flow.borrow_and_update().clone();
        let identity = self.identity.borrow_and_update().clone();
        reconcile(flow, identity)
    }
}

/// Message for a failed verification
fn verify_failure_message(err: &AuthError) -> String {
    match err {
        AuthError::Network(_) => message::VERIFY_FAILED.to_string(),
        other => other.user_message(),
    }
}

/// Global session gate
pub struct SessionGate<G>
where
    G: AuthorityGateway,
{
    context: IdentityContext,
    config: Arc<AuthConfig>,
    resolver: SessionResolver<G>,
    request_link: RequestMagicLinkUseCase<G>,
    verify: VerifyTokenUseCase<G>,
    sign_out: SignOutUseCase<G>,
    state: watch::Sender<GateState>,
    closed: AtomicBool,
}

impl<G> SessionGate<G>
where
    G: AuthorityGateway + Send + Sync + 'static,
{
    pub fn new(
        gateway: Arc<G>,
        context: IdentityContext,
        address_bar: Arc<dyn AddressBar>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            resolver: SessionResolver::new(
                gateway.clone(),
                context.clone(),
                address_bar,
                config.clone(),
            ),
            request_link: RequestMagicLinkUseCase::new(gateway.clone(), config.clone()),
            verify: VerifyTokenUseCase::new(gateway.clone(), context.clone()),
            sign_out: SignOutUseCase::new(gateway, context.clone()),
            context,
            config,
            state: watch::Sender::new(GateState::CheckingSession),
            closed: AtomicBool::new(false),
        }
    }

    pub fn context(&self) -> &IdentityContext {
        &self.context
    }

    /// Current state, with identity taken from the context
    pub fn state(&self) -> GateState {
        let state = self.state.borrow().clone();
        reconcile(state, self.context.current())
    }

    /// Observe the reconciled state
    pub fn subscribe(&self) -> GateSubscription {
        GateSubscription {
            flow: self.state.subscribe(),
            identity: self.context.subscribe(),
        }
    }

    pub fn view(&self) -> GateView {
        match self.state() {
            GateState::CheckingSession | GateState::Verifying => GateView::Loading,
            GateState::Authenticated(identity) => GateView::App { identity },
            GateState::Unauthenticated { phase, error } => {
                let mut view = SignInView::new(&self.config.upsell_url);
                view.error = error;
                match phase {
                    LinkPhase::Idle => {}
                    LinkPhase::Sending => view.sending = true,
                    LinkPhase::LinkSent { email, .. } => view.link_sent_to = Some(email),
                }
                GateView::SignIn(view)
            }
        }
    }

    /// Resolve the session once at startup
    pub async fn boot(&self) -> GateState {
        let pending = self.resolver.take_pending_token();
        if pending.is_some() {
            self.transition(GateState::Verifying);
        }

        match self.resolver.resolve(pending).await {
            BootOutcome::Authenticated(identity) => {
                self.transition(GateState::Authenticated(identity))
            }
            BootOutcome::Unauthenticated { error } => {
                self.transition(GateState::signed_out(error.as_ref().map(verify_failure_message)))
            }
        }
    }

    /// Ask for a magic link. Only from the idle sign-in form.
    pub async fn request_magic_link(&self, email: &str) -> GateState {
        match self.state() {
            GateState::Unauthenticated {
                phase: LinkPhase::Idle,
                ..
            } => {}
            other => {
                tracing::debug!(state = ?other, "Ignoring magic link request");
                return other;
            }
        }

        self.transition(GateState::Unauthenticated {
            phase: LinkPhase::Sending,
            error: None,
        });

        match self.request_link.execute(email).await {
            Ok(sent) => self.transition(GateState::Unauthenticated {
                phase: LinkPhase::LinkSent {
                    email: sent.email,
                    dev_token: sent.dev_token,
                },
                error: None,
            }),
            Err(e) => {
                e.log();
                self.transition(GateState::signed_out(Some(e.user_message())))
            }
        }
    }

    /// Verify a magic-link token
    pub async fn verify_token(&self, token: &str) -> GateState {
        self.transition(GateState::Verifying);

        match self.verify.execute(token).await {
            Ok(identity) => self.transition(GateState::Authenticated(identity)),
            Err(AuthError::Superseded) => self.transition(GateState::signed_out(None)),
            Err(e) => {
                e.log();
                self.transition(GateState::signed_out(Some(verify_failure_message(&e))))
            }
        }
    }

    /// Verify the inline development token after the configured delay.
    ///
    /// Only available with the development bypass; a no-op when no
    /// development token is pending.
    pub async fn complete_dev_login(&self) -> AuthResult<GateState> {
        let bypass = self
            .config
            .dev_bypass
            .as_ref()
            .ok_or(AuthError::DevBypassDisabled)?;
        if self.closed.load(Ordering::Acquire) {
            return Err(AuthError::GateClosed);
        }

        let token = match self.state() {
            GateState::Unauthenticated {
                phase:
                    LinkPhase::LinkSent {
                        dev_token: Some(token),
                        ..
                    },
                ..
            } => token,
            other => {
                tracing::debug!(state = ?other, "No development token pending");
                return Ok(other);
            }
        };

        tracing::warn!("Auto-verifying with development token");
        tokio::time::sleep(bypass.verify_delay).await;

        if self.is_closed() {
            return Err(AuthError::GateClosed);
        }
        // The link may have been reset or replaced during the delay
        match self.state() {
            GateState::Unauthenticated {
                phase:
                    LinkPhase::LinkSent {
                        dev_token: Some(current),
                        ..
                    },
                ..
            } if current == token => Ok(self.verify_token(&token).await),
            other => {
                tracing::debug!(state = ?other, "Development token no longer pending");
                Ok(other)
            }
        }
    }

    /// Back from "link sent" to the empty form
    pub fn reset_link(&self) -> GateState {
        match self.state() {
            GateState::Unauthenticated {
                phase: LinkPhase::LinkSent { .. },
                ..
            } => self.transition(GateState::signed_out(None)),
            other => other,
        }
    }

    /// Sign out locally; the authority is notified in the background.
    ///
    /// Returns the handle of the detached remote call.
    pub fn logout(&self) -> JoinHandle<()> {
        let (local, remote) = self.sign_out.execute();
        if let Err(e) = local {
            e.log();
        }
        self.transition(GateState::signed_out(None));
        remote
    }

    /// The gate is going away: drop every later state update and every
    /// in-flight identity commit.
    pub fn shutdown(&self) {
        self.closed.store(true, Ordering::Release);
        self.context.supersede();
        tracing::debug!("Session gate shut down");
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn transition(&self, next: GateState) -> GateState {
        if self.is_closed() {
            tracing::debug!(state = ?next, "Gate closed; dropping state update");
            return self.state();
        }
        self.state.send_replace(next);
        self.state()
    }
}
