//! Auth (Authentication and Entitlement) Client Module
//!
//! Clean Architecture structure:
//! - `domain/` - Identity, session record, tiers, repository traits
//! - `application/` - Use cases, identity context, boot-time resolver
//! - `infra/` - HTTP authority gateway, key/value credential store
//! - `presentation/` - Session gate, route guard, view models
//!
//! ## Features
//! - Passwordless sign-in with magic links verified by a remote authority
//! - Durable session record, revalidated (or trusted) at boot
//! - One identity context shared by every screen
//! - Per-route entitlement checks (signed in, or paid)
//!
//! ## Development bypass
//! Compiled in with the `dev-bypass` feature and switched on with
//! `AUTH_DEV_BYPASS=1`. Never active otherwise.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::context::IdentityContext;
pub use error::{AuthError, AuthResult};
pub use infra::{HttpAuthorityGateway, StorageCredentialStore};
pub use presentation::gate::SessionGate;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::authority::*;
    pub use crate::domain::entity::identity::*;
    pub use crate::domain::entity::session_record::*;
    pub use crate::domain::value_object::email::*;
    pub use crate::domain::value_object::session_token::*;
    pub use crate::domain::value_object::subscription_tier::*;
}

pub mod guard {
    pub use crate::presentation::guard::*;
}
