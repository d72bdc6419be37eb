//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{identity::Identity, session_record::SessionRecord};
pub use repository::{AuthorityGateway, CredentialStore};
pub use value_object::{
    email::Email, session_token::SessionToken, subscription_tier::SubscriptionTier,
};
