//! Persisted Session Record
//!
//! The durable shape of a session: token, email, tier and paid flag, plus the
//! display name. Only complete records can be built, so a partial record can
//! never be written.

use crate::domain::entity::identity::Identity;
use crate::domain::value_object::{
    email::Email, session_token::SessionToken, subscription_tier::SubscriptionTier,
};

/// Complete session record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub session_token: SessionToken,
    pub identity: Identity,
}

impl SessionRecord {
    pub fn new(session_token: SessionToken, identity: Identity) -> Self {
        Self {
            session_token,
            identity,
        }
    }

    pub fn email(&self) -> &Email {
        &self.identity.email
    }

    pub fn tier(&self) -> SubscriptionTier {
        self.identity.tier
    }

    pub fn is_paid(&self) -> bool {
        self.identity.is_paid()
    }
}
