//! Identity Entity
//!
//! The resolved principal. Held only by the identity context; created by a
//! successful verification or session reconciliation, destroyed on logout
//! or revocation.

use serde::Serialize;

use crate::domain::value_object::{email::Email, subscription_tier::SubscriptionTier};

/// Resolved principal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub email: Email,
    /// May be empty when the authority knows no name
    pub display_name: String,
    pub tier: SubscriptionTier,
}

impl Identity {
    pub fn new(email: Email, display_name: impl Into<String>, tier: SubscriptionTier) -> Self {
        Self {
            email,
            display_name: display_name.into(),
            tier,
        }
    }

    /// Paid identity (verification only admits paid subscribers)
    pub fn paid(email: Email, display_name: impl Into<String>) -> Self {
        Self::new(email, display_name, SubscriptionTier::Paid)
    }

    /// Derived from the tier, so the two can never disagree
    #[inline]
    pub fn is_paid(&self) -> bool {
        self.tier.is_paid()
    }

    /// Display name, or `None` when empty
    pub fn name(&self) -> Option<&str> {
        Some(self.display_name.as_str()).filter(|n| !n.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_paid_follows_tier() {
        let email = Email::new("a@x.com").unwrap();
        assert!(Identity::paid(email.clone(), "A").is_paid());
        assert!(!Identity::new(email.clone(), "A", SubscriptionTier::Free).is_paid());
        assert!(!Identity::new(email, "A", SubscriptionTier::None).is_paid());
    }

    #[test]
    fn test_blank_name_is_none() {
        let email = Email::new("a@x.com").unwrap();
        assert_eq!(Identity::paid(email.clone(), " ").name(), None);
        assert_eq!(Identity::paid(email, "A").name(), Some("A"));
    }
}
