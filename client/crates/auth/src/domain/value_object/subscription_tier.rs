use serde::{Deserialize, Serialize};
use std::fmt;

/// Entitlement tier, ordered: `None < Free < Paid`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    #[default]
    None,
    Free,
    Paid,
}

impl SubscriptionTier {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use SubscriptionTier::*;
        match self {
            None => "none",
            Free => "free",
            Paid => "paid",
        }
    }

    #[inline]
    pub const fn is_paid(&self) -> bool {
        matches!(self, SubscriptionTier::Paid)
    }

    /// True when this tier meets `required`
    #[inline]
    pub fn satisfies(&self, required: SubscriptionTier) -> bool {
        *self >= required
    }

    /// Parse a stored or wire code; unknown codes are `None` (not a tier).
    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use SubscriptionTier::*;
        match code.trim().to_ascii_lowercase().as_str() {
            "none" => Some(None),
            "free" => Some(Free),
            "paid" => Some(Paid),
            _ => Option::None,
        }
    }

    /// Tier from an authority answer carrying both a status string and a
    /// paid flag. The flag wins: a claimed `paid` status without it is `Free`.
    pub fn reconcile(reported: Option<&str>, is_paid: bool) -> Self {
        if is_paid {
            return SubscriptionTier::Paid;
        }
        match reported.and_then(Self::from_code) {
            Some(SubscriptionTier::Paid) => SubscriptionTier::Free,
            Some(tier) => tier,
            Option::None => SubscriptionTier::None,
        }
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_from_code() {
        assert_eq!(SubscriptionTier::from_code("paid"), Some(SubscriptionTier::Paid));
        assert_eq!(SubscriptionTier::from_code("FREE"), Some(SubscriptionTier::Free));
        assert_eq!(SubscriptionTier::from_code("none"), Some(SubscriptionTier::None));
        assert_eq!(SubscriptionTier::from_code("gold"), None);
    }

    #[test]
    fn test_tier_ordering() {
        assert!(SubscriptionTier::Paid.satisfies(SubscriptionTier::Free));
        assert!(SubscriptionTier::Free.satisfies(SubscriptionTier::Free));
        assert!(!SubscriptionTier::Free.satisfies(SubscriptionTier::Paid));
        assert!(SubscriptionTier::None.satisfies(SubscriptionTier::None));
    }

    #[test]
    fn test_reconcile_paid_flag_wins() {
        assert_eq!(SubscriptionTier::reconcile(None, true), SubscriptionTier::Paid);
        assert_eq!(
            SubscriptionTier::reconcile(Some("free"), true),
            SubscriptionTier::Paid
        );
        assert_eq!(
            SubscriptionTier::reconcile(Some("paid"), false),
            SubscriptionTier::Free
        );
        assert_eq!(
            SubscriptionTier::reconcile(Some("free"), false),
            SubscriptionTier::Free
        );
        assert_eq!(
            SubscriptionTier::reconcile(Some("???"), false),
            SubscriptionTier::None
        );
    }

    #[test]
    fn test_tier_display() {
        assert_eq!(SubscriptionTier::Paid.to_string(), "paid");
        assert_eq!(SubscriptionTier::None.to_string(), "none");
    }
}
