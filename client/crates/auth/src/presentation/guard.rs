//! Route Entitlement Guard
//!
//! Per-navigation check of a route's required tier against the identity
//! context. Pure: no side effects, no network.

use url::Url;

use crate::application::config::AuthConfig;
use crate::application::context::IdentityContext;
use crate::domain::entity::identity::Identity;
use crate::domain::value_object::subscription_tier::SubscriptionTier;

/// Bare access decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    SignInRequired,
    UpgradeRequired,
    Granted,
}

/// Decide access to a protected route.
///
/// Unauthenticated always means sign-in; a `Paid` requirement also needs
/// `is_paid`; anything else is granted.
pub fn evaluate(is_authenticated: bool, is_paid: bool, required: SubscriptionTier) -> Access {
    if !is_authenticated {
        return Access::SignInRequired;
    }
    if required.is_paid() && !is_paid {
        return Access::UpgradeRequired;
    }
    Access::Granted
}

/// What to render for a navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the route's own content
    Render,
    AuthenticationRequired {
        sign_in_path: String,
    },
    UpgradeRequired {
        upsell_url: Url,
        back_path: String,
    },
    /// No such route
    NotFound,
}

/// Guard with the links its prompts need
#[derive(Debug, Clone)]
pub struct RouteGuard {
    sign_in_path: String,
    home_path: String,
    upsell_url: Url,
}

impl RouteGuard {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            sign_in_path: config.sign_in_path.clone(),
            home_path: config.home_path.clone(),
            upsell_url: config.upsell_url.clone(),
        }
    }

    pub fn decide_for(&self, identity: Option<&Identity>, required: SubscriptionTier) -> RouteDecision {
        let access = evaluate(
            identity.is_some(),
            identity.is_some_and(Identity::is_paid),
            required,
        );
        match access {
            Access::Granted => RouteDecision::Render,
            Access::SignInRequired => RouteDecision::AuthenticationRequired {
                sign_in_path: self.sign_in_path.clone(),
            },
            Access::UpgradeRequired => RouteDecision::UpgradeRequired {
                upsell_url: self.upsell_url.clone(),
                back_path: self.home_path.clone(),
            },
        }
    }

    pub fn decide(&self, context: &IdentityContext, required: SubscriptionTier) -> RouteDecision {
        self.decide_for(context.current().as_ref(), required)
    }
}

/// How a route is protected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    Protected(SubscriptionTier),
}

/// Known application routes
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<(String, RouteAccess)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// The application's routes: home needs a signed-in user, dashboard and
    /// query need a paid one, sign-in pages are public.
    pub fn standard(config: &AuthConfig) -> Self {
        Self::new()
            .route(&config.home_path, RouteAccess::Protected(SubscriptionTier::Free))
            .route("/dashboard", RouteAccess::Protected(SubscriptionTier::Paid))
            .route("/query", RouteAccess::Protected(SubscriptionTier::Paid))
            .route(&config.sign_in_path, RouteAccess::Public)
            .route("/dev-login", RouteAccess::Public)
    }

    pub fn route(mut self, path: &str, access: RouteAccess) -> Self {
        self.routes.push((normalize(path).to_string(), access));
        self
    }

    /// Access rule for a path; `None` when unknown
    pub fn access(&self, path: &str) -> Option<RouteAccess> {
        let path = normalize(path);
        self.routes
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, access)| *access)
    }

    pub fn resolve(&self, guard: &RouteGuard, identity: Option<&Identity>, path: &str) -> RouteDecision {
        match self.access(path) {
            None => RouteDecision::NotFound,
            Some(RouteAccess::Public) => RouteDecision::Render,
            Some(RouteAccess::Protected(required)) => guard.decide_for(identity, required),
        }
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard(&AuthConfig::default())
    }
}

/// Path without query, fragment or trailing slash (`/` stays `/`)
fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::email::Email;

    const TIERS: [SubscriptionTier; 3] = [
        SubscriptionTier::None,
        SubscriptionTier::Free,
        SubscriptionTier::Paid,
    ];

    #[test]
    fn test_unauthenticated_always_needs_sign_in() {
        for required in TIERS {
            for is_paid in [false, true] {
                assert_eq!(evaluate(false, is_paid, required), Access::SignInRequired);
            }
        }
    }

    #[test]
    fn test_paid_route() {
        assert_eq!(evaluate(true, false, SubscriptionTier::Paid), Access::UpgradeRequired);
        assert_eq!(evaluate(true, true, SubscriptionTier::Paid), Access::Granted);
    }

    #[test]
    fn test_free_route_only_needs_authentication() {
        assert_eq!(evaluate(true, false, SubscriptionTier::Free), Access::Granted);
        assert_eq!(evaluate(true, false, SubscriptionTier::None), Access::Granted);
    }

    #[test]
    fn test_guard_decisions_carry_links() {
        let guard = RouteGuard::new(&AuthConfig::default());
        let free = Identity::new(Email::new("a@x.com").unwrap(), "A", SubscriptionTier::Free);

        assert_eq!(
            guard.decide_for(None, SubscriptionTier::Free),
            RouteDecision::AuthenticationRequired {
                sign_in_path: "/login".into()
            }
        );
        match guard.decide_for(Some(&free), SubscriptionTier::Paid) {
            RouteDecision::UpgradeRequired {
                upsell_url,
                back_path,
            } => {
                assert_eq!(upsell_url.as_str(), "https://www.hollywoodsignal.com/");
                assert_eq!(back_path, "/");
            }
            other => panic!("expected upgrade prompt, got {other:?}"),
        }
    }

    #[test]
    fn test_route_table() {
        let table = RouteTable::default();
        let guard = RouteGuard::new(&AuthConfig::default());
        let paid = Identity::paid(Email::new("a@x.com").unwrap(), "A");

        assert_eq!(table.access("/login"), Some(RouteAccess::Public));
        assert_eq!(
            table.access("/dashboard/"),
            Some(RouteAccess::Protected(SubscriptionTier::Paid))
        );
        assert_eq!(
            table.access("/?tab=1"),
            Some(RouteAccess::Protected(SubscriptionTier::Free))
        );
        assert_eq!(table.resolve(&guard, None, "/nowhere"), RouteDecision::NotFound);
        assert_eq!(table.resolve(&guard, None, "/dev-login"), RouteDecision::Render);
        assert_eq!(table.resolve(&guard, Some(&paid), "/query"), RouteDecision::Render);
    }
}
