//! View Models
//!
//! Plain values describing what the shell renders: the gate's loading /
//! sign-in / application views and the route guard's prompts.

use serde::Serialize;
use url::Url;

use crate::domain::entity::identity::Identity;
use crate::domain::value_object::email::Email;
use crate::presentation::guard::RouteDecision;

/// A link with its label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub label: &'static str,
    pub href: String,
    /// Opens outside the application
    pub external: bool,
}

/// Sign-in screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignInView {
    pub title: &'static str,
    pub subtitle: &'static str,
    /// Request in flight; the form is disabled
    pub sending: bool,
    /// Set once the link went out; the form is replaced by a notice
    pub link_sent_to: Option<Email>,
    pub error: Option<String>,
    pub subscribe: Link,
}

/// What the global session gate renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum GateView {
    /// Neutral state while the session resolves; never the sign-in form
    Loading,
    SignIn(SignInView),
    App { identity: Identity },
}

impl SignInView {
    pub fn new(upsell_url: &Url) -> Self {
        Self {
            title: "Mandate Wizard",
            subtitle: "Strategic Intelligence for Hollywood Signal Subscribers",
            sending: false,
            link_sent_to: None,
            error: None,
            subscribe: Link {
                label: "Subscribe to Hollywood Signal",
                href: upsell_url.to_string(),
                external: true,
            },
        }
    }

    pub fn notice(&self) -> Option<String> {
        self.link_sent_to
            .as_ref()
            .map(|email| format!("We've sent a magic link to {email}"))
    }
}

/// Prompt shown instead of a guarded route
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessPrompt {
    pub title: &'static str,
    pub message: &'static str,
    pub primary: Link,
    pub secondary: Option<Link>,
}

impl RouteDecision {
    /// Prompt replacing the route content, if any
    pub fn prompt(&self) -> Option<AccessPrompt> {
        match self {
            RouteDecision::Render => None,
            RouteDecision::AuthenticationRequired { sign_in_path } => Some(AccessPrompt {
                title: "Authentication Required",
                message: "Please sign in with your Hollywood Signal subscription to access Mandate Wizard.",
                primary: Link {
                    label: "Sign In",
                    href: sign_in_path.clone(),
                    external: false,
                },
                secondary: None,
            }),
            RouteDecision::UpgradeRequired {
                upsell_url,
                back_path,
            } => Some(AccessPrompt {
                title: "Paid Subscription Required",
                message: "This feature requires a paid Hollywood Signal subscription. You currently have a free membership.",
                primary: Link {
                    label: "Upgrade to Paid Subscription",
                    href: upsell_url.to_string(),
                    external: true,
                },
                secondary: Some(Link {
                    label: "Back to Home",
                    href: back_path.clone(),
                    external: false,
                }),
            }),
            RouteDecision::NotFound => Some(AccessPrompt {
                title: "Page Not Found",
                message: "The page you are looking for does not exist.",
                primary: Link {
                    label: "Back to Home",
                    href: "/".to_string(),
                    external: false,
                },
                secondary: None,
            }),
        }
    }
}
