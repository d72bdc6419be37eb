//! Presentation Layer
//!
//! The session gate state machine, the route guard and their view models.

pub mod gate;
pub mod guard;
pub mod view;

pub use gate::{GateState, GateSubscription, LinkPhase, SessionGate};
pub use guard::{Access, RouteAccess, RouteDecision, RouteGuard, RouteTable, evaluate};
pub use view::{AccessPrompt, GateView, Link, SignInView};
