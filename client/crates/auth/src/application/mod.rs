//! Application Layer
//!
//! Use cases, the identity context and the boot-time session resolver.

pub mod check_session;
pub mod config;
pub mod context;
pub mod dev_login;
pub mod request_magic_link;
pub mod resolve_session;
pub mod sign_out;
pub mod verify_token;

// Re-exports
pub use check_session::CheckSessionUseCase;
pub use config::{AuthConfig, DevBypass, StorageKeys};
pub use context::{Epoch, IdentityContext};
pub use dev_login::DevLoginUseCase;
pub use request_magic_link::{LinkSent, RequestMagicLinkUseCase};
pub use resolve_session::{BootOutcome, SessionResolver};
pub use sign_out::SignOutUseCase;
pub use verify_token::VerifyTokenUseCase;
