//! Repository Traits
//!
//! Interfaces for durable session state and the remote authority.
//! Implementations are in the infrastructure layer.

use crate::domain::entity::authority::{LinkDispatch, SessionCheck, TokenVerification};
use crate::domain::entity::session_record::SessionRecord;
use crate::domain::value_object::email::Email;
use crate::error::AuthResult;

/// Durable session record storage.
///
/// `write` and `clear` touch every key of the record in one atomic step; a
/// concurrent `read` sees the old record or the new one, never a mix.
pub trait CredentialStore: Send + Sync {
    /// Complete record, or `None` when absent or malformed
    fn read(&self) -> AuthResult<Option<SessionRecord>>;

    /// Replace the record
    fn write(&self, record: &SessionRecord) -> AuthResult<()>;

    /// Remove every key of the record
    fn clear(&self) -> AuthResult<()>;
}

/// Remote authority trait
#[trait_variant::make(AuthorityGateway: Send)]
pub trait LocalAuthorityGateway {
    /// Ask whether the email still holds a valid (paid) session
    async fn check_session(&self, email: &Email) -> AuthResult<SessionCheck>;

    /// Ask the authority to email a magic link
    async fn request_magic_link(&self, email: &Email) -> AuthResult<LinkDispatch>;

    /// Exchange a magic-link token for a session
    async fn verify_token(&self, token: &str) -> AuthResult<TokenVerification>;

    /// Tell the authority the session ended
    async fn logout(&self) -> AuthResult<()>;
}
