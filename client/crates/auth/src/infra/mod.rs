//! Infrastructure Layer
//!
//! Remote authority client and durable credential storage.

pub mod http;
pub mod storage;

pub use http::HttpAuthorityGateway;
pub use storage::StorageCredentialStore;
