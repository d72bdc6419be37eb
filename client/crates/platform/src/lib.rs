//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations for the client:
//! - Environment-driven configuration helpers
//! - Durable key/value storage (in-memory and file-backed)
//! - JSON-over-HTTP calls to the remote authority
//! - Address-bar (current URL) access and query parameter handling

pub mod config;
pub mod http;
pub mod location;
pub mod storage;
