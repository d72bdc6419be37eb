//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" shared by every client crate:
//! - The unified error type and result alias
//! - Error classification by HTTP semantics (the remote authority speaks HTTP)
//! - Conversions from transport and serialization errors
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all crates.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
