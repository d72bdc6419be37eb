//! Entity Module

pub mod authority;
pub mod identity;
pub mod session_record;
