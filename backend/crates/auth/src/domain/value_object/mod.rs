//! Value Object Module

pub mod email;
pub mod role;

pub use kernel::id::UserId;
