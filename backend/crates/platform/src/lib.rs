//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations with no domain knowledge:
//! - Cryptographic helpers (constant-time comparison, random secrets)
//! - Client address resolution from proxy headers
//! - Password hashing (Argon2id)
//! - Per-client token-bucket rate limiting

pub mod client;
pub mod crypto;
pub mod password;
pub mod rate_limit;
