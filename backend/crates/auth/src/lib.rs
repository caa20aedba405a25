//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Claims, roles, users, repository traits
//! - `application/` - Token service and login use cases
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - HS256 session tokens carrying `{id, role[, exp]}`
//! - Token minting for the trusted auth provider and the execution fleet,
//!   each behind its own shared secret
//! - Email + password accounts (`basic-<email>`)
//! - Route guard middleware with role predicates
//!
//! ## Security Model
//! - Shared secrets compared in constant time
//! - Passwords hashed with Argon2id
//! - Roles ordered `standard < worker < admin`
//! - Tokens are long-lived unless a TTL is configured; no revocation list

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::token_service::TokenService;
pub use domain::{Claims, Role};
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgUserRepository;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::postgres::PgUserRepository as UserStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
