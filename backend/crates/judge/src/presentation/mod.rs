//! Presentation Layer
//!
//! HTTP handlers, DTOs, router and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

// Re-exports
pub use handlers::JudgeAppState;
pub use middleware::rate_limit;
pub use router::{judge_router, judge_router_generic};
