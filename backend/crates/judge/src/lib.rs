//! Judge Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Submissions, verdicts, job descriptors, repository traits
//! - `application/` - Submission and scratch-run use cases, job dispatcher
//! - `infra/` - PostgreSQL, AMQP and the in-memory scratch result store
//! - `presentation/` - HTTP handlers, DTOs, router, rate limit middleware
//!
//! ## Features
//! - Graded submissions: `PENDING` until exactly one worker verdict lands
//! - Contest checks for event submissions
//! - Scratch runs whose results are delivered to a single poll
//! - Anonymous scratch runs behind a per-client token bucket
//!
//! ## Delivery
//! - Jobs go to one durable queue as persistent JSON messages
//! - A failed publish leaves a graded submission `PENDING`; scratch runs are
//!   discarded

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::{AmqpConfig, JudgeConfig, SUBMISSION_QUEUE};
pub use application::dispatcher::JobDispatcher;
pub use domain::{JobDescriptor, SubmissionStatus};
pub use error::{DispatchError, JudgeError, JudgeResult};
pub use infra::{AmqpPublisher, PgJudgeRepository, ScratchStore};
pub use presentation::router::judge_router;

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}
