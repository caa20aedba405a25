//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod create_submission;
pub mod dispatcher;
pub mod query_submissions;
pub mod scratch;
pub mod update_submission_status;

// Re-exports
pub use config::{AmqpConfig, JudgeConfig};
pub use create_submission::{CreateSubmissionInput, CreateSubmissionUseCase};
pub use dispatcher::JobDispatcher;
pub use query_submissions::QuerySubmissionsUseCase;
pub use scratch::{CreateScratchInput, ScratchUseCase};
pub use update_submission_status::{UpdateSubmissionStatusUseCase, VerdictInput};
