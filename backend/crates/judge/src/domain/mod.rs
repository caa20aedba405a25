//! Domain Layer
//!
//! Contains entities, value objects, domain services, and repository traits.

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;

// Re-exports
pub use entities::{Event, NewSubmission, Submission, Verdict};
pub use repository::{CatalogRepository, JobPublisher, SubmissionRepository};
pub use value_objects::{JobDescriptor, SubmissionStatus};
