//! Repository Traits
//!
//! Interfaces for data persistence and job publishing. Implementations are
//! in the infrastructure layer.

use crate::domain::entities::{
    Event, EventProblem, Language, NewSubmission, Problem, Submission, TestCase, Verdict,
};
use crate::domain::value_objects::{
    EventId, JobDescriptor, LanguageId, ProblemId, SubmissionId, TestCaseId, UserId,
};
use crate::error::{DispatchError, JudgeResult};

/// Submission repository trait
#[trait_variant::make(SubmissionRepository: Send)]
pub trait LocalSubmissionRepository {
    /// Insert a `PENDING` submission, assigning id and submit time
    async fn create(&self, submission: &NewSubmission) -> JudgeResult<Submission>;

    async fn find_by_id(&self, id: &SubmissionId) -> JudgeResult<Option<Submission>>;

    /// Most recent first, at most `limit`
    async fn list_for_user(
        &self,
        user_id: &UserId,
        problem_id: Option<ProblemId>,
        limit: i64,
    ) -> JudgeResult<Vec<Submission>>;

    /// Submissions made for an event, optionally only one user's; most recent
    /// first, at most `limit`
    async fn list_for_event(
        &self,
        event_id: EventId,
        user_id: Option<&UserId>,
        limit: i64,
    ) -> JudgeResult<Vec<Submission>>;

    /// Store a verdict if the submission is still `PENDING`
    ///
    /// Returns false when it already has one; of two racing callers at most
    /// one gets true.
    async fn complete(&self, id: &SubmissionId, verdict: &Verdict) -> JudgeResult<bool>;
}

/// Read-only reference data
#[trait_variant::make(CatalogRepository: Send)]
pub trait LocalCatalogRepository {
    async fn find_problem(&self, id: ProblemId) -> JudgeResult<Option<Problem>>;

    async fn find_language(&self, id: &LanguageId) -> JudgeResult<Option<Language>>;

    async fn find_test_case(&self, id: &TestCaseId) -> JudgeResult<Option<TestCase>>;

    async fn find_event(&self, id: EventId) -> JudgeResult<Option<Event>>;

    async fn find_event_problem(
        &self,
        event_id: EventId,
        problem_id: ProblemId,
    ) -> JudgeResult<Option<EventProblem>>;

    /// The user is registered for the event
    async fn is_participant(&self, user_id: &UserId, event_id: EventId) -> JudgeResult<bool>;

    async fn user_exists(&self, user_id: &UserId) -> JudgeResult<bool>;
}

/// Durable queue towards the execution fleet
#[trait_variant::make(JobPublisher: Send)]
pub trait LocalJobPublisher {
    async fn publish(&self, job: &JobDescriptor) -> Result<(), DispatchError>;
}
