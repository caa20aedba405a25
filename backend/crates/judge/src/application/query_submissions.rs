//! Query Submissions Use Case
//!
//! Read access to graded submissions.

use std::sync::Arc;

use auth::{Claims, Role};

use crate::application::config::JudgeConfig;
use crate::domain::entities::Submission;
use crate::domain::repository::{CatalogRepository, SubmissionRepository};
use crate::domain::value_objects::{EventId, ProblemId, SubmissionId, UserId};
use crate::error::{JudgeError, JudgeResult};

/// Query submissions use case
///
/// A single submission is visible to its owner and to workers and admins;
/// a user's list is visible to that user and to admins. Event lists show
/// everything to workers and admins and only the caller's own otherwise.
pub struct QuerySubmissionsUseCase<R>
where
    R: SubmissionRepository + CatalogRepository,
{
    repo: Arc<R>,
    config: Arc<JudgeConfig>,
}

impl<R> QuerySubmissionsUseCase<R>
where
    R: SubmissionRepository + CatalogRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<JudgeConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn get(&self, claims: &Claims, id: SubmissionId) -> JudgeResult<Submission> {
        let submission = self
            .repo
            .find_by_id(&id)
            .await?
            .ok_or(JudgeError::SubmissionNotFound)?;

        if !claims.can_access(&submission.user_id, Role::Worker) {
            return Err(JudgeError::NotPermitted);
        }

        Ok(submission)
    }

    pub async fn list_for_user(
        &self,
        claims: &Claims,
        user_id: UserId,
        problem_id: Option<ProblemId>,
    ) -> JudgeResult<Vec<Submission>> {
        if !claims.can_access(&user_id, Role::Admin) {
            return Err(JudgeError::NotPermitted);
        }

        if !self.repo.user_exists(&user_id).await? {
            return Err(JudgeError::UserNotFound);
        }

        self.repo
            .list_for_user(&user_id, problem_id, self.config.list_limit)
            .await
    }

    pub async fn list_for_event(
        &self,
        claims: &Claims,
        event_id: EventId,
    ) -> JudgeResult<Vec<Submission>> {
        if self.repo.find_event(event_id).await?.is_none() {
            return Err(JudgeError::EventNotFound);
        }

        let own = (claims.role < Role::Worker).then_some(&claims.id);
        self.repo
            .list_for_event(event_id, own, self.config.list_limit)
            .await
    }
}
