//! Create Submission Use Case

use std::sync::Arc;

use auth::Claims;
use chrono::Utc;

use crate::application::dispatcher::JobDispatcher;
use crate::domain::entities::{NewSubmission, Submission};
use crate::domain::repository::{CatalogRepository, JobPublisher, SubmissionRepository};
use crate::domain::value_objects::{EventId, LanguageId, ProblemId, UserId};
use crate::error::{JudgeError, JudgeResult};

/// Create submission input
pub struct CreateSubmissionInput {
    /// Owner named in the body; `None` or nil means the caller
    pub user_id: Option<UserId>,
    pub problem_id: ProblemId,
    pub language_id: LanguageId,
    pub source_code: String,
    /// Contest to submit to; `None` or 0 for a practice submission
    pub event_id: Option<EventId>,
}

/// Validates, persists and dispatches a graded submission
pub struct CreateSubmissionUseCase<R, P>
where
    R: SubmissionRepository + CatalogRepository,
    P: JobPublisher,
{
    repo: Arc<R>,
    dispatcher: Arc<JobDispatcher<P>>,
}

impl<R, P> CreateSubmissionUseCase<R, P>
where
    R: SubmissionRepository + CatalogRepository,
    P: JobPublisher,
{
    pub fn new(repo: Arc<R>, dispatcher: Arc<JobDispatcher<P>>) -> Self {
        Self { repo, dispatcher }
    }

    pub async fn execute(
        &self,
        claims: &Claims,
        input: CreateSubmissionInput,
    ) -> JudgeResult<Submission> {
        let user_id = claims
            .acting_user(input.user_id)
            .ok_or(JudgeError::NotPermitted)?;

        if self.repo.find_problem(input.problem_id).await?.is_none() {
            return Err(JudgeError::ProblemNotFound);
        }

        let event = match input.event_id.filter(|id| *id != 0) {
            Some(event_id) => {
                let event = self
                    .repo
                    .find_event(event_id)
                    .await?
                    .ok_or(JudgeError::EventNotFound)?;
                let event_problem = self
                    .repo
                    .find_event_problem(event_id, input.problem_id)
                    .await?
                    .ok_or(JudgeError::ProblemNotInEvent)?;
                Some((event, event_problem))
            }
            None => None,
        };

        if self.repo.find_language(&input.language_id).await?.is_none() {
            return Err(JudgeError::LanguageNotFound);
        }

        if !self.repo.user_exists(&user_id).await? {
            return Err(JudgeError::UserNotFound);
        }

        if let Some((event, _)) = &event {
            let allowed = event.is_general()
                || (event.is_running(Utc::now())
                    && self.repo.is_participant(&user_id, event.id).await?);
            if !allowed {
                return Err(JudgeError::EventClosed);
            }
        }

        let new_submission = NewSubmission {
            user_id,
            problem_id: input.problem_id,
            language_id: input.language_id,
            source_code: input.source_code,
            event_id: event.as_ref().map(|(event, _)| event.id),
            event_problem_id: event.as_ref().map(|(_, event_problem)| event_problem.id),
        };

        let submission = self.repo.create(&new_submission).await?;

        tracing::info!(
            submission_id = %submission.id,
            user_id = %submission.user_id,
            problem_id = submission.problem_id,
            "Created submission"
        );

        // the row stays PENDING if this fails
        if let Err(e) = self.dispatcher.publish_submission_job(submission.id).await {
            tracing::error!(submission_id = %submission.id, "Submission stored but not dispatched");
            return Err(e);
        }

        Ok(submission)
    }
}
