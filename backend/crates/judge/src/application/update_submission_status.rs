//! Update Submission Status Use Case
//!
//! Applies a worker's verdict to a pending submission.

use std::sync::Arc;

use crate::domain::entities::Verdict;
use crate::domain::repository::{CatalogRepository, SubmissionRepository};
use crate::domain::services::{check_failed_test_case, validate_verdict};
use crate::domain::value_objects::{SubmissionId, TestCaseId};
use crate::error::{JudgeError, JudgeResult};

/// Verdict as reported by a worker
///
/// The status stays a string until the submission is known to exist.
#[derive(Debug, Clone)]
pub struct VerdictInput {
    pub status: String,
    pub failed_test_case_id: Option<TestCaseId>,
    pub stdout: String,
    pub stderr: String,
}

impl VerdictInput {
    fn into_verdict(self) -> JudgeResult<Verdict> {
        let status = self
            .status
            .parse()
            .map_err(|_| JudgeError::InvalidVerdict("unsupported status for PATCH"))?;
        Ok(Verdict {
            status,
            failed_test_case_id: self.failed_test_case_id,
            stdout: self.stdout,
            stderr: self.stderr,
        })
    }
}

impl From<Verdict> for VerdictInput {
    fn from(verdict: Verdict) -> Self {
        Self {
            status: verdict.status.to_string(),
            failed_test_case_id: verdict.failed_test_case_id,
            stdout: verdict.stdout,
            stderr: verdict.stderr,
        }
    }
}

/// Update submission status use case
pub struct UpdateSubmissionStatusUseCase<R>
where
    R: SubmissionRepository + CatalogRepository,
{
    repo: Arc<R>,
}

impl<R> UpdateSubmissionStatusUseCase<R>
where
    R: SubmissionRepository + CatalogRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: SubmissionId, input: VerdictInput) -> JudgeResult<()> {
        let submission = self
            .repo
            .find_by_id(&id)
            .await?
            .ok_or(JudgeError::SubmissionNotFound)?;

        let verdict = input.into_verdict()?;
        validate_verdict(&verdict)?;

        if let Some(test_case_id) = &verdict.failed_test_case_id {
            let test_case = self.repo.find_test_case(test_case_id).await?;
            check_failed_test_case(&submission, test_case.as_ref())?;
        }

        if submission.status.is_terminal() {
            return Err(JudgeError::SubmissionAlreadyCompleted);
        }

        // conditional on PENDING, so a racing callback loses here
        if !self.repo.complete(&id, &verdict).await? {
            return Err(JudgeError::SubmissionAlreadyCompleted);
        }

        tracing::info!(
            submission_id = %id,
            status = %verdict.status,
            "Submission completed"
        );

        Ok(())
    }
}
