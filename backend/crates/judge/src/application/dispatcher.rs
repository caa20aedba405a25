//! Job Dispatcher
//!
//! Turns accepted work into job descriptors for the execution fleet.

use std::sync::Arc;

use crate::domain::repository::JobPublisher;
use crate::domain::value_objects::{JobDescriptor, LanguageId, ScratchRunId, SubmissionId};
use crate::error::JudgeResult;

/// Publishes job descriptors through a [`JobPublisher`]
///
/// No ordering is guaranteed between independent jobs.
pub struct JobDispatcher<P>
where
    P: JobPublisher,
{
    publisher: Arc<P>,
}

impl<P> JobDispatcher<P>
where
    P: JobPublisher,
{
    pub fn new(publisher: Arc<P>) -> Self {
        Self { publisher }
    }

    /// Queue a stored submission for grading
    pub async fn publish_submission_job(&self, id: SubmissionId) -> JudgeResult<()> {
        self.dispatch(JobDescriptor::Submission { id }).await
    }

    /// Queue a scratch run
    pub async fn publish_scratch_job(
        &self,
        id: ScratchRunId,
        code: String,
        language_id: LanguageId,
        stdin: String,
    ) -> JudgeResult<()> {
        self.dispatch(JobDescriptor::Input {
            id,
            code,
            language_id,
            stdin,
        })
        .await
    }

    async fn dispatch(&self, job: JobDescriptor) -> JudgeResult<()> {
        self.publisher.publish(&job).await?;
        tracing::debug!(kind = job.kind(), "Published job");
        Ok(())
    }
}
