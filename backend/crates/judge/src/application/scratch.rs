//! Scratch Run Use Cases
//!
//! Ad-hoc executions against caller-supplied stdin. Nothing is persisted;
//! results live in the [`ScratchStore`] until read once.

use std::sync::Arc;

use auth::Claims;

use crate::application::dispatcher::JobDispatcher;
use crate::domain::repository::JobPublisher;
use crate::domain::value_objects::{LanguageId, ScratchRunId, UserId};
use crate::error::{JudgeError, JudgeResult};
use crate::infra::scratch_store::{ScratchPoll, ScratchResult, ScratchStore};

/// Create scratch run input
pub struct CreateScratchInput {
    /// Owner named in the body; `None` or nil means the caller
    pub user_id: Option<UserId>,
    pub source_code: String,
    pub language_id: LanguageId,
    pub stdin: String,
}

/// Scratch run use case
pub struct ScratchUseCase<P>
where
    P: JobPublisher,
{
    store: Arc<ScratchStore>,
    dispatcher: Arc<JobDispatcher<P>>,
}

impl<P> ScratchUseCase<P>
where
    P: JobPublisher,
{
    pub fn new(store: Arc<ScratchStore>, dispatcher: Arc<JobDispatcher<P>>) -> Self {
        Self { store, dispatcher }
    }

    /// Start a run for an authenticated caller
    pub async fn create(
        &self,
        claims: &Claims,
        input: CreateScratchInput,
    ) -> JudgeResult<ScratchRunId> {
        let user_id = claims
            .acting_user(input.user_id)
            .ok_or(JudgeError::NotPermitted)?;
        self.start(user_id, input).await
    }

    /// Start an anonymous run
    pub async fn create_public(&self, input: CreateScratchInput) -> JudgeResult<ScratchRunId> {
        self.start(UserId::nil(), input).await
    }

    async fn start(&self, user_id: UserId, input: CreateScratchInput) -> JudgeResult<ScratchRunId> {
        let id = ScratchRunId::new();
        self.store.create(id);

        let published = self
            .dispatcher
            .publish_scratch_job(id, input.source_code, input.language_id, input.stdin)
            .await;

        if let Err(e) = published {
            // no worker will ever complete it
            self.store.remove(&id);
            return Err(e);
        }

        tracing::info!(scratch_run_id = %id, user_id = %user_id, "Started scratch run");
        Ok(id)
    }

    pub fn poll(&self, id: &ScratchRunId) -> JudgeResult<ScratchPoll> {
        self.store.poll(id)
    }

    pub fn complete(&self, id: &ScratchRunId, result: ScratchResult) -> JudgeResult<()> {
        if !result.status.is_terminal() {
            return Err(JudgeError::InvalidVerdict("unsupported status for PATCH"));
        }
        self.store.complete(id, result)
    }
}
