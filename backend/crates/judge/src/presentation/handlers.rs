//! HTTP Handlers

use axum::Extension;
use axum::extract::State;
use axum::http::StatusCode;
use kernel::extract::{Json, Path};
use std::sync::Arc;

use auth::Claims;

use crate::application::config::JudgeConfig;
use crate::application::dispatcher::JobDispatcher;
use crate::application::{
    CreateSubmissionUseCase, QuerySubmissionsUseCase, ScratchUseCase,
    UpdateSubmissionStatusUseCase,
};
use crate::domain::repository::{CatalogRepository, JobPublisher, SubmissionRepository};
use crate::domain::value_objects::{EventId, ProblemId, ScratchRunId, SubmissionId, UserId};
use crate::error::JudgeResult;
use crate::infra::scratch_store::ScratchStore;
use crate::presentation::dto::{
    CreateScratchRequest, CreateSubmissionRequest, CreatedSubmissionResponse,
    ScratchPollResponse, ScratchResultRequest, SubmissionResponse, SubmissionStatusResponse,
    VerdictRequest,
};

/// Shared state for judge handlers
pub struct JudgeAppState<R, P>
where
    R: SubmissionRepository + CatalogRepository + Send + Sync + 'static,
    P: JobPublisher + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub dispatcher: Arc<JobDispatcher<P>>,
    pub scratch: Arc<ScratchStore>,
    pub config: Arc<JudgeConfig>,
}

impl<R, P> Clone for JudgeAppState<R, P>
where
    R: SubmissionRepository + CatalogRepository + Send + Sync + 'static,
    P: JobPublisher + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            dispatcher: self.dispatcher.clone(),
            scratch: self.scratch.clone(),
            config: self.config.clone(),
        }
    }
}

impl<R, P> JudgeAppState<R, P>
where
    R: SubmissionRepository + CatalogRepository + Send + Sync + 'static,
    P: JobPublisher + Send + Sync + 'static,
{
    fn scratch_runs(&self) -> ScratchUseCase<P> {
        ScratchUseCase::new(self.scratch.clone(), self.dispatcher.clone())
    }

    fn queries(&self) -> QuerySubmissionsUseCase<R> {
        QuerySubmissionsUseCase::new(self.repo.clone(), self.config.clone())
    }
}

// ============================================================================
// Submissions
// ============================================================================

/// POST /v1/submissions
pub async fn create_submission<R, P>(
    State(state): State<JudgeAppState<R, P>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateSubmissionRequest>,
) -> JudgeResult<(StatusCode, Json<CreatedSubmissionResponse>)>
where
    R: SubmissionRepository + CatalogRepository + Send + Sync + 'static,
    P: JobPublisher + Send + Sync + 'static,
{
    let use_case = CreateSubmissionUseCase::new(state.repo.clone(), state.dispatcher.clone());
    let submission = use_case.execute(&claims, req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedSubmissionResponse::from(&submission)),
    ))
}

/// GET /v1/submissions/{id}
pub async fn get_submission<R, P>(
    State(state): State<JudgeAppState<R, P>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<SubmissionId>,
) -> JudgeResult<Json<SubmissionResponse>>
where
    R: SubmissionRepository + CatalogRepository + Send + Sync + 'static,
    P: JobPublisher + Send + Sync + 'static,
{
    let submission = state.queries().get(&claims, id).await?;
    Ok(Json(submission.into()))
}

/// GET /v1/submissions/{id}/status
pub async fn get_submission_status<R, P>(
    State(state): State<JudgeAppState<R, P>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<SubmissionId>,
) -> JudgeResult<Json<SubmissionStatusResponse>>
where
    R: SubmissionRepository + CatalogRepository + Send + Sync + 'static,
    P: JobPublisher + Send + Sync + 'static,
{
    let submission = state.queries().get(&claims, id).await?;
    Ok(Json(SubmissionStatusResponse {
        id: submission.id,
        status: submission.status,
    }))
}

/// PATCH /v1/submissions/{id}
pub async fn update_submission_status<R, P>(
    State(state): State<JudgeAppState<R, P>>,
    Path(id): Path<SubmissionId>,
    Json(req): Json<VerdictRequest>,
) -> JudgeResult<StatusCode>
where
    R: SubmissionRepository + CatalogRepository + Send + Sync + 'static,
    P: JobPublisher + Send + Sync + 'static,
{
    let use_case = UpdateSubmissionStatusUseCase::new(state.repo.clone());
    use_case.execute(id, req.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/user_submissions/{user_id}
pub async fn list_user_submissions<R, P>(
    State(state): State<JudgeAppState<R, P>>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<UserId>,
) -> JudgeResult<Json<Vec<SubmissionResponse>>>
where
    R: SubmissionRepository + CatalogRepository + Send + Sync + 'static,
    P: JobPublisher + Send + Sync + 'static,
{
    let submissions = state.queries().list_for_user(&claims, user_id, None).await?;
    Ok(Json(submissions.into_iter().map(Into::into).collect()))
}

/// GET /v1/user_problem_submissions/{user_id}/{problem_id}
pub async fn list_user_problem_submissions<R, P>(
    State(state): State<JudgeAppState<R, P>>,
    Extension(claims): Extension<Claims>,
    Path((user_id, problem_id)): Path<(UserId, ProblemId)>,
) -> JudgeResult<Json<Vec<SubmissionResponse>>>
where
    R: SubmissionRepository + CatalogRepository + Send + Sync + 'static,
    P: JobPublisher + Send + Sync + 'static,
{
    let submissions = state
        .queries()
        .list_for_user(&claims, user_id, Some(problem_id))
        .await?;
    Ok(Json(submissions.into_iter().map(Into::into).collect()))
}

/// GET /v1/events/{event_id}/submissions
pub async fn list_event_submissions<R, P>(
    State(state): State<JudgeAppState<R, P>>,
    Extension(claims): Extension<Claims>,
    Path(event_id): Path<EventId>,
) -> JudgeResult<Json<Vec<SubmissionResponse>>>
where
    R: SubmissionRepository + CatalogRepository + Send + Sync + 'static,
    P: JobPublisher + Send + Sync + 'static,
{
    let submissions = state.queries().list_for_event(&claims, event_id).await?;
    Ok(Json(submissions.into_iter().map(Into::into).collect()))
}

// ============================================================================
// Scratch Runs
// ============================================================================

/// POST /v1/input_submissions
pub async fn create_scratch<R, P>(
    State(state): State<JudgeAppState<R, P>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateScratchRequest>,
) -> JudgeResult<String>
where
    R: SubmissionRepository + CatalogRepository + Send + Sync + 'static,
    P: JobPublisher + Send + Sync + 'static,
{
    let id = state.scratch_runs().create(&claims, req.into()).await?;
    Ok(id.to_string())
}

/// POST /v1/public/input_submissions
pub async fn create_public_scratch<R, P>(
    State(state): State<JudgeAppState<R, P>>,
    Json(req): Json<CreateScratchRequest>,
) -> JudgeResult<String>
where
    R: SubmissionRepository + CatalogRepository + Send + Sync + 'static,
    P: JobPublisher + Send + Sync + 'static,
{
    let id = state.scratch_runs().create_public(req.into()).await?;
    Ok(id.to_string())
}

/// GET /v1/input_submissions/{id} and /v1/public/input_submissions/{id}
pub async fn poll_scratch<R, P>(
    State(state): State<JudgeAppState<R, P>>,
    Path(id): Path<ScratchRunId>,
) -> JudgeResult<Json<ScratchPollResponse>>
where
    R: SubmissionRepository + CatalogRepository + Send + Sync + 'static,
    P: JobPublisher + Send + Sync + 'static,
{
    let poll = state.scratch_runs().poll(&id)?;
    Ok(Json(poll.into()))
}

/// PATCH /v1/input_submissions/{id}
pub async fn complete_scratch<R, P>(
    State(state): State<JudgeAppState<R, P>>,
    Path(id): Path<ScratchRunId>,
    Json(req): Json<ScratchResultRequest>,
) -> JudgeResult<StatusCode>
where
    R: SubmissionRepository + CatalogRepository + Send + Sync + 'static,
    P: JobPublisher + Send + Sync + 'static,
{
    state.scratch_runs().complete(&id, req.into())?;
    Ok(StatusCode::NO_CONTENT)
}
