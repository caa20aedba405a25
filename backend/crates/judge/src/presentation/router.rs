//! Judge Router

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};
use platform::rate_limit::RateLimiter;
use std::sync::Arc;

use auth::middleware::{AuthGate, at_least_worker, require_auth};

use crate::application::config::JudgeConfig;
use crate::application::dispatcher::JobDispatcher;
use crate::domain::repository::{CatalogRepository, JobPublisher, SubmissionRepository};
use crate::infra::amqp::AmqpPublisher;
use crate::infra::postgres::PgJudgeRepository;
use crate::infra::scratch_store::ScratchStore;
use crate::presentation::handlers::{self, JudgeAppState};
use crate::presentation::middleware::rate_limit;

/// Create the Judge router with PostgreSQL repository and AMQP publisher
pub fn judge_router(
    repo: PgJudgeRepository,
    publisher: Arc<AmqpPublisher>,
    gate: AuthGate,
    limiter: Arc<RateLimiter>,
    config: Arc<JudgeConfig>,
) -> Router {
    judge_router_generic(repo, publisher, gate, limiter, config)
}

/// Create a generic Judge router for any repository and publisher
pub fn judge_router_generic<R, P>(
    repo: R,
    publisher: Arc<P>,
    gate: AuthGate,
    limiter: Arc<RateLimiter>,
    config: Arc<JudgeConfig>,
) -> Router
where
    R: SubmissionRepository + CatalogRepository + Send + Sync + 'static,
    P: JobPublisher + Send + Sync + 'static,
{
    let state = JudgeAppState {
        repo: Arc::new(repo),
        dispatcher: Arc::new(JobDispatcher::new(publisher)),
        scratch: Arc::new(ScratchStore::new()),
        config,
    };

    let authenticated = Router::new()
        .route("/v1/submissions", post(handlers::create_submission::<R, P>))
        .route("/v1/submissions/{id}", get(handlers::get_submission::<R, P>))
        .route(
            "/v1/submissions/{id}/status",
            get(handlers::get_submission_status::<R, P>),
        )
        .route(
            "/v1/user_submissions/{user_id}",
            get(handlers::list_user_submissions::<R, P>),
        )
        .route(
            "/v1/user_problem_submissions/{user_id}/{problem_id}",
            get(handlers::list_user_problem_submissions::<R, P>),
        )
        .route(
            "/v1/events/{event_id}/submissions",
            get(handlers::list_event_submissions::<R, P>),
        )
        .route("/v1/input_submissions", post(handlers::create_scratch::<R, P>))
        .route(
            "/v1/input_submissions/{id}",
            get(handlers::poll_scratch::<R, P>),
        )
        .route_layer(middleware::from_fn_with_state(gate.clone(), require_auth));

    let workers = Router::new()
        .route(
            "/v1/submissions/{id}",
            patch(handlers::update_submission_status::<R, P>),
        )
        .route(
            "/v1/input_submissions/{id}",
            patch(handlers::complete_scratch::<R, P>),
        )
        .route_layer(middleware::from_fn_with_state(
            gate.with_predicate(at_least_worker),
            require_auth,
        ));

    let public = Router::new()
        .route(
            "/v1/public/input_submissions",
            post(handlers::create_public_scratch::<R, P>),
        )
        .route_layer(middleware::from_fn_with_state(limiter, rate_limit))
        .route(
            "/v1/public/input_submissions/{id}",
            get(handlers::poll_scratch::<R, P>),
        );

    authenticated
        .merge(workers)
        .merge(public)
        .with_state(state)
}
