//! HTTP Handlers

use axum::extract::State;
use axum::http::HeaderMap;
use kernel::extract::Json;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token_service::TokenService;
use crate::application::{
    ProviderLoginInput, ProviderLoginUseCase, SignInInput, SignInUseCase, SignUpInput,
    SignUpUseCase, TestCredentialsUseCase, WorkerLoginUseCase,
};
use crate::domain::repository::UserRepository;
use crate::error::AuthResult;
use crate::presentation::dto::{
    BasicLoginRequest, BasicRegisterRequest, ProviderLoginRequest, TokenResponse,
    WorkerTokenResponse,
};
use crate::presentation::middleware::single_authorization;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub tokens: Arc<TokenService>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Privileged Logins
// ============================================================================

/// POST /v1/create_or_login_user
pub async fn create_or_login_user<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    Json(req): Json<ProviderLoginRequest>,
) -> AuthResult<Json<TokenResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let presented_secret = single_authorization(&headers)?.to_string();

    let use_case = ProviderLoginUseCase::new(
        state.repo.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let input = ProviderLoginInput {
        presented_secret,
        account_identifier: req.id,
        name: req.name,
        email: req.email,
        image: req.image,
    };

    let session = use_case.execute(input).await?;
    Ok(Json(session.into()))
}

/// POST /v1/login_judge
pub async fn login_worker<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Json<WorkerTokenResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let presented_secret = single_authorization(&headers)?;

    let use_case = WorkerLoginUseCase::new(state.tokens.clone(), state.config.clone());
    let token = use_case.execute(presented_secret)?;

    Ok(Json(WorkerTokenResponse { token }))
}

// ============================================================================
// Basic Accounts
// ============================================================================

/// POST /v1/basic_register
pub async fn basic_register<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<BasicRegisterRequest>,
) -> AuthResult<Json<TokenResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(
        state.repo.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let input = SignUpInput {
        name: req.name,
        email: req.email,
        password: req.password,
        image: req.image,
    };

    let session = use_case.execute(input).await?;
    Ok(Json(session.into()))
}

/// POST /v1/basic_login
pub async fn basic_login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<BasicLoginRequest>,
) -> AuthResult<Json<TokenResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.repo.clone(), state.tokens.clone());

    let input = SignInInput {
        email: req.email,
        password: req.password,
    };

    let session = use_case.execute(input).await?;
    Ok(Json(session.into()))
}

/// POST /v1/auth_test/user_creds
pub async fn test_user_credentials<R>(
    State(state): State<AuthAppState<R>>,
) -> AuthResult<Json<TokenResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = TestCredentialsUseCase::new(state.repo.clone(), state.tokens.clone());
    let session = use_case.execute().await?;
    Ok(Json(session.into()))
}
