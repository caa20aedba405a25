//! Auth Router

use axum::{Router, routing::post};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token_service::TokenService;
use crate::domain::repository::UserRepository;
use crate::infra::postgres::PgUserRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(
    repo: PgUserRepository,
    tokens: Arc<TokenService>,
    config: Arc<AuthConfig>,
) -> Router {
    auth_router_generic(repo, tokens, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, tokens: Arc<TokenService>, config: Arc<AuthConfig>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let auth_disabled = config.auth_disabled;
    let state = AuthAppState {
        repo: Arc::new(repo),
        tokens,
        config,
    };

    let mut router = Router::new()
        .route(
            "/v1/create_or_login_user",
            post(handlers::create_or_login_user::<R>),
        )
        .route("/v1/login_judge", post(handlers::login_worker::<R>))
        .route("/v1/basic_register", post(handlers::basic_register::<R>))
        .route("/v1/basic_login", post(handlers::basic_login::<R>));

    if auth_disabled {
        router = router.route(
            "/v1/auth_test/user_creds",
            post(handlers::test_user_credentials::<R>),
        );
    }

    router.with_state(state)
}
