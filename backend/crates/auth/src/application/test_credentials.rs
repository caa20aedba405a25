//! Test Credentials Use Case
//!
//! Hands out a session for a fixed test account. Only routed while
//! authentication is disabled.

use std::sync::Arc;

use crate::application::provider_login::UserSession;
use crate::application::token_service::TokenService;
use crate::domain::entity::user::NewUser;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::role::Role;
use crate::error::AuthResult;

pub const TEST_USER_IDENTIFIER: &str = "__auth_test_user";

pub struct TestCredentialsUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    tokens: Arc<TokenService>,
}

impl<R> TestCredentialsUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, tokens: Arc<TokenService>) -> Self {
        Self { repo, tokens }
    }

    /// Standard-role token for the test user, created on first use
    pub async fn execute(&self) -> AuthResult<UserSession> {
        let new_user = NewUser {
            account_identifier: TEST_USER_IDENTIFIER.to_string(),
            name: TEST_USER_IDENTIFIER.to_string(),
            email: String::new(),
            image: String::new(),
            is_admin: false,
            password_hash: None,
        };

        let user = self.repo.get_or_create(&new_user).await?;
        let token = self.tokens.issue(user.id, Role::Standard)?;

        tracing::warn!(user_id = %user.id, "Issued test user credentials");

        Ok(UserSession { token, user })
    }
}
