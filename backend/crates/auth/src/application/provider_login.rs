//! Provider Login Use Case
//!
//! Lets the trusted auth provider mint a session token for an external
//! identity, creating the user on first sight.

use std::sync::Arc;

use platform::crypto::secrets_match;

use crate::application::config::AuthConfig;
use crate::application::token_service::TokenService;
use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

/// Provider login input
pub struct ProviderLoginInput {
    /// Raw `Authorization` value presented by the provider
    pub presented_secret: String,
    /// Provider-side account identifier
    pub account_identifier: String,
    pub name: String,
    pub email: String,
    pub image: String,
}

/// Token issued for a user account
#[derive(Debug, Clone)]
pub struct UserSession {
    pub token: String,
    pub user: User,
}

/// Provider login use case
pub struct ProviderLoginUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    tokens: Arc<TokenService>,
    config: Arc<AuthConfig>,
}

impl<R> ProviderLoginUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, tokens: Arc<TokenService>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            tokens,
            config,
        }
    }

    pub async fn execute(&self, input: ProviderLoginInput) -> AuthResult<UserSession> {
        if self.config.provider_secret.is_empty()
            || !secrets_match(
                input.presented_secret.as_bytes(),
                self.config.provider_secret.as_bytes(),
            )
        {
            return Err(AuthError::InvalidSecret);
        }

        let is_admin = self.config.is_admin_email(&input.email);
        let new_user = NewUser {
            account_identifier: input.account_identifier,
            name: input.name,
            email: input.email,
            image: input.image,
            is_admin,
            password_hash: None,
        };

        let user = self.repo.get_or_create(&new_user).await?;
        let token = self.tokens.issue(user.id, user.role())?;

        tracing::info!(user_id = %user.id, is_admin = user.is_admin, "Provider login");

        Ok(UserSession { token, user })
    }
}
