//! Sign Up Use Case
//!
//! Registers an email + password account.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::provider_login::UserSession;
use crate::application::token_service::TokenService;
use crate::domain::entity::user::NewUser;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub image: String,
}

/// Sign up use case
pub struct SignUpUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    tokens: Arc<TokenService>,
    config: Arc<AuthConfig>,
}

impl<R> SignUpUseCase<R>
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

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<UserSession> {
        let email = Email::new(&input.email)?;
        let account_identifier = email.basic_account_identifier();

        if self
            .repo
            .find_by_account_identifier(&account_identifier)
            .await?
            .is_some()
        {
            return Err(AuthError::UserExists);
        }

        let password = ClearTextPassword::new(input.password)?;
        let password_hash = password.hash()?;

        let new_user = NewUser {
            account_identifier,
            name: input.name,
            email: email.as_str().to_string(),
            image: input.image,
            is_admin: self.config.is_admin_email(email.as_str()),
            password_hash: Some(password_hash.as_phc_string().to_string()),
        };

        // a concurrent registration still loses with UserExists here
        let user = self.repo.create(&new_user).await?;
        let token = self.tokens.issue(user.id, user.role())?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(UserSession { token, user })
    }
}
