//! Sign In Use Case
//!
//! Authenticates an email + password account.

use std::sync::Arc;

use platform::password::{ClearTextPassword, HashedPassword};

use crate::application::provider_login::UserSession;
use crate::application::token_service::TokenService;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in use case
///
/// Unknown account, account without a password and wrong password all
/// fail with the same `InvalidCredentials`.
pub struct SignInUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    tokens: Arc<TokenService>,
}

impl<R> SignInUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, tokens: Arc<TokenService>) -> Self {
        Self { repo, tokens }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<UserSession> {
        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .repo
            .find_by_account_identifier(&email.basic_account_identifier())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let stored = self
            .repo
            .find_password_hash(&user.id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let hash = HashedPassword::from_phc_string(stored)?;
        let password = ClearTextPassword::normalized(input.password);

        if !hash.verify(&password) {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id, user.role())?;

        tracing::info!(user_id = %user.id, "User signed in");

        Ok(UserSession { token, user })
    }
}
