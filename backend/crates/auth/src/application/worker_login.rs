//! Worker Login Use Case

use std::sync::Arc;

use platform::crypto::secrets_match;

use crate::application::config::AuthConfig;
use crate::application::token_service::TokenService;
use crate::domain::value_object::{UserId, role::Role};
use crate::error::{AuthError, AuthResult};

/// Exchanges the worker shared secret for a worker-role token
///
/// The token carries the nil subject; workers are not users.
pub struct WorkerLoginUseCase {
    tokens: Arc<TokenService>,
    config: Arc<AuthConfig>,
}

impl WorkerLoginUseCase {
    pub fn new(tokens: Arc<TokenService>, config: Arc<AuthConfig>) -> Self {
        Self { tokens, config }
    }

    pub fn execute(&self, presented_secret: &str) -> AuthResult<String> {
        if self.config.worker_secret.is_empty()
            || !secrets_match(
                presented_secret.as_bytes(),
                self.config.worker_secret.as_bytes(),
            )
        {
            return Err(AuthError::InvalidSecret);
        }

        tracing::info!("Worker login");
        self.tokens.issue(UserId::nil(), Role::Worker)
    }
}
