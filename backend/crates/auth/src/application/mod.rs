//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod provider_login;
pub mod sign_in;
pub mod sign_up;
pub mod test_credentials;
pub mod token_service;
pub mod worker_login;

// Re-exports
pub use config::AuthConfig;
pub use provider_login::{ProviderLoginInput, ProviderLoginUseCase, UserSession};
pub use sign_in::{SignInInput, SignInUseCase};
pub use sign_up::{SignUpInput, SignUpUseCase};
pub use test_credentials::TestCredentialsUseCase;
pub use token_service::TokenService;
pub use worker_login::WorkerLoginUseCase;
