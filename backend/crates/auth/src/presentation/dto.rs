//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::application::provider_login::UserSession;
use crate::domain::value_object::UserId;

// ============================================================================
// Provider Login
// ============================================================================

/// Identity asserted by the trusted auth provider
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderLoginRequest {
    /// Provider-side account identifier
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub image: String,
}

// ============================================================================
// Basic Register / Login
// ============================================================================

/// Basic register request
#[derive(Debug, Clone, Deserialize)]
pub struct BasicRegisterRequest {
    #[serde(default)]
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub image: String,
}

/// Basic login request
#[derive(Debug, Clone, Deserialize)]
pub struct BasicLoginRequest {
    pub email: String,
    pub password: String,
}

// ============================================================================
// Token Responses
// ============================================================================

/// Token issued for a user
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub image: String,
}

impl From<UserSession> for TokenResponse {
    fn from(session: UserSession) -> Self {
        Self {
            token: session.token,
            id: session.user.id,
            name: session.user.name,
            email: session.user.email,
            image: session.user.image,
        }
    }
}

/// Token issued for a worker
#[derive(Debug, Clone, Serialize)]
pub struct WorkerTokenResponse {
    pub token: String,
}
