//! Auth Middleware
//!
//! Middleware guarding routes with a session token and a role predicate.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use http::{HeaderMap, header};

use crate::application::token_service::TokenService;
use crate::domain::entity::claims::Claims;
use crate::domain::value_object::role::Role;
use crate::error::{AuthError, AuthResult};

/// Predicate a route applies to validated claims
pub type ClaimsPredicate = fn(&Claims) -> bool;

/// Any valid token
pub fn any_authenticated(_: &Claims) -> bool {
    true
}

pub fn at_least_worker(claims: &Claims) -> bool {
    claims.has_role(Role::Worker)
}

pub fn admin_only(claims: &Claims) -> bool {
    claims.has_role(Role::Admin)
}

/// Middleware state
#[derive(Clone)]
pub struct AuthGate {
    tokens: Arc<TokenService>,
    auth_disabled: bool,
    predicate: ClaimsPredicate,
}

impl AuthGate {
    /// Gate accepting any valid token
    pub fn new(tokens: Arc<TokenService>, auth_disabled: bool) -> Self {
        Self {
            tokens,
            auth_disabled,
            predicate: any_authenticated,
        }
    }

    pub fn with_predicate(mut self, predicate: ClaimsPredicate) -> Self {
        self.predicate = predicate;
        self
    }

    /// Resolve the claims for a request, or the reason it is refused
    pub fn authorize(&self, headers: &HeaderMap) -> AuthResult<Claims> {
        if self.auth_disabled {
            // valid credentials still identify the caller
            let claims = single_authorization(headers)
                .and_then(|value| self.tokens.validate(strip_bearer(value)))
                .unwrap_or_else(|_| Claims::development());
            return Ok(claims);
        }

        let value = single_authorization(headers)?;
        let claims = self.tokens.validate(strip_bearer(value))?;

        if !(self.predicate)(&claims) {
            return Err(AuthError::InsufficientRole);
        }

        Ok(claims)
    }
}

/// The one `Authorization` value of a request
///
/// Missing or repeated headers are refused, never merged.
pub fn single_authorization(headers: &HeaderMap) -> AuthResult<&str> {
    let mut values = headers.get_all(header::AUTHORIZATION).iter();

    let value = values.next().ok_or(AuthError::MissingAuthorization)?;
    if values.next().is_some() {
        return Err(AuthError::AmbiguousAuthorization);
    }

    value.to_str().map_err(|_| AuthError::MissingAuthorization)
}

fn strip_bearer(value: &str) -> &str {
    value.strip_prefix("Bearer ").unwrap_or(value).trim()
}

/// Middleware that requires a token accepted by the gate
///
/// Inserts the [`Claims`] into the request extensions for handlers.
pub async fn require_auth(
    State(gate): State<AuthGate>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let claims = gate.authorize(req.headers())?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
