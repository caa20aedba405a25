//! Token Service
//!
//! Issues and validates HS256 session tokens.

use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::application::config::AuthConfig;
use crate::domain::entity::claims::Claims;
use crate::domain::value_object::{UserId, role::Role};
use crate::error::{AuthError, AuthResult};

/// Signs and verifies session tokens with the server secret
///
/// Tokens carry no `exp` unless a TTL is configured. There is no revocation:
/// a leaked long-lived token stays valid until the secret is rotated.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Option<Duration>,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl: Option<Duration>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // `exp` is optional, but still checked when present
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.signing_secret, config.token_ttl)
    }

    /// Sign a token for `id` with `role`
    pub fn issue(&self, id: UserId, role: Role) -> AuthResult<String> {
        let mut claims = Claims::new(id, role);
        claims.exp = self
            .ttl
            .map(|ttl| jsonwebtoken::get_current_timestamp() + ttl.as_secs());
        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> AuthResult<String> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(AuthError::TokenCreation)
    }

    /// Verify signature, algorithm and expiry, returning the claims
    pub fn validate(&self, token: &str) -> AuthResult<Claims> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(AuthError::InvalidToken)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-signing-secret";

    #[test]
    fn test_issue_and_validate() {
        let service = TokenService::new(SECRET, None);
        let id = UserId::new();

        let token = service.issue(id, Role::Admin).unwrap();
        let claims = service.validate(&token).unwrap();

        assert_eq!(claims.id, id);
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp, None);
    }

    #[test]
    fn test_ttl_sets_expiry() {
        let service = TokenService::new(SECRET, Some(Duration::from_secs(60)));
        let token = service.issue(UserId::new(), Role::Standard).unwrap();
        let claims = service.validate(&token).unwrap();

        let exp = claims.exp.unwrap();
        assert!(exp > jsonwebtoken::get_current_timestamp());
    }

    #[test]
    fn test_rejects_wrong_secret() {
        let token = TokenService::new(b"other-secret", None)
            .issue(UserId::new(), Role::Admin)
            .unwrap();

        let result = TokenService::new(SECRET, None).validate(&token);
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_rejects_other_algorithm() {
        let claims = Claims::new(UserId::new(), Role::Admin);
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let result = TokenService::new(SECRET, None).validate(&token);
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_rejects_expired() {
        let service = TokenService::new(SECRET, None);
        let mut claims = Claims::new(UserId::new(), Role::Standard);
        claims.exp = Some(jsonwebtoken::get_current_timestamp() - 3600);
        let token = service.sign(&claims).unwrap();

        assert!(matches!(
            service.validate(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_rejects_garbage() {
        let service = TokenService::new(SECRET, None);
        assert!(service.validate("").is_err());
        assert!(service.validate("not.a.token").is_err());
    }

    #[test]
    fn test_rejects_tampered_role() {
        let service = TokenService::new(SECRET, None);
        let token = service.issue(UserId::new(), Role::Standard).unwrap();
        let forged = TokenService::new(b"attacker", None)
            .issue(UserId::new(), Role::Admin)
            .unwrap();

        // standard header and signature, admin payload
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        parts[1] = forged_parts[1];

        assert!(service.validate(&parts.join(".")).is_err());
    }
}
