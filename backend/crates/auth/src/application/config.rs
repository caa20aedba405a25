//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC key for HS256 session tokens
    pub signing_secret: Vec<u8>,
    /// Shared secret of the trusted auth provider
    pub provider_secret: String,
    /// Shared secret of the execution fleet
    pub worker_secret: String,
    /// Emails whose accounts are minted admin tokens
    pub admin_emails: Vec<String>,
    /// Token lifetime; `None` issues tokens without `exp`
    pub token_ttl: Option<Duration>,
    /// Global kill switch: every guarded route lets requests through
    pub auth_disabled: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            signing_secret: Vec::new(),
            provider_secret: String::new(),
            worker_secret: String::new(),
            admin_emails: Vec::new(),
            token_ttl: None,
            auth_disabled: false,
        }
    }
}

impl AuthConfig {
    /// Create config with random secrets (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            signing_secret: secret.to_vec(),
            provider_secret: platform::crypto::random_secret(32),
            worker_secret: platform::crypto::random_secret(32),
            ..Default::default()
        }
    }

    /// Create config for development (one-day tokens)
    pub fn development() -> Self {
        Self {
            token_ttl: Some(Duration::from_secs(24 * 3600)),
            ..Self::with_random_secret()
        }
    }

    /// Parse a comma-separated admin list
    pub fn parse_admin_emails(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(|email| email.trim().to_lowercase())
            .filter(|email| !email.is_empty())
            .collect()
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.trim();
        self.admin_emails
            .iter()
            .any(|admin| admin.eq_ignore_ascii_case(email))
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("signing_secret", &"[REDACTED]")
            .field("provider_secret", &"[REDACTED]")
            .field("worker_secret", &"[REDACTED]")
            .field("admin_emails", &self.admin_emails)
            .field("token_ttl", &self.token_ttl)
            .field("auth_disabled", &self.auth_disabled)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_admin_emails() {
        let emails = AuthConfig::parse_admin_emails(" Root@Example.com, ,ops@example.com ");
        assert_eq!(emails, vec!["root@example.com", "ops@example.com"]);
    }

    #[test]
    fn test_is_admin_email() {
        let config = AuthConfig {
            admin_emails: vec!["root@example.com".to_string()],
            ..Default::default()
        };
        assert!(config.is_admin_email("ROOT@example.com"));
        assert!(!config.is_admin_email("user@example.com"));
    }

    #[test]
    fn test_random_secrets_differ() {
        let a = AuthConfig::with_random_secret();
        let b = AuthConfig::with_random_secret();
        assert_eq!(a.signing_secret.len(), 32);
        assert_ne!(a.signing_secret, b.signing_secret);
        assert_ne!(a.worker_secret, a.provider_secret);
        assert!(a.token_ttl.is_none());
        assert!(!a.auth_disabled);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = AuthConfig::with_random_secret();
        let debug = format!("{:?}", config);
        assert!(!debug.contains(&config.worker_secret));
    }
}
