//! Application Configuration
//!
//! Configuration for the judge application layer and its broker.

use std::time::Duration;

use platform::rate_limit::RateLimitConfig;

/// Name of the durable queue shared with the execution fleet
pub const SUBMISSION_QUEUE: &str = "submission_queue";

/// Judge application configuration
#[derive(Debug, Clone)]
pub struct JudgeConfig {
    /// Maximum number of submissions returned by the list endpoints
    pub list_limit: i64,
    /// Limiter for the public scratch endpoint
    pub public_rate_limit: RateLimitConfig,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            list_limit: 25,
            public_rate_limit: RateLimitConfig::default(),
        }
    }
}

impl JudgeConfig {
    /// Create config for development (relaxed public limit)
    pub fn development() -> Self {
        Self {
            public_rate_limit: RateLimitConfig::per_minute(60, 10),
            ..Default::default()
        }
    }
}

/// AMQP broker configuration
#[derive(Clone)]
pub struct AmqpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub queue: String,
    /// Initial connect attempts before giving up
    pub connect_attempts: u32,
    /// Pause between connect attempts
    pub connect_backoff: Duration,
}

impl Default for AmqpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5672,
            user: "guest".to_string(),
            password: "guest".to_string(),
            queue: SUBMISSION_QUEUE.to_string(),
            connect_attempts: 10,
            connect_backoff: Duration::from_secs(2),
        }
    }
}

impl AmqpConfig {
    /// Create config for development (local broker, fail fast)
    pub fn development() -> Self {
        Self {
            connect_attempts: 2,
            connect_backoff: Duration::from_millis(500),
            ..Default::default()
        }
    }
}

impl std::fmt::Debug for AmqpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmqpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("queue", &self.queue)
            .field("connect_attempts", &self.connect_attempts)
            .field("connect_backoff", &self.connect_backoff)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = JudgeConfig::default();
        assert_eq!(config.list_limit, 25);
        assert!(config.public_rate_limit.validate().is_ok());
        assert!(JudgeConfig::development().public_rate_limit.validate().is_ok());

        let amqp = AmqpConfig::default();
        assert_eq!(amqp.queue, "submission_queue");
        assert_eq!(amqp.connect_attempts, 10);
        assert_eq!(amqp.connect_backoff, Duration::from_secs(2));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = AmqpConfig {
            password: "hunter2".to_string(),
            ..Default::default()
        };
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
