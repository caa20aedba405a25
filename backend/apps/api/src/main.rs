//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use anyhow::Context;
use auth::middleware::AuthGate;
use auth::{AuthConfig, PgUserRepository, TokenService, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use judge::{AmqpConfig, AmqpPublisher, JudgeConfig, PgJudgeRepository, judge_router};
use platform::rate_limit::RateLimiter;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod health;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

const DEFAULT_PORT: u16 = 5000;

/// Shared secret from the environment, or a random one nobody knows
fn shared_secret(var: &str) -> String {
    match env::var(var) {
        Ok(secret) if !secret.is_empty() => secret,
        _ => {
            tracing::warn!(
                variable = var,
                "Shared secret not set, using a random value; logins depending on it will fail"
            );
            platform::crypto::random_secret(32)
        }
    }
}

fn env_flag(var: &str) -> bool {
    env::var(var)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn auth_config() -> anyhow::Result<AuthConfig> {
    let defaults = if cfg!(debug_assertions) {
        AuthConfig::development()
    } else {
        AuthConfig::default()
    };

    let signing_secret = match env::var("JWT_SIGNING_SECRET") {
        Ok(secret) if !secret.is_empty() => secret.into_bytes(),
        _ if !defaults.signing_secret.is_empty() => {
            tracing::warn!("JWT_SIGNING_SECRET not set, using a random development secret");
            defaults.signing_secret
        }
        _ => anyhow::bail!("JWT_SIGNING_SECRET must be set in production"),
    };

    let token_ttl = match env::var("JWT_TTL_SECS") {
        Ok(secs) => Some(Duration::from_secs(
            secs.parse().context("JWT_TTL_SECS must be a number of seconds")?,
        )),
        Err(_) => defaults.token_ttl,
    };

    Ok(AuthConfig {
        signing_secret,
        provider_secret: shared_secret("AUTH_PROVIDER_PASSWORD"),
        worker_secret: shared_secret("JUDGE_PASSWORD"),
        admin_emails: AuthConfig::parse_admin_emails(
            &env::var("ADMIN_EMAILS").unwrap_or_default(),
        ),
        token_ttl,
        auth_disabled: env_flag("AUTH_DISABLED"),
    })
}

fn amqp_config() -> anyhow::Result<AmqpConfig> {
    let defaults = if cfg!(debug_assertions) {
        AmqpConfig::development()
    } else {
        AmqpConfig::default()
    };
    let port = match env::var("RABBITMQ_PORT") {
        Ok(port) => port.parse().context("RABBITMQ_PORT must be a port number")?,
        Err(_) => defaults.port,
    };

    Ok(AmqpConfig {
        host: env::var("RABBITMQ_HOST").unwrap_or(defaults.host.clone()),
        port,
        user: env::var("RABBITMQ_USER").unwrap_or(defaults.user.clone()),
        password: env::var("RABBITMQ_PASSWORD").unwrap_or(defaults.password.clone()),
        ..defaults
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,judge=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Auth configuration
    let auth_config = Arc::new(auth_config()?);
    if auth_config.auth_disabled {
        tracing::warn!("AUTH_DISABLED is set: every guarded route accepts unauthenticated requests");
    }
    let tokens = Arc::new(TokenService::from_config(&auth_config));

    // Database connection
    let database_url =
        env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Broker connection, shared by every publish
    let amqp_config = amqp_config()?;
    let publisher = Arc::new(AmqpPublisher::connect(&amqp_config).await?);

    // Public scratch endpoint limiter
    let judge_config = Arc::new(if cfg!(debug_assertions) {
        JudgeConfig::development()
    } else {
        JudgeConfig::default()
    });
    let limiter = Arc::new(RateLimiter::new(judge_config.public_rate_limit.clone())?);
    limiter.spawn_sweeper();

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let gate = AuthGate::new(tokens.clone(), auth_config.auth_disabled);
    let app = Router::new()
        .merge(health::health_router(pool.clone()))
        .merge(auth_router(
            PgUserRepository::new(pool.clone()),
            tokens,
            auth_config,
        ))
        .merge(judge_router(
            PgJudgeRepository::new(pool),
            publisher.clone(),
            gate,
            limiter,
            judge_config,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port = match env::var("PORT") {
        Ok(port) => port.parse().context("PORT must be a port number")?,
        Err(_) => DEFAULT_PORT,
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    if let Err(e) = publisher.close().await {
        tracing::warn!(error = %e, "Broker connection did not close cleanly");
    }

    Ok(())
}
