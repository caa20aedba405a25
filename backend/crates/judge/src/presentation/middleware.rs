//! Rate Limit Middleware
//!
//! Per-client admission for the unauthenticated scratch endpoint.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use http::{HeaderMap, header};
use platform::client::client_key;
use platform::rate_limit::RateLimiter;

use crate::error::JudgeError;

const X_BENCHMARK: &str = "x-benchmark";

/// Load-test traffic skips the limiter
///
/// A benchmark request whose `Referer` does not mention `bench` is still let
/// through, but logged.
pub fn is_benchmark_request(headers: &HeaderMap) -> bool {
    let flagged = headers
        .get(X_BENCHMARK)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "true");
    if !flagged {
        return false;
    }

    if let Some(referer) = headers.get(header::REFERER).and_then(|v| v.to_str().ok()) {
        if !is_benchmark_referer(referer) {
            tracing::warn!(referer = %referer, "Benchmark header from unexpected referer");
        }
    }
    true
}

fn is_benchmark_referer(referer: &str) -> bool {
    referer.to_ascii_lowercase().contains("bench")
}

/// Reject the request with 429 when the client's bucket is empty
pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request,
    next: Next,
) -> Result<Response, JudgeError> {
    if is_benchmark_request(req.headers()) {
        return Ok(next.run(req).await);
    }

    let direct_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let client = client_key(req.headers(), direct_ip);

    if !limiter.allow(&client) {
        tracing::warn!(client = %client, path = %req.uri().path(), "Rate limit exceeded");
        return Err(JudgeError::RateLimited);
    }

    Ok(next.run(req).await)
}
