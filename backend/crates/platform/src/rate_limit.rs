//! Rate Limiting Infrastructure
//!
//! In-memory per-client token buckets.
//!
//! ## Locking
//! The client table sits behind a `RwLock`; each bucket has its own `Mutex`.
//! Admission for a known client takes the table lock shared plus that
//! client's bucket lock. Only first contact and the idle sweep take the
//! table lock exclusively, and the sweep never blocks on a bucket lock.
//!
//! The sweep may drop an entry after a request cloned its handle but before
//! it locked the bucket. Admission therefore re-checks, with the bucket
//! locked, that the handle is still the table's entry, and starts over with
//! a fresh lookup if it is not. Once a request holds the bucket lock the
//! sweep can no longer remove that entry.
//!
//! Time comes from `tokio::time::Instant`, so tests can drive the clock with
//! a paused runtime.

use std::collections::HashMap;
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, TryLockError,
};
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Bucket size (burst)
    pub capacity: u32,
    /// One token is added per interval
    pub refill_interval: Duration,
    /// How often idle clients are swept
    pub sweep_interval: Duration,
    /// Clients not seen for longer than this are forgotten
    pub idle_ttl: Duration,
}

impl Default for RateLimitConfig {
    /// Burst of 2, five requests per minute sustained
    fn default() -> Self {
        Self {
            capacity: 2,
            refill_interval: Duration::from_secs(12),
            sweep_interval: Duration::from_secs(5 * 60),
            idle_ttl: Duration::from_secs(10 * 60),
        }
    }
}

impl RateLimitConfig {
    /// `requests` per minute sustained with the given burst
    pub fn per_minute(requests: u32, burst: u32) -> Self {
        Self {
            capacity: burst,
            refill_interval: Duration::from_secs(60) / requests.max(1),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), RateLimitConfigError> {
        if self.capacity == 0 {
            return Err(RateLimitConfigError::ZeroCapacity);
        }
        if self.refill_interval.is_zero() {
            return Err(RateLimitConfigError::ZeroRefillInterval);
        }
        if self.sweep_interval.is_zero() {
            return Err(RateLimitConfigError::ZeroSweepInterval);
        }
        if self.idle_ttl <= self.sweep_interval {
            return Err(RateLimitConfigError::IdleTtlTooShort {
                idle_ttl: self.idle_ttl,
                sweep_interval: self.sweep_interval,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateLimitConfigError {
    #[error("rate limit capacity must be at least 1")]
    ZeroCapacity,

    #[error("rate limit refill interval must be non-zero")]
    ZeroRefillInterval,

    #[error("rate limit sweep interval must be non-zero")]
    ZeroSweepInterval,

    #[error("idle threshold {idle_ttl:?} must exceed the sweep interval {sweep_interval:?}")]
    IdleTtlTooShort {
        idle_ttl: Duration,
        sweep_interval: Duration,
    },
}

// ============================================================================
// Token bucket
// ============================================================================

/// Integer token bucket
///
/// Refill is computed lazily from elapsed time on each take. While the bucket
/// is full the refill clock is pinned to "now", so idle time never banks
/// tokens beyond capacity.
#[derive(Debug, Clone)]
pub struct TokenBucket {
    capacity: u32,
    refill_interval: Duration,
    tokens: u32,
    last_refill: Instant,
}

impl TokenBucket {
    /// A full bucket
    pub fn full(capacity: u32, refill_interval: Duration, now: Instant) -> Self {
        Self {
            capacity,
            refill_interval,
            tokens: capacity,
            last_refill: now,
        }
    }

    pub fn tokens(&self) -> u32 {
        self.tokens
    }

    fn refill(&mut self, now: Instant) {
        if self.tokens >= self.capacity {
            self.last_refill = now;
            return;
        }

        let elapsed = now.saturating_duration_since(self.last_refill).as_nanos();
        let gained = elapsed / self.refill_interval.as_nanos().max(1);
        if gained == 0 {
            return;
        }

        let missing = self.capacity - self.tokens;
        if gained >= u128::from(missing) {
            self.tokens = self.capacity;
            self.last_refill = now;
        } else {
            // gained < missing <= u32::MAX
            let gained = gained as u32;
            self.tokens += gained;
            self.last_refill += self.refill_interval * gained;
        }
    }

    /// Take one token if available
    pub fn try_take(&mut self, now: Instant) -> bool {
        self.refill(now);
        if self.tokens == 0 {
            return false;
        }
        self.tokens -= 1;
        true
    }
}

// ============================================================================
// Per-client limiter
// ============================================================================

#[derive(Debug)]
struct ClientEntry {
    bucket: TokenBucket,
    last_seen: Instant,
}

/// Per-client token-bucket limiter with idle eviction
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    clients: RwLock<HashMap<String, Arc<Mutex<ClientEntry>>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Result<Self, RateLimitConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            clients: RwLock::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Try to admit one request from `client`
    pub fn allow(&self, client: &str) -> bool {
        let now = Instant::now();
        loop {
            let entry = self.entry(client, now);
            if let Some(admitted) = self.take(client, &entry, now) {
                return admitted;
            }
        }
    }

    /// Take a token from `entry`; `None` if the sweep already dropped it
    fn take(&self, client: &str, entry: &Arc<Mutex<ClientEntry>>, now: Instant) -> Option<bool> {
        let mut guard = lock(entry);
        let current = read(&self.clients)
            .get(client)
            .is_some_and(|tracked| Arc::ptr_eq(tracked, entry));
        if !current {
            return None;
        }
        guard.last_seen = now;
        Some(guard.bucket.try_take(now))
    }

    fn entry(&self, client: &str, now: Instant) -> Arc<Mutex<ClientEntry>> {
        let existing = read(&self.clients).get(client).cloned();
        if let Some(entry) = existing {
            return entry;
        }

        let mut clients = write(&self.clients);
        let entry = clients.entry(client.to_owned()).or_insert_with(|| {
            Arc::new(Mutex::new(ClientEntry {
                bucket: TokenBucket::full(self.config.capacity, self.config.refill_interval, now),
                last_seen: now,
            }))
        });
        Arc::clone(entry)
    }

    /// Drop clients idle for longer than `idle_ttl`; returns how many
    ///
    /// A bucket that is locked right now is in use and therefore kept.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let idle_ttl = self.config.idle_ttl;
        let is_fresh =
            |entry: &ClientEntry| now.saturating_duration_since(entry.last_seen) <= idle_ttl;

        let mut clients = write(&self.clients);
        let before = clients.len();
        clients.retain(|_, entry| match entry.try_lock() {
            Ok(entry) => is_fresh(&*entry),
            Err(TryLockError::WouldBlock) => true,
            Err(TryLockError::Poisoned(poisoned)) => is_fresh(&*poisoned.into_inner()),
        });
        before - clients.len()
    }

    /// Number of tracked clients
    pub fn len(&self) -> usize {
        read(&self.clients).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run [`sweep`](Self::sweep) every `sweep_interval` on the runtime
    ///
    /// The task holds only a weak reference and exits once the limiter is
    /// dropped.
    pub fn spawn_sweeper(self: &Arc<Self>) -> JoinHandle<()> {
        let limiter = Arc::downgrade(self);
        let period = self.config.sweep_interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let Some(limiter) = limiter.upgrade() else {
                    break;
                };
                let removed = limiter.sweep();
                if removed > 0 {
                    tracing::debug!(
                        removed = removed,
                        remaining = limiter.len(),
                        "Swept idle rate-limit clients"
                    );
                }
            }
        })
    }
}

// A panic while holding a guard leaves plain counters behind; keep serving.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
