//! Rate Limiter
//!
//! Token bucket throttling for outbound geolocation lookups.

use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// Rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window
    pub max_requests: u64,
    /// Time window for rate limiting
    pub window: Duration,
    /// Maximum burst size (token bucket capacity)
    pub burst_size: u64,
}

impl RateLimitConfig {
    /// `n` requests per minute, all of which may be spent in one burst.
    pub fn per_minute(n: u64) -> Self {
        Self {
            max_requests: n,
            window: Duration::from_secs(60),
            burst_size: n,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        // ip-api.com free tier
        Self::per_minute(45)
    }
}

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq)]
pub enum RateLimitResult {
    /// Request is allowed
    Allowed { remaining: u64 },
    /// Request is rate limited
    Limited { retry_after_ms: u64 },
}

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Token bucket rate limiter.
///
/// One bucket shared by every lookup task of a run. Tokens refill
/// continuously at `max_requests / window`.
pub struct RateLimiter {
    config: RateLimitConfig,
    bucket: Mutex<Bucket>,
    /// Tokens added per millisecond
    refill_rate_per_ms: f64,
}

impl RateLimiter {
    /// Create a new rate limiter with a full bucket.
    pub fn new(config: RateLimitConfig) -> Self {
        let window_ms = config.window.as_millis().max(1) as f64;
        let refill_rate_per_ms = config.max_requests as f64 / window_ms;
        Self {
            bucket: Mutex::new(Bucket {
                tokens: config.burst_size as f64,
                last_refill: Instant::now(),
            }),
            config,
            refill_rate_per_ms,
        }
    }

    /// Try to take one token without waiting.
    pub fn check(&self) -> RateLimitResult {
        let mut bucket = self.bucket.lock();

        let now = Instant::now();
        let elapsed_ms = now.duration_since(bucket.last_refill).as_secs_f64() * 1000.0;
        bucket.tokens =
            (bucket.tokens + elapsed_ms * self.refill_rate_per_ms).min(self.config.burst_size as f64);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            return RateLimitResult::Allowed {
                remaining: bucket.tokens as u64,
            };
        }

        let retry_after_ms = if self.refill_rate_per_ms > 0.0 {
            ((1.0 - bucket.tokens) / self.refill_rate_per_ms).ceil() as u64
        } else {
            // never refills
            u64::MAX
        };
        RateLimitResult::Limited {
            retry_after_ms: retry_after_ms.max(1),
        }
    }

    /// Wait until a token is available and take it. Returns the whole
    /// tokens left afterwards.
    pub async fn acquire(&self) -> u64 {
        loop {
            match self.check() {
                RateLimitResult::Allowed { remaining } => return remaining,
                RateLimitResult::Limited { retry_after_ms } => {
                    tracing::debug!("lookup rate limited, waiting {}ms", retry_after_ms);
                    tokio::time::sleep(Duration::from_millis(retry_after_ms)).await;
                }
            }
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}
