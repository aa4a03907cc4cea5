//! Infrastructure Layer
//!
//! Cross-cutting concerns and infrastructure components.

pub mod rate_limiter;

pub use rate_limiter::{RateLimitConfig, RateLimitResult, RateLimiter};
