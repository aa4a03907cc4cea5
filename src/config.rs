use crate::adapters::outbound::{TraceCommand, DEFAULT_API_URL, DEFAULT_CACHE_PATH};
use crate::application::{CoordinatorConfig, DEFAULT_MAX_CONCURRENCY};
use crate::domain::value_objects::FailurePolicy;
use crate::infrastructure::RateLimitConfig;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    // Cache settings
    pub cache_path: PathBuf,
    pub remember_failures: bool,

    // Geolocation service settings
    pub geo_api_url: String,
    pub lookup_timeout_secs: u64,
    pub max_concurrency: usize,
    pub rate_limit_per_min: u64,

    // Trace settings
    pub trace_program: Option<String>,

    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
            remember_failures: false,
            geo_api_url: DEFAULT_API_URL.to_string(),
            lookup_timeout_secs: 5,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            rate_limit_per_min: 45,
            trace_program: None,
            debug: false,
        }
    }
}

impl Config {
    /// Build a config from a variable lookup, falling back to defaults for
    /// missing or unparsable values.
    pub fn from_lookup<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let flag = |key: &str| {
            var(key)
                .map(|v| v == "1" || v.to_lowercase() == "true")
                .unwrap_or(false)
        };

        let cache_path = var("TRACEMAP_CACHE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.cache_path);

        let remember_failures = flag("TRACEMAP_REMEMBER_FAILURES");

        let geo_api_url = var("TRACEMAP_GEO_API_URL").unwrap_or(defaults.geo_api_url);

        let lookup_timeout_secs = var("TRACEMAP_LOOKUP_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(defaults.lookup_timeout_secs);

        let max_concurrency = var("TRACEMAP_MAX_CONCURRENCY")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_concurrency)
            .max(1);

        let rate_limit_per_min = var("TRACEMAP_RATE_LIMIT_PER_MIN")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.rate_limit_per_min);

        let trace_program = var("TRACEMAP_TRACE_PROGRAM").filter(|p| !p.trim().is_empty());

        let debug = var("DEBUG").is_some();

        Self {
            cache_path,
            remember_failures,
            geo_api_url,
            lookup_timeout_secs,
            max_concurrency,
            rate_limit_per_min,
            trace_program,
            debug,
        }
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }

    /// Outbound throttling, or `None` when disabled.
    pub fn rate_limit(&self) -> Option<RateLimitConfig> {
        (self.rate_limit_per_min > 0).then(|| RateLimitConfig::per_minute(self.rate_limit_per_min))
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::from_flag(self.remember_failures)
    }

    pub fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            max_concurrency: self.max_concurrency,
            failure_policy: self.failure_policy(),
        }
    }

    pub fn trace_command(&self) -> TraceCommand {
        match &self.trace_program {
            Some(program) => TraceCommand::Custom(program.clone()),
            None => TraceCommand::for_current_platform(),
        }
    }
}

pub fn load_config() -> anyhow::Result<Config> {
    Ok(Config::from_lookup(|key| std::env::var(key).ok()))
}
