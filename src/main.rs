//! tracemap - traceroute with per-hop geolocation
//!
//! This is the composition root that wires together all the components.

use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracemap::adapters::inbound::{prompt_target, render, Cli};
use tracemap::adapters::outbound::{
    CommandTraceRunner, DashMapLocationCacheFactory, IpApiGeoLocator, JsonCacheStore,
};
use tracemap::infrastructure::RateLimiter;
use tracemap::{load_config, TraceMapService};
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration from environment, then apply CLI overrides
    let mut cfg = load_config()?;
    cli.apply(&mut cfg);

    // Setup logging (stderr, so stdout carries only the report)
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();

    let target = match &cli.target {
        Some(target) => target.clone(),
        None => prompt_target(std::io::stdin().lock(), std::io::stdout())?,
    };

    tracing::debug!(
        "cache={} api={} concurrency={} failures={}",
        cfg.cache_path.display(),
        cfg.geo_api_url,
        cfg.max_concurrency,
        cfg.failure_policy()
    );

    // ===== COMPOSITION ROOT =====

    let trace_runner = Arc::new(CommandTraceRunner::new(cfg.trace_command()));

    let mut locator = IpApiGeoLocator::new(cfg.geo_api_url.clone(), cfg.lookup_timeout())?;
    if let Some(limit) = cfg.rate_limit() {
        locator = locator.with_rate_limiter(Arc::new(RateLimiter::new(limit)));
    }

    let cache_store = Arc::new(JsonCacheStore::new(cfg.cache_path.clone()));

    let service = TraceMapService::new(
        trace_runner,
        Arc::new(locator),
        cache_store,
        Arc::new(DashMapLocationCacheFactory),
        cfg.coordinator_config(),
    );

    match service.trace(&target).await {
        Ok(path) => {
            let report = render(&path, cli.format)?;
            match &cli.output {
                Some(file) => {
                    std::fs::write(file, report)?;
                    tracing::info!("report written to {}", file.display());
                }
                None => print!("{}", report),
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::error!("{}", e);
            Ok(ExitCode::from(e.exit_code()))
        }
    }
}
