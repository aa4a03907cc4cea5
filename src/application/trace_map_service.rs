//! Trace Map Service - Main application use case
//!
//! Runs the full path-resolution pipeline for one target: trace, extract
//! hops, resolve locations through the cache, persist the cache.

use crate::application::resolution_coordinator::{CoordinatorConfig, ResolutionCoordinator};
use crate::domain::entities::TracedPath;
use crate::domain::errors::PipelineError;
use crate::domain::ports::{
    CacheStore, GeoLocator, LocationCache, LocationCacheFactory, TraceRunner,
};
use crate::domain::services::HopExtractor;
use crate::domain::value_objects::FailurePolicy;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Trace map service - main application use case.
///
/// One call to [`TraceMapService::trace`] is one pipeline run:
/// 1. Run the trace command (fatal on failure)
/// 2. Extract hop addresses (fatal when there are none)
/// 3. Load the persisted cache and resolve all hops concurrently
/// 4. Save the cache (a failed save is only a warning)
/// 5. Fail if no hop could be located
pub struct TraceMapService {
    trace_runner: Arc<dyn TraceRunner>,
    cache_store: Arc<dyn CacheStore>,
    cache_factory: Arc<dyn LocationCacheFactory>,
    coordinator: ResolutionCoordinator,
}

impl TraceMapService {
    /// Create a new trace map service.
    pub fn new(
        trace_runner: Arc<dyn TraceRunner>,
        locator: Arc<dyn GeoLocator>,
        cache_store: Arc<dyn CacheStore>,
        cache_factory: Arc<dyn LocationCacheFactory>,
        config: CoordinatorConfig,
    ) -> Self {
        Self {
            trace_runner,
            cache_store,
            cache_factory,
            coordinator: ResolutionCoordinator::new(locator, config),
        }
    }

    fn remembers_failures(&self) -> bool {
        self.coordinator.config().failure_policy == FailurePolicy::Remember
    }

    /// Trace the route to `target` and locate its hops.
    pub async fn trace(&self, target: &str) -> Result<TracedPath, PipelineError> {
        tracing::info!("running traceroute to {}", target);
        let raw_output = self.trace_runner.run(target).await?;

        let hops = HopExtractor::extract(&raw_output);
        if hops.is_empty() {
            return Err(PipelineError::NoHops);
        }
        tracing::info!("extracted {} hop addresses", hops.len());

        let failures = if self.remembers_failures() {
            self.cache_store.load_failures()
        } else {
            BTreeSet::new()
        };
        let cache = self.cache_factory.create(self.cache_store.load(), failures);
        tracing::info!("fetching location data ({} cached locations)", cache.len());

        let records = self.coordinator.resolve_all(&hops, cache.clone()).await;
        self.persist(cache.as_ref());

        if records.is_empty() {
            return Err(PipelineError::AllResolutionsFailed { hops: hops.len() });
        }
        tracing::info!("located {} of {} hops", records.len(), hops.len());

        Ok(TracedPath {
            target: target.to_string(),
            hops_found: hops.len(),
            records,
        })
    }

    /// Write the cache back. Losing it only costs future lookups.
    fn persist(&self, cache: &dyn LocationCache) {
        if let Err(e) = self.cache_store.save(&cache.entries()) {
            tracing::warn!("failed to save location cache: {}", e);
        }

        if self.remembers_failures() {
            if let Err(e) = self.cache_store.save_failures(&cache.failures()) {
                tracing::warn!("failed to save failed-lookup list: {}", e);
            }
        }
    }
}
