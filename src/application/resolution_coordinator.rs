//! Resolution Coordinator
//!
//! Resolves every hop of a path to a location with bounded parallelism,
//! layering the shared location cache over the remote locator.

use crate::domain::entities::{HopAddress, HopOutcome, HopPath, LocationRecord};
use crate::domain::errors::ResolutionFailure;
use crate::domain::ports::{GeoLocator, LocationCache};
use crate::domain::value_objects::FailurePolicy;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Maximum number of remote lookups in flight at once.
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

/// Coordinator configuration.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Cap on concurrent remote lookups (at least 1)
    pub max_concurrency: usize,
    /// Whether failed addresses are remembered and skipped
    pub failure_policy: FailurePolicy,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            failure_policy: FailurePolicy::Retry,
        }
    }
}

/// Fans hop lookups out over a bounded set of tasks.
///
/// For each hop, in path order:
/// 1. A cache hit resolves immediately, without a permit or a remote call.
/// 2. With `FailurePolicy::Remember`, a hop marked failed is skipped.
/// 3. Otherwise a task waits for one of `max_concurrency` permits and asks
///    the locator. Successes go into the cache. Failures are only marked
///    when they are remembered and the service definitively rejected the
///    address.
///
/// Every task carries the index of its hop and results are written into an
/// index-ordered buffer, so the output follows the path regardless of which
/// lookups finish first.
pub struct ResolutionCoordinator {
    locator: Arc<dyn GeoLocator>,
    config: CoordinatorConfig,
}

impl ResolutionCoordinator {
    pub fn new(locator: Arc<dyn GeoLocator>, config: CoordinatorConfig) -> Self {
        let config = CoordinatorConfig {
            max_concurrency: config.max_concurrency.max(1),
            ..config
        };
        Self { locator, config }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Resolve every hop and return one outcome per hop, in path order.
    pub async fn resolve_outcomes(
        &self,
        hops: &HopPath,
        cache: Arc<dyn LocationCache>,
    ) -> Vec<HopOutcome> {
        let remember = self.config.failure_policy == FailurePolicy::Remember;
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency));
        let mut slots: Vec<Option<HopOutcome>> = vec![None; hops.len()];
        let mut tasks = JoinSet::new();

        for (index, address) in hops.iter().enumerate() {
            if let Some(coordinates) = cache.get(address) {
                tracing::debug!("cache hit for {}", address);
                slots[index] = Some(HopOutcome::Resolved(LocationRecord::new(
                    address.clone(),
                    coordinates,
                )));
                continue;
            }

            if remember && cache.is_known_failure(address) {
                tracing::debug!("skipping {}: failed on an earlier run", address);
                slots[index] = Some(HopOutcome::Failed {
                    address: address.clone(),
                    reason: ResolutionFailure::PreviouslyFailed,
                });
                continue;
            }

            let semaphore = semaphore.clone();
            let locator = self.locator.clone();
            let cache = cache.clone();
            let address = address.clone();

            tasks.spawn(async move {
                let outcome = match semaphore.acquire_owned().await {
                    Ok(_permit) => {
                        Self::lookup(locator.as_ref(), cache.as_ref(), address, remember).await
                    }
                    Err(_) => HopOutcome::Failed {
                        address,
                        reason: ResolutionFailure::Transport("lookup pool closed".to_string()),
                    },
                };
                (index, outcome)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(e) => tracing::error!("resolution task failed: {}", e),
            }
        }

        slots
            .into_iter()
            .zip(hops.iter())
            .map(|(slot, address)| {
                slot.unwrap_or_else(|| HopOutcome::Failed {
                    address: address.clone(),
                    reason: ResolutionFailure::Transport("lookup task aborted".to_string()),
                })
            })
            .collect()
    }

    /// Resolve every hop and keep only the located ones, in path order.
    pub async fn resolve_all(
        &self,
        hops: &HopPath,
        cache: Arc<dyn LocationCache>,
    ) -> Vec<LocationRecord> {
        self.resolve_outcomes(hops, cache)
            .await
            .into_iter()
            .filter_map(|outcome| {
                if let HopOutcome::Failed { address, reason } = &outcome {
                    tracing::debug!("dropping hop {}: {}", address, reason);
                }
                outcome.into_record()
            })
            .collect()
    }

    async fn lookup(
        locator: &dyn GeoLocator,
        cache: &dyn LocationCache,
        address: HopAddress,
        remember: bool,
    ) -> HopOutcome {
        match locator.locate(&address).await {
            Ok(coordinates) => {
                tracing::debug!("located {} at {}", address, coordinates);
                cache.insert(address.clone(), coordinates);
                HopOutcome::Resolved(LocationRecord::new(address, coordinates))
            }
            Err(reason) => {
                if remember && reason.is_definitive() {
                    cache.record_failure(address.clone());
                }
                HopOutcome::Failed { address, reason }
            }
        }
    }
}
