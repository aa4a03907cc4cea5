//! DashMap Location Cache
//!
//! Implements LocationCache using DashMap for lock-free concurrent access.

use crate::domain::entities::HopAddress;
use crate::domain::ports::{CacheEntries, LocationCache, LocationCacheFactory};
use crate::domain::value_objects::Coordinates;
use dashmap::{DashMap, DashSet};
use std::collections::BTreeSet;
use std::sync::Arc;

/// DashMap-backed location cache.
///
/// Seeded from the persisted cache when a run starts and shared by all
/// resolution tasks. Each insert locks a single shard, so concurrent writers
/// for different addresses never lose each other's entries.
pub struct DashMapLocationCache {
    entries: DashMap<HopAddress, Coordinates>,
    failures: DashSet<HopAddress>,
}

impl DashMapLocationCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            failures: DashSet::new(),
        }
    }

    /// Create a cache holding previously persisted state.
    pub fn seeded(entries: CacheEntries, failures: BTreeSet<HopAddress>) -> Self {
        let cache = Self::new();
        for (address, coordinates) in entries {
            cache.entries.insert(address, coordinates);
        }
        for address in failures {
            if !cache.entries.contains_key(&address) {
                cache.failures.insert(address);
            }
        }
        cache
    }
}

impl Default for DashMapLocationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationCache for DashMapLocationCache {
    fn get(&self, address: &HopAddress) -> Option<Coordinates> {
        self.entries.get(address).map(|e| *e.value())
    }

    fn insert(&self, address: HopAddress, coordinates: Coordinates) {
        self.failures.remove(&address);
        self.entries.insert(address, coordinates);
    }

    fn is_known_failure(&self, address: &HopAddress) -> bool {
        self.failures.contains(address)
    }

    fn record_failure(&self, address: HopAddress) {
        if !self.entries.contains_key(&address) {
            self.failures.insert(address);
        }
    }

    fn entries(&self) -> CacheEntries {
        self.entries
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect()
    }

    fn failures(&self) -> BTreeSet<HopAddress> {
        self.failures.iter().map(|a| a.key().clone()).collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Builds a fresh [`DashMapLocationCache`] for every run.
#[derive(Debug, Clone, Copy, Default)]
pub struct DashMapLocationCacheFactory;

impl LocationCacheFactory for DashMapLocationCacheFactory {
    fn create(
        &self,
        entries: CacheEntries,
        failures: BTreeSet<HopAddress>,
    ) -> Arc<dyn LocationCache> {
        Arc::new(DashMapLocationCache::seeded(entries, failures))
    }
}
