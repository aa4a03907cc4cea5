//! Location Cache Port
//!
//! In-memory view of known locations, shared by concurrent resolution tasks.

use crate::domain::entities::HopAddress;
use crate::domain::ports::CacheEntries;
use crate::domain::value_objects::Coordinates;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Concurrency-safe address to coordinates mapping for one pipeline run.
///
/// Every entry is a confirmed successful lookup. Failed addresses are kept in
/// a separate set and only consulted when failures are remembered.
pub trait LocationCache: Send + Sync {
    /// Get the cached coordinates for an address.
    fn get(&self, address: &HopAddress) -> Option<Coordinates>;

    /// Record a successful lookup. Clears any failure mark for the address.
    fn insert(&self, address: HopAddress, coordinates: Coordinates);

    /// Whether the address failed on an earlier lookup.
    fn is_known_failure(&self, address: &HopAddress) -> bool;

    /// Mark an address as failed.
    fn record_failure(&self, address: HopAddress);

    /// Copy of all successful entries, ready to persist.
    fn entries(&self) -> CacheEntries;

    /// Copy of all failure marks, ready to persist.
    fn failures(&self) -> BTreeSet<HopAddress>;

    /// Number of successful entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builds the location cache for one pipeline run from persisted state.
pub trait LocationCacheFactory: Send + Sync {
    fn create(
        &self,
        entries: CacheEntries,
        failures: BTreeSet<HopAddress>,
    ) -> Arc<dyn LocationCache>;
}
