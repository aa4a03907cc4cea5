//! Cache Store Port
//!
//! Durable storage for the location cache between runs.

use crate::domain::entities::HopAddress;
use crate::domain::errors::CacheError;
use crate::domain::value_objects::Coordinates;
use std::collections::{BTreeMap, BTreeSet};

/// Persisted cache content: address to `[latitude, longitude]`.
pub type CacheEntries = BTreeMap<HopAddress, Coordinates>;

/// Whole-state load and save of the location cache.
///
/// Loaded once when a run starts and written once when it ends. There is no
/// incremental persistence.
pub trait CacheStore: Send + Sync {
    /// Load every persisted entry. Missing storage yields an empty mapping.
    fn load(&self) -> CacheEntries;

    /// Replace the persisted state with `entries`.
    fn save(&self, entries: &CacheEntries) -> Result<(), CacheError>;

    /// Load addresses that failed on earlier runs.
    fn load_failures(&self) -> BTreeSet<HopAddress> {
        BTreeSet::new()
    }

    /// Replace the persisted failure marks.
    fn save_failures(&self, _failures: &BTreeSet<HopAddress>) -> Result<(), CacheError> {
        Ok(())
    }
}
