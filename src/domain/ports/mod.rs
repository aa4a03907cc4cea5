mod cache_store;
mod geo_locator;
mod location_cache;
mod trace_runner;

pub use cache_store::{CacheEntries, CacheStore};
pub use geo_locator::GeoLocator;
pub use location_cache::{LocationCache, LocationCacheFactory};
pub use trace_runner::TraceRunner;
