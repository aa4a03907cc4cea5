mod command_trace_runner;
mod dashmap_location_cache;
mod ip_api_geo_locator;
mod json_cache_store;

pub use command_trace_runner::{CommandTraceRunner, TraceCommand};
pub use dashmap_location_cache::{DashMapLocationCache, DashMapLocationCacheFactory};
pub use ip_api_geo_locator::{IpApiGeoLocator, DEFAULT_API_URL, DEFAULT_LOOKUP_TIMEOUT};
pub use json_cache_store::{JsonCacheStore, DEFAULT_CACHE_PATH};
