//! tracemap Library
//!
//! Discovers the network path to a host and attaches a geographic location
//! to every hop. Exposed as a library for the binary and integration tests.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use application::{CoordinatorConfig, ResolutionCoordinator, TraceMapService};
pub use config::{load_config, Config};
pub use domain::entities::{HopAddress, HopOutcome, HopPath, LocationRecord, TracedPath};
pub use domain::errors::{CacheError, PipelineError, ResolutionFailure, TraceError};
pub use domain::ports::{
    CacheEntries, CacheStore, GeoLocator, LocationCache, LocationCacheFactory, TraceRunner,
};
pub use domain::services::HopExtractor;
pub use domain::value_objects::{Coordinates, FailurePolicy};
