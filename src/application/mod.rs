//! Application Layer
//!
//! Use cases that wire domain services to ports.

pub mod resolution_coordinator;
pub mod trace_map_service;

pub use resolution_coordinator::{CoordinatorConfig, ResolutionCoordinator, DEFAULT_MAX_CONCURRENCY};
pub use trace_map_service::TraceMapService;
