//! Adapters Layer
//!
//! Inbound adapters (command line, report rendering) and outbound adapters
//! (trace process, geolocation HTTP API, cache storage).

pub mod inbound;
pub mod outbound;
