//! Geo Locator Port
//!
//! Defines the interface for looking up the location of a hop address.

use crate::domain::entities::HopAddress;
use crate::domain::errors::ResolutionFailure;
use crate::domain::value_objects::Coordinates;
use async_trait::async_trait;

/// Remote lookup of an address's approximate coordinates.
///
/// This is an outbound port. Implementations make a single attempt per call
/// and know nothing about caching; the coordinator layers the cache on top.
#[async_trait]
pub trait GeoLocator: Send + Sync {
    /// Look up one address.
    ///
    /// Any transport error, timeout, unexpected status or malformed body is
    /// reported as a `ResolutionFailure`.
    async fn locate(&self, address: &HopAddress) -> Result<Coordinates, ResolutionFailure>;
}
