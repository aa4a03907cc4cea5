//! Domain Entities - Core business objects
//!
//! These entities represent the hops of a traced path and the locations
//! attached to them. They have no external dependencies.

use crate::domain::errors::ResolutionFailure;
use crate::domain::value_objects::Coordinates;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// An IPv4 address, as text, observed along a traced path.
///
/// Identity is the string itself. No octet range validation is performed;
/// the address is whatever the trace tool printed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HopAddress(String);

impl HopAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for HopAddress {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for HopAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Hop addresses in path order, without repeats.
///
/// Inserting an address that is already present keeps the first position,
/// so routing loops and repeated probes collapse to one logical hop.
#[derive(Debug, Clone, Default)]
pub struct HopPath {
    hops: Vec<HopAddress>,
    seen: HashSet<HopAddress>,
}

impl HopPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hop. Returns false if the address was already on the path.
    pub fn push(&mut self, address: HopAddress) -> bool {
        if self.seen.insert(address.clone()) {
            self.hops.push(address);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HopAddress> {
        self.hops.iter()
    }
}

impl FromIterator<HopAddress> for HopPath {
    fn from_iter<I: IntoIterator<Item = HopAddress>>(iter: I) -> Self {
        let mut path = HopPath::new();
        for address in iter {
            path.push(address);
        }
        path
    }
}

impl<'a> IntoIterator for &'a HopPath {
    type Item = &'a HopAddress;
    type IntoIter = std::slice::Iter<'a, HopAddress>;

    fn into_iter(self) -> Self::IntoIter {
        self.hops.iter()
    }
}

/// A hop that was successfully located.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationRecord {
    pub address: HopAddress,
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationRecord {
    pub fn new(address: HopAddress, coordinates: Coordinates) -> Self {
        Self {
            address,
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Result of resolving a single hop.
#[derive(Debug, Clone, PartialEq)]
pub enum HopOutcome {
    Resolved(LocationRecord),
    Failed {
        address: HopAddress,
        reason: ResolutionFailure,
    },
}

impl HopOutcome {
    pub fn into_record(self) -> Option<LocationRecord> {
        match self {
            Self::Resolved(record) => Some(record),
            Self::Failed { .. } => None,
        }
    }
}

/// The located path to a target, in hop order.
#[derive(Debug, Clone, Serialize)]
pub struct TracedPath {
    pub target: String,
    /// Number of distinct hop addresses found in the trace output.
    pub hops_found: usize,
    pub records: Vec<LocationRecord>,
}
