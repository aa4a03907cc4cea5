//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic coordinates of a hop.
///
/// Persisted as a two-element `[latitude, longitude]` array, which is the
/// shape of every entry in the cache file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(c: Coordinates) -> Self {
        [c.latitude, c.longitude]
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

/// What to do with addresses whose lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Never remember failures; every run tries again.
    #[default]
    Retry,
    /// Persist failed addresses and skip them on later runs.
    Remember,
}

impl FailurePolicy {
    pub fn from_flag(remember: bool) -> Self {
        if remember {
            Self::Remember
        } else {
            Self::Retry
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retry => "retry",
            Self::Remember => "remember",
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_serialize_as_pair() {
        let c = Coordinates::new(37.386, -122.0838);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "[37.386,-122.0838]");
    }

    #[test]
    fn test_coordinates_deserialize_from_pair() {
        let c: Coordinates = serde_json::from_str("[48.8566, 2.3522]").unwrap();
        assert_eq!(c.latitude, 48.8566);
        assert_eq!(c.longitude, 2.3522);
    }

    #[test]
    fn test_coordinates_reject_wrong_arity() {
        assert!(serde_json::from_str::<Coordinates>("[1.0]").is_err());
        assert!(serde_json::from_str::<Coordinates>("[1.0, 2.0, 3.0]").is_err());
        assert!(serde_json::from_str::<Coordinates>(r#"{"lat": 1.0}"#).is_err());
    }

    #[test]
    fn test_coordinates_display() {
        let c = Coordinates::new(-33.8688, 151.2093);
        assert_eq!(c.to_string(), "(-33.8688, 151.2093)");
    }

    #[test]
    fn test_failure_policy_default_is_retry() {
        assert_eq!(FailurePolicy::default(), FailurePolicy::Retry);
    }

    #[test]
    fn test_failure_policy_from_flag() {
        assert_eq!(FailurePolicy::from_flag(true), FailurePolicy::Remember);
        assert_eq!(FailurePolicy::from_flag(false), FailurePolicy::Retry);
    }

    #[test]
    fn test_failure_policy_display() {
        assert_eq!(FailurePolicy::Retry.to_string(), "retry");
        assert_eq!(FailurePolicy::Remember.to_string(), "remember");
    }
}
