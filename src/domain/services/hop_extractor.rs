//! Hop Extractor - Domain Service
//!
//! Pulls hop addresses out of raw trace command output.

use crate::domain::entities::{HopAddress, HopPath};
use regex::Regex;
use std::sync::OnceLock;

/// Four 1-3 digit groups separated by dots, on word boundaries.
///
/// Matching is purely lexical; octets are not range checked.
const IPV4_PATTERN: &str = r"\b(?:\d{1,3}\.){3}\d{1,3}\b";

fn ipv4_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(IPV4_PATTERN).expect("IPv4 pattern is valid"))
}

/// Hop extraction service.
///
/// Stateless. Works the same on `traceroute` and `tracert` output since both
/// print dotted-quad addresses.
pub struct HopExtractor;

impl HopExtractor {
    /// Extract hop addresses in order of first appearance.
    ///
    /// Repeated addresses keep their first position. Input without any
    /// dotted-quad text yields an empty path.
    pub fn extract(raw_output: &str) -> HopPath {
        ipv4_regex()
            .find_iter(raw_output)
            .map(|m| HopAddress::new(m.as_str()))
            .collect()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn extract(raw: &str) -> Vec<String> {
        HopExtractor::extract(raw)
            .iter()
            .map(|a| a.as_str().to_string())
            .collect()
    }

    #[test]
    fn test_extract_dedups_preserving_first_order() {
        let raw = "1 10.0.0.1\n2 10.0.0.1\n3 8.8.8.8";
        assert_eq!(extract(raw), vec!["10.0.0.1", "8.8.8.8"]);
    }

    #[test]
    fn test_extract_no_match_is_empty() {
        assert!(HopExtractor::extract("").is_empty());
        assert!(HopExtractor::extract("traceroute: unknown host nowhere.invalid").is_empty());
        assert!(HopExtractor::extract(" 1  * * *\n 2  * * *").is_empty());
    }

    #[test]
    fn test_extract_linux_traceroute_output() {
        let raw = "\
traceroute to google.com (142.250.185.78), 30 hops max, 60 byte packets
 1  _gateway (192.168.1.1)  1.123 ms  1.034 ms  0.998 ms
 2  100.64.0.1 (100.64.0.1)  8.551 ms  8.540 ms  8.531 ms
 3  * * *
 4  core1.fra.example.net (80.81.192.10)  12.101 ms 80.81.192.11  12.380 ms  12.095 ms
 5  142.250.185.78 (142.250.185.78)  13.004 ms  12.990 ms  12.871 ms
";
        assert_eq!(
            extract(raw),
            vec![
                "142.250.185.78",
                "192.168.1.1",
                "100.64.0.1",
                "80.81.192.10",
                "80.81.192.11",
            ]
        );
    }

    #[test]
    fn test_extract_windows_tracert_output() {
        let raw = "\
Tracing route to one.one.one.one [1.1.1.1]
over a maximum of 30 hops:

  1    <1 ms    <1 ms    <1 ms  192.168.0.1
  2     9 ms     8 ms     9 ms  10.20.0.1
  3     *        *        *     Request timed out.
  4    11 ms    10 ms    11 ms  one.one.one.one [1.1.1.1]

Trace complete.
";
        assert_eq!(extract(raw), vec!["1.1.1.1", "192.168.0.1", "10.20.0.1"]);
    }

    #[test]
    fn test_extract_does_not_range_check_octets() {
        assert_eq!(extract("hop 999.300.256.1 seen"), vec!["999.300.256.1"]);
    }

    #[test]
    fn test_extract_ignores_partial_and_overlong_groups() {
        // three groups only, and a four-digit group
        assert!(extract("10.0.1 and 1234.5.6.7").is_empty());
    }

    #[test]
    fn test_extract_ignores_latency_figures() {
        assert_eq!(extract("1  10.0.0.1  0.512 ms  0.498 ms"), vec!["10.0.0.1"]);
    }
}
