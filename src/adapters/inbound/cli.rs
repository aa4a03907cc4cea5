//! Command-line interface
//!
//! Arguments for the `tracemap` binary and the interactive target prompt.
//!
//! ```bash
//! # Trace and print a table
//! tracemap example.com
//!
//! # GeoJSON for a map, written to a file
//! tracemap example.com --format geojson --output path.geojson
//! ```

use crate::adapters::inbound::report::OutputFormat;
use crate::config::Config;
use clap::Parser;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Trace the network path to a host and locate each hop.
#[derive(Debug, Parser)]
#[command(name = "tracemap")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Domain or IP to trace (prompted for when omitted)
    #[arg(value_name = "TARGET")]
    pub target: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Location cache file (overrides TRACEMAP_CACHE_PATH)
    #[arg(long, value_name = "FILE")]
    pub cache: Option<PathBuf>,

    /// Maximum concurrent lookups (overrides TRACEMAP_MAX_CONCURRENCY)
    #[arg(short = 'j', long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Remember failed lookups and skip them on later runs
    #[arg(long)]
    pub remember_failures: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

impl Cli {
    /// Apply command-line overrides on top of the environment config.
    pub fn apply(&self, cfg: &mut Config) {
        if let Some(cache) = &self.cache {
            cfg.cache_path = cache.clone();
        }
        if let Some(n) = self.concurrency {
            cfg.max_concurrency = n.max(1);
        }
        if self.remember_failures {
            cfg.remember_failures = true;
        }
        if self.debug {
            cfg.debug = true;
        }
    }
}

/// Ask for a target on `output` and read one line from `input`.
pub fn prompt_target<R: BufRead, W: Write>(mut input: R, mut output: W) -> anyhow::Result<String> {
    write!(output, "Enter the domain or IP to trace (e.g., 'google.com'): ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    let target = line.trim();
    if target.is_empty() {
        anyhow::bail!("no target given");
    }
    Ok(target.to_string())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_target_and_defaults() {
        let cli = Cli::parse_from(["tracemap", "example.com"]);
        assert_eq!(cli.target.as_deref(), Some("example.com"));
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.output.is_none());
        assert!(!cli.remember_failures);
    }

    #[test]
    fn test_parse_without_target() {
        let cli = Cli::parse_from(["tracemap"]);
        assert!(cli.target.is_none());
    }

    #[test]
    fn test_parse_all_options() {
        let cli = Cli::parse_from([
            "tracemap",
            "8.8.8.8",
            "--format",
            "geojson",
            "--output",
            "path.geojson",
            "--cache",
            "/tmp/cache.json",
            "-j",
            "4",
            "--remember-failures",
            "--debug",
        ]);
        assert_eq!(cli.format, OutputFormat::GeoJson);
        assert_eq!(cli.output, Some(PathBuf::from("path.geojson")));
        assert_eq!(cli.cache, Some(PathBuf::from("/tmp/cache.json")));
        assert_eq!(cli.concurrency, Some(4));
        assert!(cli.remember_failures);
        assert!(cli.debug);
    }

    #[test]
    fn test_invalid_format_rejected() {
        assert!(Cli::try_parse_from(["tracemap", "x", "--format", "kml"]).is_err());
    }

    #[test]
    fn test_apply_overrides_config() {
        let cli = Cli::parse_from([
            "tracemap",
            "--cache",
            "other.json",
            "-j",
            "0",
            "--remember-failures",
        ]);
        let mut cfg = Config::default();
        cli.apply(&mut cfg);

        assert_eq!(cfg.cache_path, PathBuf::from("other.json"));
        assert_eq!(cfg.max_concurrency, 1);
        assert!(cfg.remember_failures);
        assert!(!cfg.debug);
    }

    #[test]
    fn test_apply_keeps_config_without_flags() {
        let cli = Cli::parse_from(["tracemap", "example.com"]);
        let mut cfg = Config::default();
        cfg.max_concurrency = 7;
        cli.apply(&mut cfg);

        assert_eq!(cfg.max_concurrency, 7);
        assert_eq!(cfg.cache_path, PathBuf::from("ip_cache.json"));
    }

    #[test]
    fn test_prompt_target_reads_trimmed_line() {
        let mut shown = Vec::new();
        let target = prompt_target(Cursor::new("  google.com \n"), &mut shown).unwrap();

        assert_eq!(target, "google.com");
        assert!(String::from_utf8(shown).unwrap().starts_with("Enter the domain or IP"));
    }

    #[test]
    fn test_prompt_target_rejects_empty_answer() {
        assert!(prompt_target(Cursor::new("\n"), Vec::new()).is_err());
        assert!(prompt_target(Cursor::new(""), Vec::new()).is_err());
    }
}
