//! Path Report
//!
//! Renders a located path for the visualization side: a text table, plain
//! JSON, or GeoJSON ready to drop onto a map.

use crate::domain::entities::{LocationRecord, TracedPath};
use serde::Serialize;
use serde_json::json;

/// Output format for a located path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Text,
    /// JSON object with the hop list
    Json,
    /// GeoJSON FeatureCollection (hop points plus the path line)
    #[value(name = "geojson")]
    GeoJson,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    target: &'a str,
    hops_found: usize,
    hops: &'a [LocationRecord],
}

/// Render `path` in the requested format.
pub fn render(path: &TracedPath, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(path)),
        OutputFormat::Json => {
            let report = JsonReport {
                target: &path.target,
                hops_found: path.hops_found,
                hops: &path.records,
            };
            Ok(serde_json::to_string_pretty(&report)?)
        }
        OutputFormat::GeoJson => Ok(serde_json::to_string_pretty(&geojson(path))?),
    }
}

fn render_text(path: &TracedPath) -> String {
    let mut lines = Vec::with_capacity(path.records.len() + 3);
    lines.push(format!("Path to {}", path.target));
    lines.push(format!(
        "{:>3}  {:<15}  {:>9}  {:>10}",
        "#", "ADDRESS", "LATITUDE", "LONGITUDE"
    ));
    lines.extend(path.records.iter().enumerate().map(|(i, record)| {
        format!(
            "{:>3}  {:<15}  {:>9.4}  {:>10.4}",
            i + 1,
            record.address,
            record.latitude,
            record.longitude
        )
    }));
    lines.push(format!(
        "{} of {} hops located",
        path.records.len(),
        path.hops_found
    ));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// GeoJSON positions are `[longitude, latitude]`.
fn geojson(path: &TracedPath) -> serde_json::Value {
    let mut features: Vec<serde_json::Value> = path
        .records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [record.longitude, record.latitude]
                },
                "properties": {
                    "address": record.address,
                    "hop": i + 1
                }
            })
        })
        .collect();

    if path.records.len() >= 2 {
        let line: Vec<[f64; 2]> = path
            .records
            .iter()
            .map(|r| [r.longitude, r.latitude])
            .collect();
        features.push(json!({
            "type": "Feature",
            "geometry": { "type": "LineString", "coordinates": line },
            "properties": { "target": path.target }
        }));
    }

    json!({
        "type": "FeatureCollection",
        "features": features
    })
}
