//! Self-contained HTML documents for the parcel dashboard and map.
//!
//! Each document embeds the full prepared datasets as JSON together with the
//! browser scripts from `assets/js/`. Chart and map libraries (D3, Leaflet,
//! Leaflet.heat) are loaded from a CDN.

pub mod config;
pub mod dashboard;
pub mod map;
mod scripts;

pub use config::{ChartConfig, MapConfig};
pub use dashboard::render_dashboard;
pub use map::render_map;

use anyhow::Context;
use serde::Serialize;

/// Serialize `value` for inlining inside a `<script>` element.
///
/// `</` is written as `<\/` so a string value can never close the element.
pub fn embed_json<T: Serialize + ?Sized>(value: &T, what: &str) -> anyhow::Result<String> {
    let json = serde_json::to_string(value).with_context(|| format!("serializing {}", what))?;
    Ok(json.replace("</", "<\\/"))
}

const BASE_CSS: &str = r#"
* { box-sizing: border-box; }
body {
    margin: 0;
    padding: 16px;
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    color: #2c3e50;
}
h1 { font-size: 1.5rem; margin: 0 0 12px 0; }
.chart-title { font-size: 14px; font-weight: 600; }
.axis-label { font-size: 12px; fill: #34495e; }
.empty { fill: #95a5a6; }
"#;
