//! Browser scripts embedded into the generated documents.
//!
//! The files under `assets/js/` are plain globals (no ES modules) and are
//! inlined into a `<script>` block at build time.

pub static FILTER_JS: &str = include_str!("../assets/js/filter.js");
pub static CHARTS_JS: &str = include_str!("../assets/js/charts.js");
pub static MAP_JS: &str = include_str!("../assets/js/map.js");

pub const D3_URL: &str = "https://cdn.jsdelivr.net/npm/d3@7";
pub const LEAFLET_CSS_URL: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
pub const LEAFLET_JS_URL: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
pub const LEAFLET_HEAT_URL: &str = "https://unpkg.com/leaflet.heat@0.2.0/dist/leaflet-heat.js";

/// Scripts needed by the dashboard, in load order.
pub fn dashboard_scripts() -> String {
    [FILTER_JS, CHARTS_JS].join("\n")
}
