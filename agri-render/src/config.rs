//! Rendering options handed to the browser scripts as JSON.

use agri_data::filter::PREDICTION_SPREAD;
use agri_data::stress::{STRESS_BIN_WIDTH, TEMPERATURE_BIN_WIDTH};
use serde::Serialize;

/// Dashboard chart options. Field names are camelCase on the JS side.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub yield_title: String,
    pub ndvi_title: String,
    pub stress_title: String,
    pub prediction_title: String,
    pub yield_label: String,
    pub temperature_label: String,
    pub stress_label: String,
    pub yield_color: String,
    pub point_color: String,
    pub ndvi_color: String,
    pub prediction_color: String,
    pub threshold_color: String,
    /// Dashed reference line on the NDVI chart.
    pub ndvi_threshold: f64,
    pub temperature_bin_width: f64,
    pub stress_bin_width: f64,
    pub prediction_spread: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: "Parcel Monitoring Dashboard".to_string(),
            width: 600,
            height: 400,
            yield_title: "Yield History by Parcel".to_string(),
            ndvi_title: "NDVI Evolution and Historical Thresholds".to_string(),
            stress_title: "Stress Matrix".to_string(),
            prediction_title: "Yield Prediction".to_string(),
            yield_label: "Yield (t/ha)".to_string(),
            temperature_label: "Temperature (°C)".to_string(),
            stress_label: "Water Stress (index)".to_string(),
            yield_color: "blue".to_string(),
            point_color: "red".to_string(),
            ndvi_color: "green".to_string(),
            prediction_color: "orange".to_string(),
            threshold_color: "blue".to_string(),
            ndvi_threshold: 0.5,
            temperature_bin_width: TEMPERATURE_BIN_WIDTH,
            stress_bin_width: STRESS_BIN_WIDTH,
            prediction_spread: PREDICTION_SPREAD,
        }
    }
}

/// Map options: base tiles, marker style and heatmap parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapConfig {
    pub title: String,
    pub zoom_start: u8,
    pub tile_url: String,
    pub attribution: String,
    pub marker_radius: f64,
    pub marker_opacity: f64,
    /// Red, yellow, green as RGB triples; shared by both marker layers.
    pub color_stops: Vec<[u8; 3]>,
    pub yield_layer_name: String,
    pub ndvi_layer_name: String,
    pub heat_layer_name: String,
    pub heat_radius: u32,
    pub heat_blur: u32,
    pub heat_max_zoom: u8,
    pub heat_min_opacity: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            title: "Parcel Map".to_string(),
            zoom_start: 13,
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "&copy; OpenStreetMap contributors".to_string(),
            marker_radius: 5.0,
            marker_opacity: 0.7,
            color_stops: vec![[255, 0, 0], [255, 255, 0], [0, 128, 0]],
            yield_layer_name: "Yield history".to_string(),
            ndvi_layer_name: "Current NDVI".to_string(),
            heat_layer_name: "Risk heatmap".to_string(),
            heat_radius: 15,
            heat_blur: 15,
            heat_max_zoom: 13,
            heat_min_opacity: 0.3,
        }
    }
}
