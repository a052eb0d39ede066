use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Valid latitude range in degrees.
pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);

/// Valid longitude range in degrees.
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// Returns true if the pair lies within ±90 / ±180 degrees.
pub fn is_valid_coordinate(latitude: f64, longitude: f64) -> bool {
    (LATITUDE_RANGE.0..=LATITUDE_RANGE.1).contains(&latitude)
        && (LONGITUDE_RANGE.0..=LONGITUDE_RANGE.1).contains(&longitude)
}

/// One (parcel, date) observation of the feature table.
///
/// Measurements are optional: a row may lack a value even when the column
/// exists (the source encodes that as an empty or non-numeric cell).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub parcel_id: String,
    pub date: NaiveDate,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Estimated yield in tonnes per hectare.
    pub estimated_yield: Option<f64>,
    pub ndvi: Option<f64>,
    /// Air temperature in °C.
    pub temperature: Option<f64>,
    pub water_stress_index: Option<f64>,
    pub crop_type: Option<String>,
}

impl FeatureRecord {
    /// A record with only its key set.
    pub fn new(parcel_id: &str, date: NaiveDate) -> Self {
        Self {
            parcel_id: parcel_id.to_string(),
            date,
            latitude: None,
            longitude: None,
            estimated_yield: None,
            ndvi: None,
            temperature: None,
            water_stress_index: None,
            crop_type: None,
        }
    }

    /// `(latitude, longitude)` when both are present.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// A row of the yield history table used for trend fitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldHistoryRecord {
    pub parcel_id: String,
    pub date: NaiveDate,
    pub estimated_yield: f64,
    pub crop_type: Option<String>,
}

/// Aggregated risk score of one parcel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMetric {
    pub parcel_id: String,
    pub avg_risk_index: f64,
}
