//! Map layer preparation: base map centre, yield and NDVI markers, and the
//! risk heatmap.

use crate::heatmap::{prepare_heatmap, HeatPoint};
use crate::popup::{format_ndvi_point, format_yield_summary};
use crate::trend::estimate_trend;
use agri_core::record::is_valid_coordinate;
use agri_core::{
    Column, FeatureProvider, FeatureRecord, FeatureTable, PrepareError, YieldHistoryRecord,
};
use agri_utils::stats::{mean, min_max};
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;

/// Upper bound of the yield colour scale, in t/ha. The scale starts at 0.
pub const YIELD_SCALE_MAX: f64 = 12.0;

/// Value range a layer's colour scale spans.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub parcel_id: String,
    pub lat: f64,
    pub lon: f64,
    /// The value the marker is coloured by.
    pub value: f64,
    pub popup_html: String,
}

/// Markers sharing one colour scale. `range` is `None` for an empty layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarkerLayer {
    pub range: Option<ColorRange>,
    pub markers: Vec<Marker>,
}

/// Mean latitude and longitude over every row carrying a valid coordinate
/// pair. Out-of-range positions are skipped and counted in a warning.
pub fn map_center(features: &FeatureTable) -> Result<(f64, f64), PrepareError> {
    features.require(&[Column::Latitude, Column::Longitude])?;
    let positions: Vec<(f64, f64)> = features
        .records
        .iter()
        .filter_map(|r| r.coordinates())
        .collect();
    let (lats, lons): (Vec<f64>, Vec<f64>) = positions
        .iter()
        .copied()
        .filter(|&(lat, lon)| is_valid_coordinate(lat, lon))
        .unzip();
    let skipped = positions.len() - lats.len();
    if skipped > 0 {
        log::warn!("layers: map centre skipped {} rows with invalid coordinates", skipped);
    }
    match (mean(&lats), mean(&lons)) {
        (Some(lat), Some(lon)) => Ok((lat, lon)),
        _ => Err(PrepareError::EmptyInput("map centre")),
    }
}

/// One marker per parcel at its mean position, coloured by mean yield, with
/// a popup summarising the yield trend fitted on `history`.
///
/// Parcels without any yield reading, or whose mean position is not a valid
/// coordinate, are skipped.
pub fn yield_markers(
    features: &FeatureTable,
    history: &[YieldHistoryRecord],
) -> Result<MarkerLayer, PrepareError> {
    features.require(&[
        Column::ParcelId,
        Column::EstimatedYield,
        Column::Latitude,
        Column::Longitude,
    ])?;

    let mut by_parcel: BTreeMap<&str, Vec<FeatureRecord>> = BTreeMap::new();
    for record in &features.records {
        by_parcel
            .entry(record.parcel_id.as_str())
            .or_default()
            .push(record.clone());
    }

    let mut markers = Vec::with_capacity(by_parcel.len());
    for (parcel_id, rows) in by_parcel {
        let yields: Vec<f64> = rows.iter().filter_map(|r| r.estimated_yield).collect();
        let mean_yield = match mean(&yields) {
            Some(value) => value,
            None => {
                log::warn!("layers: parcel {} has no yield reading, skipped", parcel_id);
                continue;
            }
        };
        let (lats, lons): (Vec<f64>, Vec<f64>) =
            rows.iter().filter_map(|r| r.coordinates()).unzip();
        let (lat, lon) = match (mean(&lats), mean(&lons)) {
            (Some(lat), Some(lon)) if is_valid_coordinate(lat, lon) => (lat, lon),
            (lat, lon) => {
                log::warn!(
                    "layers: invalid coordinates for parcel {}: {:?}, {:?}",
                    parcel_id,
                    lat,
                    lon
                );
                continue;
            }
        };

        let trend = estimate_trend(parcel_id, history);
        markers.push(Marker {
            parcel_id: parcel_id.to_string(),
            lat,
            lon,
            value: mean_yield,
            popup_html: format_yield_summary(&rows, mean_yield, &trend),
        });
    }

    log::info!("layers: {} yield markers", markers.len());
    Ok(MarkerLayer {
        range: Some(ColorRange {
            min: 0.0,
            max: YIELD_SCALE_MAX,
        }),
        markers,
    })
}

/// One marker per row with an NDVI reading and a valid position. The colour
/// scale spans the NDVI values actually shown.
pub fn ndvi_markers(features: &FeatureTable) -> Result<MarkerLayer, PrepareError> {
    features.require(&[Column::ParcelId, Column::Ndvi, Column::Latitude, Column::Longitude])?;

    let mut markers = Vec::new();
    let mut invalid = 0u32;
    for record in &features.records {
        let (ndvi, (lat, lon)) = match (record.ndvi, record.coordinates()) {
            (Some(ndvi), Some(coords)) if ndvi.is_finite() => (ndvi, coords),
            _ => continue,
        };
        if !is_valid_coordinate(lat, lon) {
            invalid += 1;
            continue;
        }
        markers.push(Marker {
            parcel_id: record.parcel_id.clone(),
            lat,
            lon,
            value: ndvi,
            popup_html: format_ndvi_point(record),
        });
    }
    if invalid > 0 {
        log::warn!("layers: skipped {} NDVI rows with invalid coordinates", invalid);
    }

    let range = min_max(markers.iter().map(|m| m.value)).map(|(min, max)| ColorRange { min, max });
    log::info!("layers: {} NDVI markers", markers.len());
    Ok(MarkerLayer { range, markers })
}

/// Everything the map document shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLayers {
    pub center: (f64, f64),
    pub yield_layer: MarkerLayer,
    pub ndvi_layer: MarkerLayer,
    pub heatmap: Vec<HeatPoint>,
}

impl MapLayers {
    /// Load the provider and prepare every layer.
    ///
    /// Only a missing map centre is fatal. A layer that cannot be prepared
    /// is logged and left empty so the rest of the map still renders.
    pub fn build<P, R>(provider: &mut P, rng: &mut R) -> Result<MapLayers, PrepareError>
    where
        P: FeatureProvider + ?Sized,
        R: Rng + ?Sized,
    {
        provider.load_data()?;
        let features = provider.prepare_features()?;
        let center = map_center(&features)?;

        let history = provider.yield_history().unwrap_or_else(|e| {
            log::warn!("layers: yield history unavailable: {}", e);
            Vec::new()
        });
        let yield_layer = yield_markers(&features, &history).unwrap_or_else(|e| {
            log::warn!("layers: yield layer skipped: {}", e);
            MarkerLayer::default()
        });
        let ndvi_layer = ndvi_markers(&features).unwrap_or_else(|e| {
            log::warn!("layers: NDVI layer skipped: {}", e);
            MarkerLayer::default()
        });
        let heatmap = provider
            .calculate_risk_metrics(&features)
            .and_then(|risk| prepare_heatmap(&risk, &features, rng))
            .unwrap_or_else(|e| {
                log::warn!("layers: risk heatmap skipped: {}", e);
                Vec::new()
            });

        Ok(MapLayers {
            center,
            yield_layer,
            ndvi_layer,
            heatmap,
        })
    }
}
