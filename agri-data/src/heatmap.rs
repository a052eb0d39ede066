//! Risk heatmap points.

use agri_core::record::is_valid_coordinate;
use agri_core::{Column, FeatureTable, PrepareError, RiskMetric};
use agri_utils::stats::min_max;
use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;

/// Half-width of the uniform coordinate jitter, in degrees.
pub const JITTER_DEGREES: f64 = 0.0001;

/// Lowest heat weight; the highest risk maps to 1.0.
pub const MIN_HEAT_WEIGHT: f64 = 0.1;

/// A weighted heatmap sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatPoint {
    pub lat: f64,
    pub lon: f64,
    pub weight: f64,
}

/// Min-max scale `value` into [`MIN_HEAT_WEIGHT`, 1.0].
///
/// When every value is the same (`max == min`) there is nothing to scale
/// and every point gets [`MIN_HEAT_WEIGHT`].
pub fn heat_weight(value: f64, min: f64, max: f64) -> f64 {
    if max > min {
        MIN_HEAT_WEIGHT + (value - min) / (max - min) * (1.0 - MIN_HEAT_WEIGHT)
    } else {
        MIN_HEAT_WEIGHT
    }
}

/// Join risk metrics to feature coordinates by parcel and weight them.
///
/// Each risk metric yields one point per feature row of its parcel that
/// carries valid coordinates; metrics with no such row are dropped. Points
/// are jittered by up to [`JITTER_DEGREES`] so stacked parcels stay visible.
pub fn prepare_heatmap<R: Rng + ?Sized>(
    risk_metrics: &[RiskMetric],
    features: &FeatureTable,
    rng: &mut R,
) -> Result<Vec<HeatPoint>, PrepareError> {
    if let Err(e) = features.require(&[Column::ParcelId, Column::Latitude, Column::Longitude]) {
        log::warn!("heatmap: coordinates are needed to place risk metrics: {}", e);
        return Err(e);
    }

    let mut coordinates: HashMap<&str, Vec<(f64, f64)>> = HashMap::new();
    let mut invalid = 0u32;
    for record in &features.records {
        if let Some((lat, lon)) = record.coordinates() {
            if is_valid_coordinate(lat, lon) {
                coordinates
                    .entry(record.parcel_id.as_str())
                    .or_default()
                    .push((lat, lon));
            } else {
                invalid += 1;
            }
        }
    }
    if invalid > 0 {
        log::warn!("heatmap: skipped {} rows with out-of-range coordinates", invalid);
    }

    let mut joined: Vec<(f64, f64, f64)> = Vec::new();
    for metric in risk_metrics {
        if !metric.avg_risk_index.is_finite() {
            log::warn!("heatmap: parcel {} has no usable risk index", metric.parcel_id);
            continue;
        }
        match coordinates.get(metric.parcel_id.as_str()) {
            Some(points) => joined.extend(
                points
                    .iter()
                    .map(|(lat, lon)| (*lat, *lon, metric.avg_risk_index)),
            ),
            None => log::debug!("heatmap: parcel {} has no coordinates", metric.parcel_id),
        }
    }

    let (min_risk, max_risk) = match min_max(joined.iter().map(|(_, _, risk)| *risk)) {
        Some(range) => range,
        None => return Ok(Vec::new()),
    };
    if max_risk <= min_risk {
        log::warn!(
            "heatmap: all risk values equal {}, using weight {}",
            min_risk,
            MIN_HEAT_WEIGHT
        );
    }

    let points = joined
        .into_iter()
        .map(|(lat, lon, risk)| HeatPoint {
            lat: lat + rng.gen_range(-JITTER_DEGREES..JITTER_DEGREES),
            lon: lon + rng.gen_range(-JITTER_DEGREES..JITTER_DEGREES),
            weight: heat_weight(risk, min_risk, max_risk),
        })
        .collect::<Vec<_>>();
    log::info!("heatmap: {} points", points.len());
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agri_core::FeatureRecord;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn located(parcel: &str, lat: f64, lon: f64) -> FeatureRecord {
        let mut r = FeatureRecord::new(parcel, NaiveDate::from_ymd_opt(2022, 6, 1).unwrap());
        r.latitude = Some(lat);
        r.longitude = Some(lon);
        r
    }

    fn metric(parcel: &str, risk: f64) -> RiskMetric {
        RiskMetric {
            parcel_id: parcel.to_string(),
            avg_risk_index: risk,
        }
    }

    #[test]
    fn weights_span_min_to_one() {
        assert_eq!(heat_weight(2.0, 2.0, 4.0), MIN_HEAT_WEIGHT);
        assert!((heat_weight(3.0, 2.0, 4.0) - 0.55).abs() < 1e-12);
        assert!((heat_weight(4.0, 2.0, 4.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn equal_risks_get_the_minimum_weight() {
        let features = FeatureTable::with_all_columns(vec![
            located("A", 43.6, 1.4),
            located("B", 43.7, 1.5),
        ]);
        let risks = vec![metric("A", 0.4), metric("B", 0.4)];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let points = prepare_heatmap(&risks, &features, &mut rng).unwrap();
        assert_eq!(points.len(), 2);
        assert!(points.iter().all(|p| p.weight == MIN_HEAT_WEIGHT));
    }

    #[test]
    fn joins_every_coordinate_row_and_drops_unmatched() {
        let features = FeatureTable::with_all_columns(vec![
            located("A", 43.6, 1.4),
            located("A", 43.6, 1.4),
            located("B", 43.7, 1.5),
        ]);
        let risks = vec![metric("A", 0.2), metric("B", 0.8), metric("C", 0.5)];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let points = prepare_heatmap(&risks, &features, &mut rng).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].weight, MIN_HEAT_WEIGHT);
        assert!((points[2].weight - 1.0).abs() < 1e-12);
    }

    #[test]
    fn jitter_is_small_and_seeded() {
        let features = FeatureTable::with_all_columns(vec![located("A", 43.6, 1.4)]);
        let risks = vec![metric("A", 0.2)];
        let a = prepare_heatmap(&risks, &features, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        let b = prepare_heatmap(&risks, &features, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
        assert!((a[0].lat - 43.6).abs() <= JITTER_DEGREES);
        assert!((a[0].lon - 1.4).abs() <= JITTER_DEGREES);
    }

    #[test]
    fn invalid_coordinates_are_skipped() {
        let features = FeatureTable::with_all_columns(vec![
            located("A", 123.0, 1.4),
            located("B", 43.7, 1.5),
        ]);
        let risks = vec![metric("A", 0.2), metric("B", 0.8)];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let points = prepare_heatmap(&risks, &features, &mut rng).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].weight, MIN_HEAT_WEIGHT);
    }

    #[test]
    fn missing_coordinates_column_is_an_error() {
        let features = FeatureTable::new([Column::ParcelId, Column::Date], vec![]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            prepare_heatmap(&[metric("A", 0.2)], &features, &mut rng),
            Err(PrepareError::MissingColumns(vec![Column::Latitude, Column::Longitude]))
        );
    }

    #[test]
    fn no_risk_metrics_gives_no_points() {
        let features = FeatureTable::with_all_columns(vec![located("A", 43.6, 1.4)]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(prepare_heatmap(&[], &features, &mut rng).unwrap().is_empty());
    }
}
