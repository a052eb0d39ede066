//! Temperature × water-stress density matrix.

use agri_core::{Column, FeatureTable, PrepareError, StressBin};
use std::collections::BTreeMap;

/// Width of a temperature bin in °C.
pub const TEMPERATURE_BIN_WIDTH: f64 = 5.0;

/// Width of a water-stress bin.
pub const STRESS_BIN_WIDTH: f64 = 0.1;

/// Absorbs representation error so values sitting on a bin edge (0.3, 0.7)
/// fall into the bin they name rather than the one below.
const BIN_EPSILON: f64 = 1e-9;

/// Index of the bin containing `value`: `floor(value / width)`.
fn bin_index(value: f64, width: f64) -> i64 {
    (value / width + BIN_EPSILON).floor() as i64
}

/// Edges are rounded to this many parts per unit so that `3 * 0.1`
/// reports as 0.3 instead of 0.30000000000000004.
const EDGE_PRECISION: f64 = 1e9;

/// Lower edge of the bin at `index`.
fn bin_edge(index: i64, width: f64) -> f64 {
    (index as f64 * width * EDGE_PRECISION).round() / EDGE_PRECISION
}

/// Lower edge of the 5 °C bin containing `temperature`.
pub fn temperature_bin(temperature: f64) -> f64 {
    bin_edge(bin_index(temperature, TEMPERATURE_BIN_WIDTH), TEMPERATURE_BIN_WIDTH)
}

/// Lower edge of the 0.1 bin containing `stress`.
pub fn stress_bin(stress: f64) -> f64 {
    bin_edge(bin_index(stress, STRESS_BIN_WIDTH), STRESS_BIN_WIDTH)
}

/// Count rows per (parcel, temperature bin, stress bin), normalized by the
/// largest count over all bins.
///
/// Rows missing either measurement are left out. Output is ordered by
/// parcel, then temperature bin, then stress bin.
pub fn build_stress_matrix(features: &FeatureTable) -> Result<Vec<StressBin>, PrepareError> {
    if let Err(e) =
        features.require(&[Column::ParcelId, Column::Temperature, Column::WaterStress])
    {
        log::warn!("stress: temperature and water stress are needed for the matrix: {}", e);
        return Err(e);
    }

    let mut counts: BTreeMap<(&str, i64, i64), u32> = BTreeMap::new();
    for record in &features.records {
        let (temperature, stress) = match (record.temperature, record.water_stress_index) {
            (Some(t), Some(s)) if t.is_finite() && s.is_finite() => (t, s),
            _ => continue,
        };
        let key = (
            record.parcel_id.as_str(),
            bin_index(temperature, TEMPERATURE_BIN_WIDTH),
            bin_index(stress, STRESS_BIN_WIDTH),
        );
        *counts.entry(key).or_insert(0) += 1;
    }

    let max_count = counts.values().copied().max().unwrap_or(0);
    let bins: Vec<StressBin> = counts
        .into_iter()
        .map(|((parcel_id, t_idx, s_idx), count)| StressBin {
            parcel_id: parcel_id.to_string(),
            temperature_bin: bin_edge(t_idx, TEMPERATURE_BIN_WIDTH),
            stress_bin: bin_edge(s_idx, STRESS_BIN_WIDTH),
            count,
            normalized_count: count as f64 / max_count as f64,
        })
        .collect();
    log::info!("stress: {} bins, max count {}", bins.len(), max_count);
    Ok(bins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agri_core::FeatureRecord;
    use chrono::NaiveDate;

    fn record(parcel: &str, temperature: f64, stress: f64) -> FeatureRecord {
        let mut r = FeatureRecord::new(parcel, NaiveDate::from_ymd_opt(2022, 6, 1).unwrap());
        r.temperature = Some(temperature);
        r.water_stress_index = Some(stress);
        r
    }

    #[test]
    fn bins_floor_inside_the_interval() {
        assert_eq!(temperature_bin(22.0), 20.0);
        assert_eq!(stress_bin(0.34), 0.3);
    }

    #[test]
    fn bins_are_inclusive_on_the_floor_side() {
        assert_eq!(temperature_bin(20.0), 20.0);
        assert_eq!(stress_bin(0.3), 0.3);
        assert_eq!(stress_bin(0.7), 0.7);
        assert_eq!(stress_bin(1.0), 1.0);
        assert_eq!(temperature_bin(19.999), 15.0);
    }

    #[test]
    fn negative_values_floor_downwards() {
        assert_eq!(temperature_bin(-0.5), -5.0);
        assert_eq!(temperature_bin(-5.0), -5.0);
        assert_eq!(stress_bin(-0.05), -0.1);
    }

    #[test]
    fn normalizes_by_global_max() {
        // counts 2, 4, 8 across three bins
        let mut records = Vec::new();
        records.extend((0..2).map(|_| record("A", 12.0, 0.15)));
        records.extend((0..4).map(|_| record("A", 22.0, 0.34)));
        records.extend((0..8).map(|_| record("B", 22.0, 0.34)));
        let table = FeatureTable::with_all_columns(records);

        let bins = build_stress_matrix(&table).unwrap();
        let normalized: Vec<f64> = bins.iter().map(|b| b.normalized_count).collect();
        assert_eq!(normalized, vec![0.25, 0.5, 1.0]);
        assert_eq!(bins[0].temperature_bin, 10.0);
        assert_eq!(bins[0].stress_bin, 0.1);
        assert_eq!(bins[2].parcel_id, "B");
        assert_eq!(bins[2].count, 8);
    }

    #[test]
    fn groups_are_per_parcel() {
        let table = FeatureTable::with_all_columns(vec![
            record("A", 22.0, 0.34),
            record("B", 22.0, 0.34),
            record("A", 20.0, 0.3),
        ]);
        let bins = build_stress_matrix(&table).unwrap();
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[0].normalized_count, 1.0);
        assert_eq!(bins[1].normalized_count, 0.5);
    }

    #[test]
    fn rows_without_measurements_are_ignored() {
        let mut incomplete = record("A", 22.0, 0.34);
        incomplete.water_stress_index = None;
        let table = FeatureTable::with_all_columns(vec![incomplete, record("A", 22.0, 0.34)]);
        let bins = build_stress_matrix(&table).unwrap();
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 1);
    }

    #[test]
    fn missing_columns_do_not_fabricate_bins() {
        let table = FeatureTable::new(
            [Column::ParcelId, Column::Date, Column::Temperature],
            vec![record("A", 22.0, 0.34)],
        );
        assert_eq!(
            build_stress_matrix(&table),
            Err(PrepareError::MissingColumns(vec![Column::WaterStress]))
        );
    }

    #[test]
    fn empty_table_gives_no_bins() {
        let table = FeatureTable::with_all_columns(vec![]);
        assert!(build_stress_matrix(&table).unwrap().is_empty());
    }
}
