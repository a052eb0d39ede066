//! Plot-ready yield and NDVI series.

use agri_core::{Column, FeatureTable, PrepareError};
use chrono::NaiveDate;
use serde::Serialize;

/// A yield observation of one parcel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldPoint {
    pub parcel_id: String,
    pub date: NaiveDate,
    pub estimated_yield: f64,
}

/// An NDVI observation of one parcel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NdviPoint {
    pub parcel_id: String,
    pub date: NaiveDate,
    pub ndvi: f64,
}

/// The "full" datasets the charts filter from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PreparedSeries {
    pub yield_series: Vec<YieldPoint>,
    pub ndvi_series: Vec<NdviPoint>,
}

/// Rows that carry a yield value, in table order.
pub fn prepare_yield_series(features: &FeatureTable) -> Result<Vec<YieldPoint>, PrepareError> {
    features.require(&[Column::ParcelId, Column::Date, Column::EstimatedYield])?;
    Ok(features
        .records
        .iter()
        .filter_map(|r| {
            r.estimated_yield.map(|estimated_yield| YieldPoint {
                parcel_id: r.parcel_id.clone(),
                date: r.date,
                estimated_yield,
            })
        })
        .collect())
}

/// Rows that carry an NDVI value, in table order.
pub fn prepare_ndvi_series(features: &FeatureTable) -> Result<Vec<NdviPoint>, PrepareError> {
    features.require(&[Column::ParcelId, Column::Date, Column::Ndvi])?;
    Ok(features
        .records
        .iter()
        .filter_map(|r| {
            r.ndvi.map(|ndvi| NdviPoint {
                parcel_id: r.parcel_id.clone(),
                date: r.date,
                ndvi,
            })
        })
        .collect())
}

/// Build both series. Missing values are dropped per series; a missing
/// column fails the whole preparation and is logged.
pub fn prepare(features: &FeatureTable) -> Result<PreparedSeries, PrepareError> {
    let result = prepare_yield_series(features).and_then(|yield_series| {
        Ok(PreparedSeries {
            yield_series,
            ndvi_series: prepare_ndvi_series(features)?,
        })
    });
    match &result {
        Ok(series) => log::info!(
            "series: prepared {} yield points and {} NDVI points",
            series.yield_series.len(),
            series.ndvi_series.len()
        ),
        Err(e) => log::warn!("series: could not prepare data sources: {}", e),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use agri_core::FeatureRecord;
    use chrono::Datelike;

    fn record(
        parcel: &str,
        day: u32,
        yield_value: Option<f64>,
        ndvi: Option<f64>,
    ) -> FeatureRecord {
        let mut r = FeatureRecord::new(parcel, NaiveDate::from_ymd_opt(2022, 5, day).unwrap());
        r.estimated_yield = yield_value;
        r.ndvi = ndvi;
        r
    }

    #[test]
    fn drops_missing_values_per_series() {
        let table = FeatureTable::with_all_columns(vec![
            record("A", 3, Some(6.0), None),
            record("A", 1, None, Some(0.7)),
            record("B", 2, Some(5.5), Some(0.6)),
        ]);
        let series = prepare(&table).unwrap();
        assert_eq!(series.yield_series.len(), 2);
        assert_eq!(series.ndvi_series.len(), 2);
        // table order, no sorting yet
        assert_eq!(series.yield_series[0].date.day(), 3);
        assert_eq!(series.ndvi_series[0].ndvi, 0.7);
    }

    #[test]
    fn missing_column_is_an_error_not_an_empty_series() {
        let table = FeatureTable::new(
            [Column::ParcelId, Column::Date, Column::Ndvi],
            vec![record("A", 1, None, Some(0.7))],
        );
        assert_eq!(
            prepare(&table),
            Err(PrepareError::MissingColumns(vec![Column::EstimatedYield]))
        );
        assert_eq!(prepare_ndvi_series(&table).unwrap().len(), 1);
    }

    #[test]
    fn empty_table_gives_empty_series() {
        let table = FeatureTable::with_all_columns(vec![]);
        assert_eq!(prepare(&table), Ok(PreparedSeries::default()));
    }
}
