use crate::error::PrepareError;
use crate::record::FeatureRecord;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// A column of the unified feature table.
///
/// The names are the ones used by the feature CSV exports
/// (`parcelle_id`, `rendement_estime`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Column {
    ParcelId,
    Date,
    Latitude,
    Longitude,
    EstimatedYield,
    Ndvi,
    Temperature,
    WaterStress,
    CropType,
}

impl Column {
    pub const ALL: [Column; 9] = [
        Column::ParcelId,
        Column::Date,
        Column::Latitude,
        Column::Longitude,
        Column::EstimatedYield,
        Column::Ndvi,
        Column::Temperature,
        Column::WaterStress,
        Column::CropType,
    ];

    /// Header name in the source tables.
    pub fn name(&self) -> &'static str {
        match self {
            Column::ParcelId => "parcelle_id",
            Column::Date => "date",
            Column::Latitude => "latitude",
            Column::Longitude => "longitude",
            Column::EstimatedYield => "rendement_estime",
            Column::Ndvi => "ndvi",
            Column::Temperature => "temperature",
            Column::WaterStress => "stress_hydrique",
            Column::CropType => "culture",
        }
    }

    /// Match a CSV header cell. Also accepts the short aliases
    /// (`lat`, `lon`, `yield`) some exports use.
    pub fn from_header(header: &str) -> Option<Column> {
        match header.trim().to_lowercase().as_str() {
            "parcelle_id" => Some(Column::ParcelId),
            "date" => Some(Column::Date),
            "latitude" | "lat" => Some(Column::Latitude),
            "longitude" | "lon" => Some(Column::Longitude),
            "rendement_estime" | "yield" => Some(Column::EstimatedYield),
            "ndvi" => Some(Column::Ndvi),
            "temperature" => Some(Column::Temperature),
            "stress_hydrique" => Some(Column::WaterStress),
            "culture" => Some(Column::CropType),
            _ => None,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Snapshot of the feature table produced by a [`crate::FeatureProvider`].
///
/// `columns` records which columns the source actually carried, so that a
/// preparer can tell "column absent" apart from "value missing on this row".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTable {
    pub columns: BTreeSet<Column>,
    pub records: Vec<FeatureRecord>,
}

impl FeatureTable {
    pub fn new(columns: impl IntoIterator<Item = Column>, records: Vec<FeatureRecord>) -> Self {
        Self {
            columns: columns.into_iter().collect(),
            records,
        }
    }

    /// A table that carries every column.
    pub fn with_all_columns(records: Vec<FeatureRecord>) -> Self {
        Self::new(Column::ALL, records)
    }

    pub fn has(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Columns from `required` that this table does not carry.
    pub fn missing(&self, required: &[Column]) -> Vec<Column> {
        required
            .iter()
            .copied()
            .filter(|c| !self.has(*c))
            .collect()
    }

    /// Fail with [`PrepareError::MissingColumns`] unless every column is present.
    pub fn require(&self, required: &[Column]) -> Result<(), PrepareError> {
        let missing = self.missing(required);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(PrepareError::MissingColumns(missing))
        }
    }

    /// Sorted, de-duplicated parcel identifiers.
    pub fn parcel_ids(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.parcel_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(parcel: &str) -> FeatureRecord {
        FeatureRecord::new(parcel, NaiveDate::from_ymd_opt(2022, 5, 1).unwrap())
    }

    #[test]
    fn header_aliases_resolve() {
        assert_eq!(Column::from_header("Latitude"), Some(Column::Latitude));
        assert_eq!(Column::from_header("lon"), Some(Column::Longitude));
        assert_eq!(Column::from_header("yield"), Some(Column::EstimatedYield));
        assert_eq!(Column::from_header("annee"), None);
    }

    #[test]
    fn require_reports_only_absent_columns() {
        let table = FeatureTable::new([Column::ParcelId, Column::Date, Column::Ndvi], vec![]);
        assert!(table.require(&[Column::ParcelId, Column::Ndvi]).is_ok());
        let err = table
            .require(&[Column::Ndvi, Column::Temperature, Column::WaterStress])
            .unwrap_err();
        assert_eq!(
            err,
            PrepareError::MissingColumns(vec![Column::Temperature, Column::WaterStress])
        );
    }

    #[test]
    fn parcel_ids_are_sorted_and_unique() {
        let table = FeatureTable::with_all_columns(vec![
            record("P3"),
            record("P1"),
            record("P3"),
            record("P2"),
        ]);
        assert_eq!(table.parcel_ids(), vec!["P1", "P2", "P3"]);
    }
}
