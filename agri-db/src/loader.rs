//! CSV loading functions for populating the in-memory SQLite database.
//!
//! # CSV Formats
//!
//! - **Features** (has headers, any column order):
//!   `parcelle_id,date,latitude,longitude,rendement_estime,ndvi,temperature,stress_hydrique,culture`.
//!   Only `parcelle_id` and `date` are mandatory; absent columns are
//!   remembered so preparers can report them.
//! - **Yield history** (has headers): `parcelle_id,date,rendement_estime[,culture]`

use crate::Database;
use agri_core::Column;
use agri_utils::dates::{format_date, parse_date};
use csv::StringRecord;
use rusqlite::params;
use std::collections::HashMap;

/// Header position of each recognised column.
struct HeaderMap(HashMap<Column, usize>);

impl HeaderMap {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut map = HashMap::new();
        for (idx, header) in headers.iter().enumerate() {
            if let Some(column) = Column::from_header(header) {
                map.entry(column).or_insert(idx);
            }
        }
        HeaderMap(map)
    }

    fn has(&self, column: Column) -> bool {
        self.0.contains_key(&column)
    }

    fn text<'r>(&self, record: &'r StringRecord, column: Column) -> Option<&'r str> {
        self.0
            .get(&column)
            .and_then(|idx| record.get(*idx))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Numeric cell; empty, non-numeric and non-finite cells are `None`.
    fn number(&self, record: &StringRecord, column: Column) -> Option<f64> {
        self.text(record, column)
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }
}

impl Database {
    /// Load feature rows from a headered CSV string.
    ///
    /// Unreadable rows, rows without a parcel id and rows with an unparseable
    /// date are skipped and counted.
    /// Non-numeric measurements are stored as NULL.
    ///
    /// # Example CSV
    /// ```text
    /// parcelle_id,date,latitude,longitude,rendement_estime,ndvi,temperature,stress_hydrique,culture
    /// P1,2022-05-01,43.61,1.44,6.5,0.71,22.0,0.34,wheat
    /// ```
    pub fn load_features(&self, csv_data: &str) -> anyhow::Result<()> {
        let conn = self.conn.borrow();
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());

        let headers = HeaderMap::from_headers(rdr.headers()?);
        if !headers.has(Column::ParcelId) || !headers.has(Column::Date) {
            anyhow::bail!("feature CSV must have 'parcelle_id' and 'date' columns");
        }
        self.columns
            .borrow_mut()
            .extend(Column::ALL.iter().copied().filter(|c| headers.has(*c)));

        let mut count = 0u32;
        let mut skipped = 0u32;
        for result in rdr.records() {
            let r = match result {
                Ok(r) => r,
                Err(e) => {
                    log::warn!("loader: unreadable feature row: {}", e);
                    skipped += 1;
                    continue;
                }
            };
            let parcel_id = match headers.text(&r, Column::ParcelId) {
                Some(p) => p,
                None => {
                    skipped += 1;
                    continue;
                }
            };
            let date = match headers.text(&r, Column::Date).map(parse_date) {
                Some(Ok(d)) => d,
                _ => {
                    skipped += 1;
                    continue;
                }
            };

            conn.execute(
                "INSERT INTO features
                 (parcelle_id, date, latitude, longitude, rendement_estime, ndvi,
                  temperature, stress_hydrique, culture)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    parcel_id,
                    format_date(&date),
                    headers.number(&r, Column::Latitude),
                    headers.number(&r, Column::Longitude),
                    headers.number(&r, Column::EstimatedYield),
                    headers.number(&r, Column::Ndvi),
                    headers.number(&r, Column::Temperature),
                    headers.number(&r, Column::WaterStress),
                    headers.text(&r, Column::CropType),
                ],
            )?;
            count += 1;
        }
        log::info!("loader: loaded {} feature rows, skipped {} invalid", count, skipped);
        Ok(())
    }

    /// Load yield history rows from a headered CSV string.
    ///
    /// Unreadable rows and rows missing the parcel id, the date or a numeric
    /// yield are skipped and counted.
    ///
    /// # Example CSV
    /// ```text
    /// parcelle_id,date,rendement_estime,culture
    /// P1,2020-07-15,5.0,wheat
    /// ```
    pub fn load_yield_history(&self, csv_data: &str) -> anyhow::Result<()> {
        let conn = self.conn.borrow();
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());

        let headers = HeaderMap::from_headers(rdr.headers()?);
        for required in [Column::ParcelId, Column::Date, Column::EstimatedYield] {
            if !headers.has(required) {
                anyhow::bail!("yield history CSV is missing the '{}' column", required);
            }
        }

        let mut count = 0u32;
        let mut skipped = 0u32;
        for result in rdr.records() {
            let r = match result {
                Ok(r) => r,
                Err(e) => {
                    log::warn!("loader: unreadable yield history row: {}", e);
                    skipped += 1;
                    continue;
                }
            };
            let parcel_id = headers.text(&r, Column::ParcelId);
            let date = headers.text(&r, Column::Date).and_then(|d| parse_date(d).ok());
            let value = headers.number(&r, Column::EstimatedYield);
            let (parcel_id, date, value) = match (parcel_id, date, value) {
                (Some(p), Some(d), Some(v)) => (p, d, v),
                _ => {
                    skipped += 1;
                    continue;
                }
            };

            conn.execute(
                "INSERT INTO yield_history (parcelle_id, date, rendement_estime, culture)
                 VALUES (?1, ?2, ?3, ?4)",
                params![parcel_id, format_date(&date), value, headers.text(&r, Column::CropType)],
            )?;
            count += 1;
        }
        log::info!("loader: loaded {} yield history rows, skipped {} invalid", count, skipped);
        Ok(())
    }
}
