//! Typed query methods returning [`agri_core`] records.
//!
//! Feature and history rows come back in load order (`ORDER BY rowid`);
//! sorting by date is the filter contract's job, not the provider's.

use crate::Database;
use agri_core::{FeatureRecord, RiskMetric, YieldHistoryRecord};
use agri_utils::dates::parse_date;
use rusqlite::params;

impl Database {
    /// Every feature row, in load order.
    pub fn query_features(&self) -> anyhow::Result<Vec<FeatureRecord>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT parcelle_id, date, latitude, longitude, rendement_estime, ndvi,
                    temperature, stress_hydrique, culture
             FROM features
             ORDER BY rowid",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    FeatureRecord {
                        parcel_id: String::new(),
                        date: chrono::NaiveDate::MIN,
                        latitude: row.get(2)?,
                        longitude: row.get(3)?,
                        estimated_yield: row.get(4)?,
                        ndvi: row.get(5)?,
                        temperature: row.get(6)?,
                        water_stress_index: row.get(7)?,
                        crop_type: row.get(8)?,
                    },
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut records = Vec::with_capacity(rows.len());
        for (parcel_id, date, mut record) in rows {
            record.parcel_id = parcel_id;
            record.date = parse_date(&date)?;
            records.push(record);
        }
        log::debug!("query: query_features returned {} records", records.len());
        Ok(records)
    }

    /// Sorted, unique parcel identifiers.
    pub fn query_parcel_ids(&self) -> anyhow::Result<Vec<String>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT DISTINCT parcelle_id FROM features ORDER BY parcelle_id",
        )?;
        let rows = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        log::debug!("query: query_parcel_ids returned {} parcels", rows.len());
        Ok(rows)
    }

    /// Every yield history row, in load order.
    pub fn query_yield_history(&self) -> anyhow::Result<Vec<YieldHistoryRecord>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT parcelle_id, date, rendement_estime, culture
             FROM yield_history
             ORDER BY rowid",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut records = Vec::with_capacity(rows.len());
        for (parcel_id, date, estimated_yield, crop_type) in rows {
            records.push(YieldHistoryRecord {
                parcel_id,
                date: parse_date(&date)?,
                estimated_yield,
                crop_type,
            });
        }
        log::debug!("query: query_yield_history returned {} records", records.len());
        Ok(records)
    }

    /// Yield history of a single parcel, in load order.
    pub fn query_parcel_history(&self, parcel_id: &str) -> anyhow::Result<Vec<YieldHistoryRecord>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT date, rendement_estime, culture
             FROM yield_history
             WHERE parcelle_id = ?1
             ORDER BY rowid",
        )?;
        let rows = stmt
            .query_map(params![parcel_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, f64>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(date, estimated_yield, crop_type)| {
                Ok(YieldHistoryRecord {
                    parcel_id: parcel_id.to_string(),
                    date: parse_date(&date)?,
                    estimated_yield,
                    crop_type,
                })
            })
            .collect()
    }

    /// Average risk index per parcel.
    ///
    /// Row risk is `(stress_hydrique + (1 - clamp(ndvi, 0, 1))) / 2`: high
    /// water stress and weak vegetation both raise it. Rows lacking either
    /// value are ignored; parcels with no scorable row are omitted.
    pub fn query_risk_metrics(&self) -> anyhow::Result<Vec<RiskMetric>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT parcelle_id,
                    AVG((stress_hydrique + (1.0 - MAX(0.0, MIN(1.0, ndvi)))) / 2.0) AS avg_risk_index
             FROM features
             WHERE stress_hydrique IS NOT NULL AND ndvi IS NOT NULL
             GROUP BY parcelle_id
             ORDER BY parcelle_id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(RiskMetric {
                    parcel_id: row.get(0)?,
                    avg_risk_index: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("query: query_risk_metrics returned {} parcels", rows.len());
        Ok(rows)
    }
}
