//! [`FeatureProvider`] implementation backed by the in-memory database.

use crate::Database;
use agri_core::{FeatureProvider, FeatureTable, PrepareError, RiskMetric, YieldHistoryRecord};
use std::collections::HashSet;

fn provider_error(err: anyhow::Error) -> PrepareError {
    PrepareError::Provider(format!("{:#}", err))
}

impl Database {
    fn feature_row_count(&self) -> Result<i64, PrepareError> {
        self.conn
            .borrow()
            .query_row("SELECT COUNT(*) FROM features", [], |row| row.get(0))
            .map_err(|e| provider_error(e.into()))
    }
}

impl FeatureProvider for Database {
    /// CSV text is pushed in through the `load_*` methods; this only checks
    /// that something was loaded.
    fn load_data(&mut self) -> Result<(), PrepareError> {
        let rows = self.feature_row_count()?;
        if rows == 0 {
            log::error!("provider: no feature rows loaded");
            return Err(PrepareError::NotLoaded);
        }
        log::info!("provider: {} feature rows available", rows);
        Ok(())
    }

    fn prepare_features(&self) -> Result<FeatureTable, PrepareError> {
        let records = self.query_features().map_err(provider_error)?;
        Ok(FeatureTable::new(self.feature_columns(), records))
    }

    fn parcel_ids(&self) -> Result<Vec<String>, PrepareError> {
        if self.feature_row_count()? == 0 {
            return Err(PrepareError::NotLoaded);
        }
        self.query_parcel_ids().map_err(provider_error)
    }

    fn yield_history(&self) -> Result<Vec<YieldHistoryRecord>, PrepareError> {
        self.query_yield_history().map_err(provider_error)
    }

    /// Risk metrics of the parcels that appear in `features`.
    fn calculate_risk_metrics(
        &self,
        features: &FeatureTable,
    ) -> Result<Vec<RiskMetric>, PrepareError> {
        let parcels: HashSet<&str> = features
            .records
            .iter()
            .map(|r| r.parcel_id.as_str())
            .collect();
        let metrics = self.query_risk_metrics().map_err(provider_error)?;
        Ok(metrics
            .into_iter()
            .filter(|m| parcels.contains(m.parcel_id.as_str()))
            .collect())
    }
}
