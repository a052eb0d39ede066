use crate::error::PrepareError;
use crate::record::{RiskMetric, YieldHistoryRecord};
use crate::table::FeatureTable;

/// The upstream collaborator that loads monitoring data and engineers features.
///
/// The visualizations only ever read from it; nothing writes back. Each call
/// returns a fresh snapshot the caller owns.
pub trait FeatureProvider {
    /// Make source data available. Fails if the data cannot be found.
    fn load_data(&mut self) -> Result<(), PrepareError>;

    /// The unified feature table keyed by parcel and date.
    fn prepare_features(&self) -> Result<FeatureTable, PrepareError>;

    /// Sorted, unique parcel identifiers of the monitoring data.
    fn parcel_ids(&self) -> Result<Vec<String>, PrepareError>;

    /// Raw yield history used for trend fitting.
    fn yield_history(&self) -> Result<Vec<YieldHistoryRecord>, PrepareError>;

    /// Per-parcel risk aggregates for the given feature snapshot.
    fn calculate_risk_metrics(&self, features: &FeatureTable)
        -> Result<Vec<RiskMetric>, PrepareError>;
}
