//! Dashboard state: the full datasets and the per-selection view.

use crate::filter::{
    filter_by_parcel, filter_sorted_by_date, predict_yield, PredictionPoint, Selection,
};
use crate::series::{self, NdviPoint, PreparedSeries, YieldPoint};
use crate::stress::build_stress_matrix;
use agri_core::{FeatureProvider, PrepareError, StressBin};
use rand::Rng;
use serde::Serialize;

/// Sorted, unique parcel ids offered by the selector.
///
/// An empty list is reported as [`PrepareError::EmptyInput`]: the dashboard
/// has nothing to show without at least one parcel.
pub fn parcel_options<P: FeatureProvider + ?Sized>(
    provider: &P,
) -> Result<Vec<String>, PrepareError> {
    let mut parcels = provider.parcel_ids()?;
    parcels.sort();
    parcels.dedup();
    if parcels.is_empty() {
        log::error!("dashboard: no parcels to select");
        return Err(PrepareError::EmptyInput("parcel options"));
    }
    Ok(parcels)
}

fn or_empty<T>(result: Result<Vec<T>, PrepareError>, what: &str) -> Vec<T> {
    result.unwrap_or_else(|e| {
        log::warn!("dashboard: {} unavailable: {}", what, e);
        Vec::new()
    })
}

/// The full, unfiltered datasets behind the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardData {
    pub parcels: Vec<String>,
    pub yield_series: Vec<YieldPoint>,
    pub ndvi_series: Vec<NdviPoint>,
    pub stress_matrix: Vec<StressBin>,
}

impl DashboardData {
    /// Load the provider and prepare every dataset.
    ///
    /// Loading and listing parcels are required. A series or the stress
    /// matrix that cannot be prepared is logged and left empty.
    pub fn build<P: FeatureProvider + ?Sized>(
        provider: &mut P,
    ) -> Result<DashboardData, PrepareError> {
        provider.load_data()?;
        let parcels = parcel_options(&*provider)?;
        let features = provider.prepare_features()?;

        let PreparedSeries {
            yield_series,
            ndvi_series,
        } = series::prepare(&features).unwrap_or_else(|_| PreparedSeries {
            yield_series: or_empty(series::prepare_yield_series(&features), "yield series"),
            ndvi_series: or_empty(series::prepare_ndvi_series(&features), "NDVI series"),
        });
        let stress_matrix = or_empty(build_stress_matrix(&features), "stress matrix");

        log::info!(
            "dashboard: {} parcels, {} yield points, {} NDVI points, {} stress bins",
            parcels.len(),
            yield_series.len(),
            ndvi_series.len(),
            stress_matrix.len()
        );
        Ok(DashboardData {
            parcels,
            yield_series,
            ndvi_series,
            stress_matrix,
        })
    }

    /// The selector's starting state: the first parcel.
    pub fn initial_selection(&self) -> Option<Selection> {
        Selection::new(self.parcels.clone())
    }

    /// Recompute every filtered dataset for `selection` from the full data.
    pub fn view<R: Rng + ?Sized>(&self, selection: &Selection, rng: &mut R) -> DashboardView {
        let selected = selection.current();
        DashboardView {
            selected: selected.to_string(),
            yield_history: filter_sorted_by_date(&self.yield_series, selected),
            ndvi: filter_sorted_by_date(&self.ndvi_series, selected),
            stress: filter_by_parcel(&self.stress_matrix, selected),
            prediction: predict_yield(&self.yield_series, selected, rng),
        }
    }
}

/// What the charts show for one selected parcel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub selected: String,
    pub yield_history: Vec<YieldPoint>,
    pub ndvi: Vec<NdviPoint>,
    pub stress: Vec<StressBin>,
    pub prediction: Vec<PredictionPoint>,
}
