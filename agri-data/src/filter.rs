//! Parcel selection filtering.
//!
//! Every selection change rebuilds the filtered output from the full
//! dataset; nothing is appended to a previous result. The browser side of
//! the exported documents runs the same rules in JavaScript.

use crate::series::{NdviPoint, YieldPoint};
use agri_core::StressBin;
use chrono::NaiveDate;
use rand::Rng;
use serde::Serialize;

/// Total width of the random band around the actual yield (±2.5%).
pub const PREDICTION_SPREAD: f64 = 0.05;

/// A row that belongs to one parcel.
pub trait ParcelRow {
    fn parcel_id(&self) -> &str;
}

/// A parcel row with a date axis.
pub trait DatedRow: ParcelRow {
    fn date(&self) -> NaiveDate;
}

impl ParcelRow for YieldPoint {
    fn parcel_id(&self) -> &str {
        &self.parcel_id
    }
}

impl DatedRow for YieldPoint {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl ParcelRow for NdviPoint {
    fn parcel_id(&self) -> &str {
        &self.parcel_id
    }
}

impl DatedRow for NdviPoint {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl ParcelRow for StressBin {
    fn parcel_id(&self) -> &str {
        &self.parcel_id
    }
}

/// Rows of `selected`, in their original order.
pub fn filter_by_parcel<T: ParcelRow + Clone>(full: &[T], selected: &str) -> Vec<T> {
    full.iter()
        .filter(|row| row.parcel_id() == selected)
        .cloned()
        .collect()
}

/// Rows of `selected`, sorted ascending by date. Rows sharing a date keep
/// their original relative order.
pub fn filter_sorted_by_date<T: DatedRow + Clone>(full: &[T], selected: &str) -> Vec<T> {
    let mut rows = filter_by_parcel(full, selected);
    rows.sort_by_key(|row| row.date());
    rows
}

/// Actual vs. placeholder forecast yield for one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionPoint {
    pub date: NaiveDate,
    pub actual_yield: f64,
    pub predicted_yield: f64,
}

/// `actual × (1 + PREDICTION_SPREAD × (u − 0.5))` for a uniform draw `u` in [0, 1).
pub fn perturb(actual: f64, u: f64) -> f64 {
    actual * (1.0 + PREDICTION_SPREAD * (u - 0.5))
}

/// Date-sorted yields of `selected`, each paired with a randomly perturbed
/// "prediction". This is a placeholder forecast, not a fitted model; pass a
/// seeded generator to make it reproducible.
pub fn predict_yield<R: Rng + ?Sized>(
    full: &[YieldPoint],
    selected: &str,
    rng: &mut R,
) -> Vec<PredictionPoint> {
    filter_sorted_by_date(full, selected)
        .into_iter()
        .map(|point| PredictionPoint {
            date: point.date,
            actual_yield: point.estimated_yield,
            predicted_yield: perturb(point.estimated_yield, rng.gen::<f64>()),
        })
        .collect()
}

/// The parcel selector: available options and the current choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    options: Vec<String>,
    current: String,
}

impl Selection {
    /// Options are sorted and de-duplicated; the first one is selected.
    /// `None` when there is nothing to select.
    pub fn new(mut options: Vec<String>) -> Option<Self> {
        options.sort();
        options.dedup();
        let current = options.first()?.clone();
        Some(Self { options, current })
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    /// A new selection pointing at `parcel_id`. Values outside the options
    /// are accepted and simply filter down to nothing.
    pub fn select(&self, parcel_id: &str) -> Selection {
        if !self.options.iter().any(|o| o == parcel_id) {
            log::warn!("filter: parcel {} is not among the selectable parcels", parcel_id);
        }
        Selection {
            options: self.options.clone(),
            current: parcel_id.to_string(),
        }
    }
}
