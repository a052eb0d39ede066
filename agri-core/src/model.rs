//! Derived values computed from the feature table. Nothing here is persisted;
//! every value is recomputed from a snapshot on demand.

use serde::Serialize;

/// Linear yield trend of one parcel (yield against calendar year).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TrendResult {
    /// Yield change per year, t/ha/year.
    pub slope: f64,
    pub intercept: f64,
    /// `slope / mean(yield)`, 0 when the mean yield is 0.
    pub mean_relative_variation: f64,
}

impl TrendResult {
    /// The defined result for histories too short or too flat to fit.
    pub const ZERO: TrendResult = TrendResult {
        slope: 0.0,
        intercept: 0.0,
        mean_relative_variation: 0.0,
    };

    /// Fitted yield for a given year.
    pub fn predict(&self, year: i32) -> f64 {
        self.intercept + self.slope * year as f64
    }
}

/// One cell of the temperature × water-stress density matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StressBin {
    pub parcel_id: String,
    /// Lower bound of a 5 °C temperature bin.
    pub temperature_bin: f64,
    /// Lower bound of a 0.1 water-stress bin.
    pub stress_bin: f64,
    pub count: u32,
    /// `count` divided by the largest count over all bins, in [0, 1].
    pub normalized_count: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_trend_is_default() {
        assert_eq!(TrendResult::ZERO, TrendResult::default());
        assert_eq!(TrendResult::ZERO.predict(2024), 0.0);
    }

    #[test]
    fn predict_uses_slope_and_intercept() {
        let trend = TrendResult {
            slope: 1.0,
            intercept: -2015.0,
            mean_relative_variation: 1.0 / 6.0,
        };
        assert!((trend.predict(2023) - 8.0).abs() < 1e-9);
    }
}
