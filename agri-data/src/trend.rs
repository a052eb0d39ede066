//! Per-parcel yield trend: ordinary least squares of yield on calendar year.

use agri_core::{TrendResult, YieldHistoryRecord};
use agri_utils::dates::year_of;
use agri_utils::stats::mean;

/// One (year, yield) pair per calendar year for a parcel, in year order.
///
/// The history is ordered by date first and the earliest record of each
/// year is kept, so the result does not depend on input order.
pub fn yearly_yields(parcel_id: &str, history: &[YieldHistoryRecord]) -> Vec<(i32, f64)> {
    let mut rows: Vec<&YieldHistoryRecord> = history
        .iter()
        .filter(|r| r.parcel_id == parcel_id && r.estimated_yield.is_finite())
        .collect();
    rows.sort_by_key(|r| r.date);

    let mut yearly: Vec<(i32, f64)> = Vec::with_capacity(rows.len());
    for row in rows {
        let year = year_of(&row.date);
        if yearly.last().map(|(y, _)| *y) != Some(year) {
            yearly.push((year, row.estimated_yield));
        }
    }
    yearly
}

/// Closed-form single predictor least squares.
///
/// Returns `(slope, intercept)` with `slope = cov(x, y) / var(x)` and
/// `intercept = mean(y) - slope * mean(x)`, or `None` when `x` has no spread.
pub fn fit_ols(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut variance = 0.0;
    for (x, y) in points {
        let dx = x - mean_x;
        covariance += dx * (y - mean_y);
        variance += dx * dx;
    }
    if variance == 0.0 {
        return None;
    }
    let slope = covariance / variance;
    Some((slope, mean_y - slope * mean_x))
}

/// Fit the yield trend of `parcel_id` from its history.
///
/// Fewer than two distinct years, or a yield that never changes, give
/// [`TrendResult::ZERO`].
pub fn estimate_trend(parcel_id: &str, history: &[YieldHistoryRecord]) -> TrendResult {
    let yearly = yearly_yields(parcel_id, history);
    if yearly.len() < 2 {
        log::debug!("trend: {} has {} distinct year(s), no fit", parcel_id, yearly.len());
        return TrendResult::ZERO;
    }
    let first_yield = yearly[0].1;
    if yearly.iter().all(|(_, y)| *y == first_yield) {
        log::debug!("trend: {} has a constant yield, no fit", parcel_id);
        return TrendResult::ZERO;
    }

    let points: Vec<(f64, f64)> = yearly.iter().map(|(year, y)| (*year as f64, *y)).collect();
    let (slope, intercept) = match fit_ols(&points) {
        Some(fit) => fit,
        None => return TrendResult::ZERO,
    };
    let yields: Vec<f64> = yearly.iter().map(|(_, y)| *y).collect();
    let mean_yield = mean(&yields).unwrap_or(0.0);
    let mean_relative_variation = if mean_yield != 0.0 { slope / mean_yield } else { 0.0 };

    TrendResult {
        slope,
        intercept,
        mean_relative_variation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(parcel: &str, year: i32, month: u32, value: f64) -> YieldHistoryRecord {
        YieldHistoryRecord {
            parcel_id: parcel.to_string(),
            date: NaiveDate::from_ymd_opt(year, month, 1).unwrap(),
            estimated_yield: value,
            crop_type: None,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn fits_a_perfect_line() {
        let history = vec![
            row("P1", 2020, 7, 5.0),
            row("P1", 2021, 7, 6.0),
            row("P1", 2022, 7, 7.0),
        ];
        let trend = estimate_trend("P1", &history);
        assert!(close(trend.slope, 1.0));
        assert!(close(trend.intercept, -2015.0));
        assert!(close(trend.mean_relative_variation, 1.0 / 6.0));
    }

    #[test]
    fn ignores_other_parcels_and_input_order() {
        let history = vec![
            row("P1", 2022, 7, 7.0),
            row("P2", 2021, 7, 100.0),
            row("P1", 2020, 7, 5.0),
            row("P1", 2021, 7, 6.0),
        ];
        let trend = estimate_trend("P1", &history);
        assert!(close(trend.slope, 1.0));
    }

    #[test]
    fn keeps_the_earliest_record_of_each_year() {
        let history = vec![
            row("P1", 2020, 9, 50.0),
            row("P1", 2020, 3, 5.0),
            row("P1", 2021, 3, 6.0),
            row("P1", 2022, 3, 7.0),
        ];
        assert_eq!(
            yearly_yields("P1", &history),
            vec![(2020, 5.0), (2021, 6.0), (2022, 7.0)]
        );
        assert!(close(estimate_trend("P1", &history).slope, 1.0));
    }

    #[test]
    fn single_year_is_zero_trend() {
        let history = vec![row("P1", 2020, 3, 5.0), row("P1", 2020, 9, 8.0)];
        assert_eq!(estimate_trend("P1", &history), TrendResult::ZERO);
    }

    #[test]
    fn constant_yield_is_zero_trend() {
        let history = vec![
            row("P1", 2020, 7, 6.0),
            row("P1", 2021, 7, 6.0),
            row("P1", 2022, 7, 6.0),
        ];
        assert_eq!(estimate_trend("P1", &history), TrendResult::ZERO);
    }

    #[test]
    fn unknown_parcel_is_zero_trend() {
        let history = vec![row("P1", 2020, 7, 5.0), row("P1", 2021, 7, 6.0)];
        assert_eq!(estimate_trend("P9", &history), TrendResult::ZERO);
    }

    #[test]
    fn zero_mean_yield_has_zero_relative_variation() {
        let history = vec![row("P1", 2020, 7, -1.0), row("P1", 2021, 7, 1.0)];
        let trend = estimate_trend("P1", &history);
        assert!(close(trend.slope, 2.0));
        assert_eq!(trend.mean_relative_variation, 0.0);
    }

    #[test]
    fn fit_ols_matches_closed_form() {
        // scattered points around a rising line
        let points = vec![(0.0, 1.5), (1.0, 2.5), (2.0, 5.5), (3.0, 6.5)];
        let (slope, intercept) = fit_ols(&points).unwrap();
        assert!(close(slope, 1.8));
        assert!(close(intercept, 1.3));
        assert_eq!(fit_ols(&[(1.0, 1.0), (1.0, 2.0)]), None);
        assert_eq!(fit_ols(&[(1.0, 1.0)]), None);
    }
}
