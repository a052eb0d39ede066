//! Shared utility functions for the agri crates.

/// Date utility functions
pub mod dates {
    use chrono::{Datelike, NaiveDate};

    /// Date format used by the feature and yield history CSV files.
    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(DATE_FORMAT).to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format.
    ///
    /// A trailing time component ("YYYY-MM-DD HH:MM:SS" or an ISO "T"
    /// separator) is tolerated and dropped, since exported feature tables
    /// often carry midnight timestamps.
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        let trimmed = s.trim();
        let day_part = trimmed
            .split(|c: char| c == ' ' || c == 'T')
            .next()
            .unwrap_or(trimmed);
        Ok(NaiveDate::parse_from_str(day_part, DATE_FORMAT)?)
    }

    /// Calendar year of a date; the trend fit works on integer years.
    pub fn year_of(date: &NaiveDate) -> i32 {
        date.year()
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;

        #[test]
        fn test_format_and_parse() {
            let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
            let formatted = format_date(&date);
            assert_eq!(formatted, "2023-06-15");
            let parsed = parse_date(&formatted).unwrap();
            assert_eq!(parsed, date);
        }

        #[test]
        fn test_parse_with_time_component() {
            let expected = NaiveDate::from_ymd_opt(2022, 4, 1).unwrap();
            assert_eq!(parse_date("2022-04-01 00:00:00").unwrap(), expected);
            assert_eq!(parse_date("2022-04-01T00:00:00").unwrap(), expected);
            assert_eq!(parse_date(" 2022-04-01 ").unwrap(), expected);
        }

        #[test]
        fn test_parse_invalid() {
            assert!(parse_date("").is_err());
            assert!(parse_date("20220401").is_err());
            assert!(parse_date("2022-13-01").is_err());
        }

        #[test]
        fn test_year_of() {
            let date = NaiveDate::from_ymd_opt(2021, 12, 31).unwrap();
            assert_eq!(year_of(&date), 2021);
        }
    }
}

/// Small numeric helpers shared by the series preparers.
pub mod stats {
    /// Arithmetic mean, `None` for an empty slice.
    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Smallest and largest value, ignoring NaN. `None` if nothing is left.
    pub fn min_max(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
        values
            .into_iter()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

}
