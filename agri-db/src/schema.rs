//! SQL schema definitions for the in-memory SQLite database.

/// Returns the full SQL schema as a single batch string.
///
/// - `features` - feature table rows. No primary key: the source does not
///   guarantee one row per (parcel, date), and duplicates are kept as-is.
///   Every measurement is nullable.
/// - `yield_history` - yield records (parcel, date, yield, optional crop).
///
/// Dates are stored as `YYYY-MM-DD` text so lexical order is date order.
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS features (
        parcelle_id TEXT NOT NULL,
        date TEXT NOT NULL,
        latitude REAL,
        longitude REAL,
        rendement_estime REAL,
        ndvi REAL,
        temperature REAL,
        stress_hydrique REAL,
        culture TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_features_parcel ON features(parcelle_id);
    CREATE INDEX IF NOT EXISTS idx_features_date ON features(date);

    CREATE TABLE IF NOT EXISTS yield_history (
        parcelle_id TEXT NOT NULL,
        date TEXT NOT NULL,
        rendement_estime REAL NOT NULL,
        culture TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_history_parcel ON yield_history(parcelle_id);
    "#
}
