//! Printing intermediate results: parcel list, trend fit, stress matrix.

use crate::input::load_database;
use agri_core::{FeatureProvider, StressBin, TrendResult};
use agri_data::dashboard::parcel_options;
use agri_data::stress::build_stress_matrix;
use agri_data::trend::{estimate_trend, yearly_yields};
use anyhow::Context;
use log::info;
use std::io::Write;

pub fn run_parcels(features: &str) -> anyhow::Result<()> {
    let mut db = load_database(Some(features), None)?;
    db.load_data()?;
    let parcels = parcel_options(&db)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for parcel in &parcels {
        writeln!(out, "{}", parcel)?;
    }
    info!("{} parcels", parcels.len());
    Ok(())
}

fn format_trend(parcel: &str, yearly: &[(i32, f64)], trend: &TrendResult) -> String {
    let mut text = format!(
        "parcel: {}\nyears: {}\nslope: {:.4} t/ha/year\nintercept: {:.4}\nmean relative variation: {:.2}%",
        parcel,
        yearly.len(),
        trend.slope,
        trend.intercept,
        trend.mean_relative_variation * 100.0
    );
    // The zero result carries no fitted line to extend.
    if let Some(&(last_year, _)) = yearly.last().filter(|_| *trend != TrendResult::ZERO) {
        text.push_str(&format!(
            "\nprojected {}: {:.2} t/ha",
            last_year + 1,
            trend.predict(last_year + 1)
        ));
    }
    text
}

pub fn run_trend(history: &str, parcel: &str) -> anyhow::Result<()> {
    let db = load_database(None, Some(history))?;
    let records = db.query_parcel_history(parcel)?;
    if records.is_empty() {
        log::warn!("No yield history for parcel {}", parcel);
    }
    let trend = estimate_trend(parcel, &records);
    let yearly = yearly_yields(parcel, &records);
    println!("{}", format_trend(parcel, &yearly, &trend));
    Ok(())
}

fn write_stress_csv<W: Write>(bins: &[StressBin], writer: W) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for bin in bins {
        writer.serialize(bin)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn run_stress_matrix(features: &str, output: &str) -> anyhow::Result<()> {
    let mut db = load_database(Some(features), None)?;
    db.load_data()?;
    let table = db.prepare_features()?;
    let bins = build_stress_matrix(&table)?;

    let file = std::fs::File::create(output).with_context(|| format!("creating {}", output))?;
    write_stress_csv(&bins, file)?;
    info!("Wrote {} stress bins to {}", bins.len(), output);
    Ok(())
}
