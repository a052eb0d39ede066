//! Dashboard and map document generation.

use crate::input::{load_database, make_rng};
use agri_data::dashboard::DashboardData;
use agri_data::layers::MapLayers;
use agri_render::{render_dashboard, render_map, ChartConfig, MapConfig};
use anyhow::Context;
use log::info;

/// Build the dashboard for the first parcel and write it to `output`.
pub fn run_dashboard(
    features: &str,
    history: &str,
    output: &str,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let mut db = load_database(Some(features), Some(history))?;
    let mut rng = make_rng(seed);

    let data = DashboardData::build(&mut db).context("preparing dashboard data")?;
    let selection = data
        .initial_selection()
        .context("no parcel available for the dashboard")?;
    info!(
        "Dashboard: {} parcels, initial selection {}",
        data.parcels.len(),
        selection.current()
    );
    let view = data.view(&selection, &mut rng);

    let html = render_dashboard(&data, &view, &ChartConfig::default())?;
    std::fs::write(output, html).with_context(|| format!("writing {}", output))?;
    info!("Dashboard written to {}", output);
    Ok(())
}

/// Build the map layers and write the map document to `output`.
pub fn run_map(
    features: &str,
    history: &str,
    output: &str,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let mut db = load_database(Some(features), Some(history))?;
    let mut rng = make_rng(seed);

    let layers = MapLayers::build(&mut db, &mut rng).context("preparing map layers")?;
    info!(
        "Map: centre ({:.5}, {:.5}), {} yield markers, {} NDVI markers, {} heat points",
        layers.center.0,
        layers.center.1,
        layers.yield_layer.markers.len(),
        layers.ndvi_layer.markers.len(),
        layers.heatmap.len()
    );

    let html = render_map(&layers, &MapConfig::default())?;
    std::fs::write(output, html).with_context(|| format!("writing {}", output))?;
    info!("Map written to {}", output);
    Ok(())
}
