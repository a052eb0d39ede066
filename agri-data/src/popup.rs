//! HTML popup content for map markers.

use agri_core::{FeatureRecord, TrendResult};
use agri_utils::dates::year_of;

/// Returned when a yield summary cannot be built.
pub const YIELD_POPUP_FALLBACK: &str = "<div>Error creating popup content.</div>";

/// Returned when an NDVI reading cannot be formatted.
pub const NDVI_POPUP_FALLBACK: &str = "<div>Error creating NDVI popup content.</div>";

const BLOCK_STYLE: &str = "font-family: Arial, sans-serif; font-size: 12px;";
const TITLE_STYLE: &str = "margin: 0; color: #2c3e50;";
const TEXT_STYLE: &str = "margin: 0; color: #34495e;";
const SECTION_STYLE: &str = "margin-top: 10px; margin-bottom: 5px; color: #2c3e50;";
const LIST_STYLE: &str = "margin: 0; padding-left: 15px;";

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// `"{year}: {crop}"` entries, most recent year first.
///
/// One entry per (year, crop) pair; rows without a crop are ignored.
/// Crops of the same year keep their date order.
pub fn format_recent_crops(history: &[FeatureRecord]) -> Vec<String> {
    let mut rows: Vec<(i32, &FeatureRecord)> = history
        .iter()
        .filter(|r| r.crop_type.is_some())
        .map(|r| (year_of(&r.date), r))
        .collect();
    rows.sort_by_key(|(_, r)| r.date);

    let mut seen: Vec<(i32, &str)> = Vec::new();
    for (year, record) in rows {
        let crop = record.crop_type.as_deref().unwrap_or_default();
        if !seen.contains(&(year, crop)) {
            seen.push((year, crop));
        }
    }
    seen.sort_by(|a, b| b.0.cmp(&a.0));
    seen.into_iter()
        .map(|(year, crop)| format!("{}: {}", year, crop))
        .collect()
}

/// First yield reading of each calendar year, chronological.
pub fn yearly_history(history: &[FeatureRecord]) -> Vec<(i32, f64)> {
    let mut rows: Vec<&FeatureRecord> = history
        .iter()
        .filter(|r| r.estimated_yield.is_some())
        .collect();
    rows.sort_by_key(|r| r.date);

    let mut yearly: Vec<(i32, f64)> = Vec::new();
    for row in rows {
        let year = year_of(&row.date);
        if yearly.last().map(|(y, _)| *y) != Some(year) {
            yearly.push((year, row.estimated_yield.unwrap_or_default()));
        }
    }
    yearly
}

fn list(items: impl IntoIterator<Item = String>) -> String {
    let body: String = items
        .into_iter()
        .map(|item| format!("<li>{}</li>", item))
        .collect();
    format!(r#"<ul style="{}">{}</ul>"#, LIST_STYLE, body)
}

/// Summary block for a parcel: mean yield, trend, recent crops and the
/// yearly yield history. Falls back to [`YIELD_POPUP_FALLBACK`] for an
/// empty history or a non-finite mean.
pub fn format_yield_summary(
    history: &[FeatureRecord],
    mean_yield: f64,
    trend: &TrendResult,
) -> String {
    let first = match history.first() {
        Some(first) => first,
        None => {
            log::warn!("popup: empty history, cannot build yield summary");
            return YIELD_POPUP_FALLBACK.to_string();
        }
    };
    if !mean_yield.is_finite() {
        log::warn!("popup: parcel {} has no mean yield", first.parcel_id);
        return YIELD_POPUP_FALLBACK.to_string();
    }

    let mut html = format!(r#"<div style="{}">"#, BLOCK_STYLE);
    html.push_str(&format!(
        r#"<h4 style="{}">Parcel ID: {}</h4>"#,
        TITLE_STYLE,
        html_escape(&first.parcel_id)
    ));
    html.push_str(&format!(
        r#"<p style="{}">Mean yield: {:.2} t/ha</p>"#,
        TEXT_STYLE, mean_yield
    ));
    html.push_str(&format!(r#"<p style="{}">Trend:</p>"#, TEXT_STYLE));
    html.push_str(&list([
        format!("Slope: {:.2} t/ha/year", trend.slope),
        format!("Intercept: {:.2}", trend.intercept),
        format!(
            "Mean relative variation: {:.2}%",
            trend.mean_relative_variation * 100.0
        ),
    ]));

    let recent_crops = format_recent_crops(history);
    if !recent_crops.is_empty() {
        html.push_str(&format!(r#"<h5 style="{}">Recent crops:</h5>"#, SECTION_STYLE));
        html.push_str(&list(recent_crops.iter().map(|c| html_escape(c))));
    }

    html.push_str(&format!(r#"<h5 style="{}">Yield history:</h5>"#, SECTION_STYLE));
    html.push_str(&list(
        yearly_history(history)
            .into_iter()
            .map(|(year, value)| format!("{}: {:.2} t/ha", year, value)),
    ));
    html.push_str("</div>");
    html
}

/// Reading block for one NDVI marker. Falls back to
/// [`NDVI_POPUP_FALLBACK`] when NDVI or coordinates are missing.
pub fn format_ndvi_point(record: &FeatureRecord) -> String {
    let (ndvi, (lat, lon)) = match (record.ndvi, record.coordinates()) {
        (Some(ndvi), Some(coords)) => (ndvi, coords),
        _ => {
            log::warn!("popup: NDVI reading of {} is incomplete", record.parcel_id);
            return NDVI_POPUP_FALLBACK.to_string();
        }
    };
    format!(
        concat!(
            r#"<div style="{block}">"#,
            r#"<h4 style="{title}">Parcel ID: {id}</h4>"#,
            r#"<p style="{text}">Latitude: {lat:.5}</p>"#,
            r#"<p style="{text}">Longitude: {lon:.5}</p>"#,
            r#"<p style="{text}">NDVI: {ndvi:.2}</p>"#,
            "</div>"
        ),
        block = BLOCK_STYLE,
        title = TITLE_STYLE,
        text = TEXT_STYLE,
        id = html_escape(&record.parcel_id),
        lat = lat,
        lon = lon,
        ndvi = ndvi,
    )
}
