use crate::config::ChartConfig;
use crate::scripts::{dashboard_scripts, D3_URL};
use crate::{embed_json, BASE_CSS};
use agri_data::dashboard::{DashboardData, DashboardView};
use agri_data::popup::html_escape;

const DASHBOARD_CSS: &str = r#"
.controls { margin-bottom: 12px; }
.controls label { margin-right: 8px; font-weight: 600; }
.grid { display: grid; grid-template-columns: repeat(2, minmax(0, 1fr)); gap: 16px; }
"#;

fn parcel_selector(data: &DashboardData, selected: &str) -> String {
    let options: String = data
        .parcels
        .iter()
        .map(|p| {
            let attr = if p == selected { " selected" } else { "" };
            format!(
                r#"<option value="{id}"{attr}>{id}</option>"#,
                id = html_escape(p),
                attr = attr
            )
        })
        .collect();
    format!(
        r#"<div class="controls"><label for="parcel-select">Select a parcel:</label><select id="parcel-select">{}</select></div>"#,
        options
    )
}

/// Build the dashboard document.
///
/// `view` is the initial selection rendered on load; the page rebuilds the
/// view from the embedded full `data` whenever the selector changes.
pub fn render_dashboard(
    data: &DashboardData,
    view: &DashboardView,
    config: &ChartConfig,
) -> anyhow::Result<String> {
    let data_json = embed_json(data, "dashboard data")?;
    let view_json = embed_json(view, "initial view")?;
    let config_json = embed_json(config, "chart config")?;
    log::debug!(
        "render: dashboard for {} parcels, {} bytes of data",
        data.parcels.len(),
        data_json.len()
    );

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{base_css}{css}</style>
    <script src="{d3}"></script>
</head>
<body>
    <h1>{title}</h1>
    {selector}
    <div class="grid">
        <div id="yield-chart"></div>
        <div id="ndvi-chart"></div>
        <div id="stress-chart"></div>
        <div id="prediction-chart"></div>
    </div>
    <script>
{scripts}
initDashboard({data}, {view}, {config});
    </script>
</body>
</html>
"#,
        title = html_escape(&config.title),
        base_css = BASE_CSS,
        css = DASHBOARD_CSS,
        d3 = D3_URL,
        selector = parcel_selector(data, &view.selected),
        scripts = dashboard_scripts(),
        data = data_json,
        view = view_json,
        config = config_json,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use agri_core::StressBin;
    use agri_data::filter::Selection;
    use agri_data::series::YieldPoint;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn data() -> DashboardData {
        let point = |parcel: &str, day: u32, value: f64| YieldPoint {
            parcel_id: parcel.to_string(),
            date: NaiveDate::from_ymd_opt(2022, 6, day).unwrap(),
            estimated_yield: value,
        };
        DashboardData {
            parcels: vec!["P1".to_string(), "P2".to_string()],
            yield_series: vec![point("P1", 2, 6.0), point("P2", 1, 4.0), point("P1", 1, 5.0)],
            ndvi_series: Vec::new(),
            stress_matrix: vec![StressBin {
                parcel_id: "P1".to_string(),
                temperature_bin: 20.0,
                stress_bin: 0.3,
                count: 2,
                normalized_count: 1.0,
            }],
        }
    }

    fn render(selected: &str) -> String {
        let data = data();
        let selection = data.initial_selection().unwrap().select(selected);
        let view = data.view(&selection, &mut ChaCha8Rng::seed_from_u64(4));
        render_dashboard(&data, &view, &ChartConfig::default()).unwrap()
    }

    #[test]
    fn embeds_full_data_and_scripts() {
        let html = render("P1");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(D3_URL));
        assert!(html.contains(r#""date":"2022-06-02""#));
        assert!(html.contains(r#""parcel_id":"P2""#));
        assert!(html.contains("function filterSortedByDate("));
        assert!(html.contains(r#""ndviThreshold":0.5"#));
        assert!(html.contains("initDashboard("));
    }

    #[test]
    fn selector_marks_the_current_parcel() {
        let html = render("P2");
        assert!(html.contains(r#"<option value="P1">P1</option>"#));
        assert!(html.contains(r#"<option value="P2" selected>P2</option>"#));
        assert!(html.contains(r#""selected":"P2""#));
    }

    #[test]
    fn parcel_ids_are_escaped_in_markup() {
        let mut data = data();
        data.parcels = vec!["<P1>".to_string()];
        let selection = Selection::new(data.parcels.clone()).unwrap();
        let view = data.view(&selection, &mut ChaCha8Rng::seed_from_u64(4));
        let html = render_dashboard(&data, &view, &ChartConfig::default()).unwrap();
        assert!(html.contains(r#"<option value="&lt;P1&gt;" selected>&lt;P1&gt;</option>"#));
    }
}
