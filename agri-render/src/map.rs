use crate::config::MapConfig;
use crate::scripts::{LEAFLET_CSS_URL, LEAFLET_HEAT_URL, LEAFLET_JS_URL, MAP_JS};
use crate::{embed_json, BASE_CSS};
use agri_data::layers::MapLayers;
use agri_data::popup::html_escape;

const MAP_CSS: &str = r#"
body { padding: 0; }
h1 { position: absolute; z-index: 1000; left: 56px; top: 8px; background: rgba(255, 255, 255, 0.85); padding: 4px 8px; }
#map { position: absolute; top: 0; bottom: 0; left: 0; right: 0; }
"#;

/// Build the map document: OpenStreetMap tiles, yield and NDVI marker
/// layers, the risk heatmap and a layer switcher.
pub fn render_map(layers: &MapLayers, config: &MapConfig) -> anyhow::Result<String> {
    let layers_json = embed_json(layers, "map layers")?;
    let config_json = embed_json(config, "map config")?;
    log::debug!(
        "render: map with {} yield markers, {} NDVI markers, {} heat points",
        layers.yield_layer.markers.len(),
        layers.ndvi_layer.markers.len(),
        layers.heatmap.len()
    );

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="{leaflet_css}">
    <style>{base_css}{css}</style>
    <script src="{leaflet_js}"></script>
    <script src="{leaflet_heat}"></script>
</head>
<body>
    <h1>{title}</h1>
    <div id="map"></div>
    <script>
{script}
initMap({layers}, {config});
    </script>
</body>
</html>
"#,
        title = html_escape(&config.title),
        leaflet_css = LEAFLET_CSS_URL,
        base_css = BASE_CSS,
        css = MAP_CSS,
        leaflet_js = LEAFLET_JS_URL,
        leaflet_heat = LEAFLET_HEAT_URL,
        script = MAP_JS,
        layers = layers_json,
        config = config_json,
    ))
}
