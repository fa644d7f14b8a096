//! Map assembly and page rendering.
//!
//! Composes the base layers, the earthquake overlay, the viewport, the layer
//! control and the legend into a [`MapDescriptor`], then renders it as a
//! self-contained Leaflet page. Leaflet does the actual drawing in the
//! browser; this module only decides what it is asked to draw.

use serde::Serialize;

use crate::client::FeedSource;
use crate::config::{BaseMap, MAX_ZOOM, MapConfig, TILE_ATTRIBUTION};
use crate::errors::QuakemapError;
use crate::legend::{Legend, create_legend};
use crate::markers::{Marker, create_features, escape_html};
use crate::style::MarkerStyle;

/// DOM element the map is mounted into.
pub const MAP_CONTAINER_ID: &str = "map";

/// Layer-control label of the marker overlay.
pub const EARTHQUAKE_OVERLAY: &str = "Earthquakes";

/// Page title when the feed does not name itself.
pub const DEFAULT_TITLE: &str = "Earthquake Map";

const LEAFLET_VERSION: &str = "1.9.4";

/// Everything the browser needs to build the map.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDescriptor {
    pub container: &'static str,
    pub title: String,
    pub center: [f64; 2],
    pub zoom: u8,
    pub base_layers: Vec<BaseLayer>,
    pub overlays: Vec<Overlay>,
    pub layer_control: LayerControl,
    pub legend: Legend,
}

/// A background tile layer. Exactly one is visible at a time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseLayer {
    pub name: &'static str,
    pub url_template: String,
    pub tile_id: &'static str,
    pub attribution: &'static str,
    pub max_zoom: u8,
    pub access_token: String,
    pub visible: bool,
}

/// A toggleable layer drawn above the base layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    pub name: &'static str,
    pub visible: bool,
    pub markers: Vec<CircleMarker>,
}

/// Browser-side form of a [`Marker`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleMarker {
    pub lat_lng: [f64; 2],
    pub style: MarkerStyle,
    pub popup_html: String,
}

impl From<&Marker> for CircleMarker {
    fn from(marker: &Marker) -> Self {
        Self {
            lat_lng: [marker.latitude, marker.longitude],
            style: marker.style,
            popup_html: marker.popup.to_html(),
        }
    }
}

/// Layer switcher options.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LayerControl {
    pub collapsed: bool,
}

impl MapDescriptor {
    /// Name of the base layer shown on load.
    #[must_use]
    pub fn active_base_layer(&self) -> Option<&'static str> {
        self.base_layers.iter().find(|l| l.visible).map(|l| l.name)
    }

    /// The earthquake overlay.
    #[must_use]
    pub fn earthquakes(&self) -> Option<&Overlay> {
        self.overlays.iter().find(|o| o.name == EARTHQUAKE_OVERLAY)
    }

    /// Descriptor as JSON that is safe to embed inside a `<script>` element.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_embedded_json(&self) -> Result<String, QuakemapError> {
        let json = serde_json::to_string(self)?;
        // '<' only occurs inside JSON strings, where the escape is equivalent
        Ok(json.replace('<', "\\u003c"))
    }
}

fn base_layer(base: BaseMap, config: &MapConfig) -> BaseLayer {
    BaseLayer {
        name: base.name(),
        url_template: config.tile_url.clone(),
        tile_id: base.tile_id(),
        attribution: TILE_ATTRIBUTION,
        max_zoom: MAX_ZOOM,
        access_token: config.api_key.clone(),
        visible: base == config.base,
    }
}

/// Compose the map from the markers and configuration.
#[must_use]
pub fn assemble_map(markers: &[Marker], title: &str, config: &MapConfig) -> MapDescriptor {
    MapDescriptor {
        container: MAP_CONTAINER_ID,
        title: title.to_string(),
        center: [config.center.0, config.center.1],
        zoom: config.zoom,
        base_layers: vec![
            base_layer(BaseMap::Light, config),
            base_layer(BaseMap::Dark, config),
        ],
        overlays: vec![Overlay {
            name: EARTHQUAKE_OVERLAY,
            visible: true,
            markers: markers.iter().map(CircleMarker::from).collect(),
        }],
        layer_control: LayerControl { collapsed: false },
        legend: create_legend(),
    }
}

/// Load the feed once and compose a fresh map from it.
///
/// # Errors
///
/// Returns an error if the feed cannot be retrieved or parsed.
pub async fn build_map(source: &FeedSource, config: &MapConfig) -> Result<MapDescriptor, QuakemapError> {
    let feed = source.load().await?;
    let markers = create_features(&feed.features);
    let title = feed.title().unwrap_or(DEFAULT_TITLE);

    Ok(assemble_map(&markers, title, config))
}

/// Render the descriptor as a complete HTML page.
///
/// # Errors
///
/// Returns an error if the descriptor cannot be serialized.
pub fn render_page(map: &MapDescriptor) -> Result<String, QuakemapError> {
    let descriptor = map.to_embedded_json()?;
    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@{LEAFLET_VERSION}/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@{LEAFLET_VERSION}/dist/leaflet.js"></script>
<style>
{PAGE_CSS}
</style>
</head>
<body>
<div id="{container}"></div>
<template id="legend-template">{legend}</template>
<script type="application/json" id="map-descriptor">{descriptor}</script>
<script>
{PAGE_SCRIPT}
</script>
</body>
</html>
"#,
        title = escape_html(&map.title),
        container = map.container,
        legend = map.legend.to_html(),
    ))
}

/// Render a visible failure page for when the feed cannot be loaded.
#[must_use]
pub fn render_error_page(title: &str, error: &QuakemapError) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
{PAGE_CSS}
</style>
</head>
<body>
<div class="load-error" role="alert">
<h1>Earthquake data unavailable</h1>
<p class="kind">{kind}</p>
<pre>{message}</pre>
<p>Reload the page to try again.</p>
</div>
</body>
</html>
"#,
        title = escape_html(title),
        kind = escape_html(error.kind()),
        message = escape_html(&error.to_string()),
    )
}

const PAGE_CSS: &str = r"html, body, #map { height: 100%; margin: 0; padding: 0; }
.legend { background: white; padding: 6px 8px; border-radius: 4px; box-shadow: 0 0 15px rgba(0,0,0,0.2); line-height: 18px; }
.legend ul { list-style: none; margin: 4px 0 0; padding: 0; }
.legend li { padding: 0 10px; color: #222; }
.load-error { max-width: 40rem; margin: 4rem auto; font-family: sans-serif; color: #7a1f1f; }
.load-error .kind { font-weight: bold; text-transform: uppercase; }
.load-error pre { white-space: pre-wrap; background: #fbeaea; padding: 0.75rem; }";

const PAGE_SCRIPT: &str = r#"(function () {
  var d = JSON.parse(document.getElementById('map-descriptor').textContent);
  var baseMaps = {};
  var initial = [];
  d.baseLayers.forEach(function (b) {
    var layer = L.tileLayer(b.urlTemplate, {
      attribution: b.attribution,
      maxZoom: b.maxZoom,
      id: b.tileId,
      accessToken: b.accessToken
    });
    baseMaps[b.name] = layer;
    if (b.visible) { initial.push(layer); }
  });
  var overlayMaps = {};
  d.overlays.forEach(function (o) {
    var group = L.layerGroup(o.markers.map(function (m) {
      return L.circleMarker(m.latLng, m.style).bindPopup(m.popupHtml);
    }));
    overlayMaps[o.name] = group;
    if (o.visible) { initial.push(group); }
  });
  var map = L.map(d.container, { center: d.center, zoom: d.zoom, layers: initial });
  L.control.layers(baseMaps, overlayMaps, { collapsed: d.layerControl.collapsed }).addTo(map);
  var legend = L.control({ position: d.legend.position });
  legend.onAdd = function () {
    var div = L.DomUtil.create('div', 'info legend');
    div.innerHTML = document.getElementById('legend-template').innerHTML;
    return div;
  };
  legend.addTo(map);
})();"#;
