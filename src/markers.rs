//! Feature-to-marker transformation.
//!
//! Turns feed records into styled circle markers, one per record, in feed
//! order. This is not a validation layer: missing fields fall back to
//! placeholders and the record is still drawn.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::Feature;
use crate::style::MarkerStyle;

/// Popup timestamp layout, e.g. `Tue Nov 14 2023 22:13:20 UTC`.
const POPUP_TIME_FORMAT: &str = "%a %b %d %Y %H:%M:%S UTC";

const UNKNOWN_PLACE: &str = "unknown place";
const UNKNOWN_MAGNITUDE: &str = "unknown";
const UNKNOWN_TIME: &str = "unknown time";

/// A circle marker ready for the map overlay.
#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub id: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub magnitude: Option<f64>,
    pub style: MarkerStyle,
    pub popup: Popup,
}

/// Popup content: place, magnitude, time, always in that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Popup {
    pub place: String,
    pub magnitude: String,
    pub time: String,
}

impl Popup {
    fn from_feature(feature: &Feature) -> Self {
        Self {
            place: feature
                .properties
                .place
                .clone()
                .unwrap_or_else(|| UNKNOWN_PLACE.into()),
            magnitude: feature
                .properties
                .mag
                .map_or_else(|| UNKNOWN_MAGNITUDE.into(), |m| m.to_string()),
            time: feature
                .time()
                .map_or_else(|| UNKNOWN_TIME.into(), |t| format_time(&t)),
        }
    }

    /// Popup body as an HTML fragment.
    #[must_use]
    pub fn to_html(&self) -> String {
        format!(
            "<h3>{}</h3>Magnitude: <b>{}</b><hr><p>{}</p>",
            escape_html(&self.place),
            escape_html(&self.magnitude),
            escape_html(&self.time)
        )
    }
}

impl fmt::Display for Popup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | Magnitude: {} | {}",
            self.place, self.magnitude, self.time
        )
    }
}

/// Render an event time for display.
#[must_use]
pub fn format_time(time: &DateTime<Utc>) -> String {
    time.format(POPUP_TIME_FORMAT).to_string()
}

impl From<&Feature> for Marker {
    fn from(feature: &Feature) -> Self {
        Self {
            id: feature.id.clone(),
            latitude: feature.latitude(),
            longitude: feature.longitude(),
            magnitude: feature.properties.mag,
            style: MarkerStyle::for_magnitude(feature.properties.mag),
            popup: Popup::from_feature(feature),
        }
    }
}

/// Build one marker per record, preserving input order.
#[must_use]
pub fn create_features(features: &[Feature]) -> Vec<Marker> {
    let markers: Vec<Marker> = features.iter().map(Marker::from).collect();

    let unplaced = features.iter().filter(|f| !f.has_position()).count();
    if unplaced > 0 {
        tracing::warn!("{} records have no coordinates, drawn at 0,0", unplaced);
    }
    let non_point = features.iter().filter(|f| !f.is_point()).count();
    if non_point > 0 {
        tracing::warn!("{} records are not Point geometries", non_point);
    }
    tracing::debug!("built {} markers", markers.len());

    markers
}

/// Escape text for inclusion in HTML element content or attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
