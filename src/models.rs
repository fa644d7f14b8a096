//! Data models for USGS earthquake feed responses.
//!
//! These structures match the GeoJSON format of the summary feeds. Only the
//! fields the map consumes are required to be well-typed; everything else is
//! optional so that a sparse record still renders.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

use crate::errors::QuakemapError;

/// Top-level GeoJSON response from USGS feeds.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    /// Always "FeatureCollection"
    #[serde(rename = "type")]
    pub type_: String,

    /// Feed metadata (absent in hand-written files)
    #[serde(default)]
    pub metadata: Option<Metadata>,

    /// Earthquake events, in feed order
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Validate the response structure.
    ///
    /// # Errors
    ///
    /// Returns [`QuakemapError::InvalidResponse`] if the document is not a
    /// `FeatureCollection`.
    pub fn validate(&self) -> Result<(), QuakemapError> {
        if self.type_ != "FeatureCollection" {
            return Err(QuakemapError::InvalidResponse(format!(
                "expected type 'FeatureCollection', got '{}'",
                self.type_
            )));
        }
        Ok(())
    }

    /// Feed title, if the metadata carries one.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.title.as_deref())
    }
}

/// Metadata about the feed response.
#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    /// Human-readable title
    pub title: Option<String>,

    /// Number of events in response
    pub count: Option<usize>,
}

/// A single earthquake event.
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    /// Unique event ID
    #[serde(default)]
    pub id: Option<String>,

    /// Geographic location
    #[serde(default)]
    pub geometry: Option<Geometry>,

    /// Event properties (`null` is legal GeoJSON and reads as empty)
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: Properties,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Feature {
    /// Get the event time as a `DateTime<Utc>`.
    #[must_use]
    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.properties
            .time
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    }

    fn coordinate(&self, index: usize) -> Option<f64> {
        self.geometry
            .as_ref()
            .and_then(|g| g.coordinates.get(index).copied())
    }

    /// Get longitude (degrees).
    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.coordinate(0).unwrap_or(0.0)
    }

    /// Get latitude (degrees).
    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.coordinate(1).unwrap_or(0.0)
    }

    /// Whether the geometry is a `Point` (or absent). Other kinds are still
    /// drawn, at their first coordinate pair.
    #[must_use]
    pub fn is_point(&self) -> bool {
        self.geometry.as_ref().is_none_or(|g| g.type_ == "Point")
    }

    /// Whether the geometry carries at least a longitude and latitude.
    #[must_use]
    pub fn has_position(&self) -> bool {
        self.coordinate(1).is_some()
    }
}

/// Geographic geometry for an event.
#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    /// Always "Point"
    #[serde(rename = "type")]
    pub type_: String,

    /// Coordinates: [longitude, latitude, depth_km]
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

/// Event properties consumed by the map. Other USGS properties are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Properties {
    /// Magnitude value
    pub mag: Option<f64>,

    /// Human-readable place description
    pub place: Option<String>,

    /// Event time (ms since epoch)
    pub time: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = include_str!("../tests/fixtures/sample_all_day.geojson");

    #[test]
    fn test_parse_sample_feed() {
        let feed: FeatureCollection =
            serde_json::from_str(SAMPLE).expect("failed to parse sample feed");

        feed.validate().expect("invalid feed");
        assert_eq!(feed.features.len(), 4);
        assert_eq!(
            feed.title(),
            Some("USGS All Earthquakes, Past Day")
        );

        let first = &feed.features[0];
        assert_eq!(first.id.as_deref(), Some("ak0238xyz1"));
        assert_eq!(first.properties.place.as_deref(), Some("10km N of Town"));
        assert!((first.latitude() - 61.2).abs() < 1e-9);
        assert!((first.longitude() - (-149.9)).abs() < 1e-9);
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let feed: FeatureCollection =
            serde_json::from_str(r#"{"type":"Feature","features":[]}"#).expect("parse");
        assert!(matches!(
            feed.validate(),
            Err(QuakemapError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_sparse_feature_passes_through() {
        let feed: FeatureCollection = serde_json::from_str(
            r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{"mag":0}}]}"#,
        )
        .expect("parse");
        let feature = &feed.features[0];

        assert_eq!(feature.properties.mag, Some(0.0));
        assert!(feature.properties.place.is_none());
        assert!(feature.time().is_none());
        assert!(!feature.has_position());
        assert!(feature.latitude().abs() < f64::EPSILON);
    }

    #[test]
    fn test_null_properties_pass_through() {
        let feed: FeatureCollection = serde_json::from_str(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":null,"geometry":{"type":"Point","coordinates":[1,2]}},
                {"type":"Feature","properties":{"mag":2.5},"geometry":null}
            ]}"#,
        )
        .expect("null properties parse");

        assert_eq!(feed.features.len(), 2);
        let first = &feed.features[0];
        assert!(first.properties.mag.is_none());
        assert!(first.properties.place.is_none());
        assert!((first.latitude() - 2.0).abs() < f64::EPSILON);
        assert_eq!(feed.features[1].properties.mag, Some(2.5));
        assert!(!feed.features[1].has_position());
    }

    #[test]
    fn test_geometry_kind() {
        let feed: FeatureCollection = serde_json::from_str(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","geometry":{"type":"Point","coordinates":[1,2]}},
                {"type":"Feature","geometry":{"type":"LineString","coordinates":[]}},
                {"type":"Feature"}
            ]}"#,
        )
        .expect("parse");
        let kinds: Vec<_> = feed.features.iter().map(Feature::is_point).collect();
        assert_eq!(kinds, [true, false, true]);
    }

    #[test]
    fn test_time_from_epoch_millis() {
        let feature = Feature {
            id: None,
            geometry: None,
            properties: Properties {
                time: Some(1_700_000_000_000),
                ..Properties::default()
            },
        };
        let time = feature.time().expect("representable");
        assert_eq!(time.to_rfc3339(), "2023-11-14T22:13:20+00:00");
    }
}
