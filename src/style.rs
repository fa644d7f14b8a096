//! Magnitude-based marker styling.
//!
//! A single threshold ladder decides the fill color of every marker and every
//! legend swatch, so the two can never disagree.

use std::fmt;

use serde::Serialize;

/// A CSS color literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Color(&'static str);

impl Color {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

// Magnitude colors, highest bucket first
pub const RED: Color = Color("#f54542"); // mag >= 5
pub const ORANGE_RED: Color = Color("#f56942"); // mag >= 4
pub const ORANGE: Color = Color("#f59e42"); // mag >= 3
pub const YELLOW: Color = Color("#f5c542"); // mag >= 2
pub const YELLOW_GREEN: Color = Color("#bcf542"); // mag >= 1
pub const GREEN: Color = Color("#72f542"); // mag < 1

/// Marker outline color.
pub const STROKE_COLOR: Color = Color("black");

/// Pixels of radius per unit of magnitude.
pub const RADIUS_SCALE: f64 = 3.0;

/// Smallest radius a marker is drawn with.
pub const MIN_RADIUS: f64 = 1.0;

pub const FILL_OPACITY: f64 = 0.75;
pub const STROKE_WEIGHT: f64 = 1.5;

/// Pick the fill color for a magnitude.
///
/// Thresholds are inclusive lower bounds, so a value exactly on a boundary
/// takes the higher bucket. `NaN` fails every comparison and lands in the
/// lowest bucket, as does negative infinity.
#[must_use]
pub fn choose_color(magnitude: f64) -> Color {
    match magnitude {
        m if m >= 5.0 => RED,
        m if m >= 4.0 => ORANGE_RED,
        m if m >= 3.0 => ORANGE,
        m if m >= 2.0 => YELLOW,
        m if m >= 1.0 => YELLOW_GREEN,
        _ => GREEN,
    }
}

/// Marker radius for a magnitude: linear scale, floored at [`MIN_RADIUS`].
///
/// Non-finite magnitudes get the minimum radius.
#[must_use]
pub fn marker_radius(magnitude: f64) -> f64 {
    let radius = magnitude * RADIUS_SCALE;
    if radius.is_finite() {
        radius.max(MIN_RADIUS)
    } else {
        MIN_RADIUS
    }
}

/// Circle-marker options, serialized with Leaflet's option names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerStyle {
    pub radius: f64,
    pub fill_color: Color,
    pub fill_opacity: f64,
    /// Stroke width
    pub weight: f64,
    /// Stroke color
    pub color: Color,
}

impl MarkerStyle {
    /// Style for a record; a missing magnitude is drawn as the smallest bucket.
    #[must_use]
    pub fn for_magnitude(magnitude: Option<f64>) -> Self {
        let (radius, fill_color) = match magnitude {
            Some(m) => (marker_radius(m), choose_color(m)),
            None => (MIN_RADIUS, GREEN),
        };

        Self {
            radius,
            fill_color,
            fill_opacity: FILL_OPACITY,
            weight: STROKE_WEIGHT,
            color: STROKE_COLOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_ladder() {
        assert_eq!(choose_color(7.1), RED);
        assert_eq!(choose_color(4.9), ORANGE_RED);
        assert_eq!(choose_color(3.5), ORANGE);
        assert_eq!(choose_color(2.2), YELLOW);
        assert_eq!(choose_color(1.9), YELLOW_GREEN);
        assert_eq!(choose_color(0.3), GREEN);
        assert_eq!(choose_color(-1.2), GREEN);
    }

    #[test]
    fn test_boundaries_take_higher_bucket() {
        assert_eq!(choose_color(5.0), RED);
        assert_eq!(choose_color(4.0), ORANGE_RED);
        assert_eq!(choose_color(3.0), ORANGE);
        assert_eq!(choose_color(2.0), YELLOW);
        assert_eq!(choose_color(1.0), YELLOW_GREEN);
        assert_eq!(choose_color(0.999_999), GREEN);
    }

    #[test]
    fn test_non_finite_magnitudes() {
        assert_eq!(choose_color(f64::NAN), GREEN);
        assert_eq!(choose_color(f64::NEG_INFINITY), GREEN);
        assert_eq!(choose_color(f64::INFINITY), RED);

        assert!((marker_radius(f64::NAN) - MIN_RADIUS).abs() < f64::EPSILON);
        assert!((marker_radius(f64::INFINITY) - MIN_RADIUS).abs() < f64::EPSILON);
    }

    #[test]
    fn test_radius_scale_and_floor() {
        assert!((marker_radius(4.2) - 12.6).abs() < 1e-9);
        assert!((marker_radius(0.0) - MIN_RADIUS).abs() < f64::EPSILON);
        assert!((marker_radius(-2.0) - MIN_RADIUS).abs() < f64::EPSILON);
        assert!((marker_radius(0.5) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_equal_magnitudes_equal_styles() {
        assert_eq!(
            MarkerStyle::for_magnitude(Some(3.3)),
            MarkerStyle::for_magnitude(Some(3.3))
        );
    }

    #[test]
    fn test_style_serializes_with_leaflet_names() {
        let style = MarkerStyle::for_magnitude(Some(2.0));
        let json = serde_json::to_value(style).unwrap();

        assert_eq!(json["fillColor"], "#f5c542");
        assert_eq!(json["fillOpacity"], 0.75);
        assert_eq!(json["weight"], 1.5);
        assert_eq!(json["color"], "black");
        assert_eq!(json["radius"], 6.0);
    }

    #[test]
    fn test_missing_magnitude_is_smallest_bucket() {
        let style = MarkerStyle::for_magnitude(None);
        assert_eq!(style.fill_color, GREEN);
        assert!((style.radius - MIN_RADIUS).abs() < f64::EPSILON);
    }
}
