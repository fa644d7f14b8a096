//! Output formatters for styled markers.
//!
//! Supports human-readable (with colors), JSON, NDJSON and GeoJSON formats.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::json;

use crate::legend::Legend;
use crate::markers::Marker;
use crate::style::Color;

// ANSI codes
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const ICON_QUAKE: &str = "🌍";

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Human-readable terminal output (default)
    #[default]
    Human,
    /// JSON array
    Json,
    /// Newline-delimited JSON (one object per line)
    Ndjson,
    /// GeoJSON `FeatureCollection` with style properties
    Geojson,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            "ndjson" => Ok(Self::Ndjson),
            "geojson" => Ok(Self::Geojson),
            _ => Err(format!(
                "unknown format: {s} (expected: human, json, ndjson, geojson)"
            )),
        }
    }
}

/// 24-bit ANSI foreground escape for a `#rrggbb` color.
///
/// Named colors and malformed literals get no escape.
fn ansi_fg(color: Color) -> String {
    let hex = color.as_str();
    let rgb = hex
        .strip_prefix('#')
        .filter(|h| h.len() == 6)
        .and_then(|h| {
            let channel =
                |i: usize| h.get(i..i + 2).and_then(|c| u8::from_str_radix(c, 16).ok());
            Some((channel(0)?, channel(2)?, channel(4)?))
        });

    match rgb {
        Some((r, g, b)) => format!("\x1b[38;2;{r};{g};{b}m"),
        None => String::new(),
    }
}

fn to_io_error(e: serde_json::Error) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e)
}

/// Write markers in human-readable format, tinted with their fill color.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human<W: Write>(writer: &mut W, markers: &[Marker]) -> io::Result<()> {
    for marker in markers {
        let color = ansi_fg(marker.style.fill_color);
        let popup = &marker.popup;

        writeln!(
            writer,
            "{ICON_QUAKE} {color}{BOLD}M{mag:<5}{RESET} │ \
             {DIM}r={radius:>5.1}{RESET} │ \
             {lat:>7.2}, {lon:>8.2} │ \
             {time} │ \
             {place}",
            mag = popup.magnitude,
            radius = marker.style.radius,
            lat = marker.latitude,
            lon = marker.longitude,
            time = popup.time,
            place = popup.place,
        )?;
    }
    Ok(())
}

/// Write markers as a JSON array.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write>(writer: &mut W, markers: &[Marker]) -> io::Result<()> {
    let json = serde_json::to_string_pretty(markers).map_err(to_io_error)?;
    writeln!(writer, "{json}")
}

/// Write markers as newline-delimited JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_ndjson<W: Write>(writer: &mut W, markers: &[Marker]) -> io::Result<()> {
    for marker in markers {
        let json = serde_json::to_string(marker).map_err(to_io_error)?;
        writeln!(writer, "{json}")?;
    }
    Ok(())
}

/// Write markers as a GeoJSON `FeatureCollection`.
///
/// Each Point feature carries the marker style and popup text as properties,
/// which most GeoJSON viewers can use directly.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_geojson<W: Write>(writer: &mut W, markers: &[Marker]) -> io::Result<()> {
    let features: Vec<_> = markers
        .iter()
        .map(|m| {
            json!({
                "type": "Feature",
                "id": m.id,
                "geometry": {
                    "type": "Point",
                    "coordinates": [m.longitude, m.latitude],
                },
                "properties": {
                    "mag": m.magnitude,
                    "popup": m.popup.to_string(),
                    "style": m.style,
                },
            })
        })
        .collect();

    let collection = json!({
        "type": "FeatureCollection",
        "features": features,
    });
    let json = serde_json::to_string_pretty(&collection).map_err(to_io_error)?;
    writeln!(writer, "{json}")
}

/// Write markers in the specified format.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_markers<W: Write>(writer: &mut W, markers: &[Marker], format: Format) -> io::Result<()> {
    match format {
        Format::Human => write_human(writer, markers),
        Format::Json => write_json(writer, markers),
        Format::Ndjson => write_ndjson(writer, markers),
        Format::Geojson => write_geojson(writer, markers),
    }
}

/// Write the legend. Non-human formats emit the entries as JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_legend<W: Write>(writer: &mut W, legend: &Legend, format: Format) -> io::Result<()> {
    match format {
        Format::Human => {
            writeln!(writer, "{BOLD}{}{RESET}", legend.title)?;
            for entry in &legend.entries {
                let color = ansi_fg(entry.color);
                writeln!(writer, "  {color}██{RESET} {:<4} {DIM}{}{RESET}", entry.label, entry.color)?;
            }
            Ok(())
        }
        _ => write_serialized(writer, legend),
    }
}

fn write_serialized<W: Write, T: Serialize>(writer: &mut W, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(to_io_error)?;
    writeln!(writer, "{json}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legend::create_legend;
    use crate::markers::create_features;
    use crate::models::FeatureCollection;
    use crate::style::{GREEN, STROKE_COLOR};

    const SAMPLE: &str = include_str!("../tests/fixtures/sample_all_day.geojson");

    fn sample_markers() -> Vec<Marker> {
        let feed: FeatureCollection = serde_json::from_str(SAMPLE).unwrap();
        create_features(&feed.features)
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("human".parse::<Format>().unwrap(), Format::Human);
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
        assert_eq!("ndjson".parse::<Format>().unwrap(), Format::Ndjson);
        assert_eq!("GeoJSON".parse::<Format>().unwrap(), Format::Geojson);
        assert!("invalid".parse::<Format>().is_err());
    }

    #[test]
    fn test_ansi_fg() {
        assert_eq!(ansi_fg(GREEN), "\x1b[38;2;114;245;66m");
        assert_eq!(ansi_fg(STROKE_COLOR), "");
    }

    #[test]
    fn test_human_one_line_per_marker() {
        let mut buf = Vec::new();
        write_human(&mut buf, &sample_markers()).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(text.lines().count(), 4);
        assert!(text.lines().next().unwrap().contains("10km N of Town"));
    }

    #[test]
    fn test_ndjson_lines_parse() {
        let mut buf = Vec::new();
        write_ndjson(&mut buf, &sample_markers()).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let first: serde_json::Value = serde_json::from_str(text.lines().next().unwrap()).unwrap();
        assert_eq!(first["style"]["fillColor"], "#f56942");
        assert_eq!(first["popup"]["place"], "10km N of Town");
    }

    #[test]
    fn test_geojson_output() {
        let mut buf = Vec::new();
        write_geojson(&mut buf, &sample_markers()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["type"], "FeatureCollection");
        let features = value["features"].as_array().unwrap();
        assert_eq!(features.len(), 4);
        assert_eq!(features[0]["geometry"]["coordinates"][0], -149.9);
        assert_eq!(features[2]["properties"]["style"]["fillColor"], "#f54542");
    }

    #[test]
    fn test_empty_json_array() {
        let mut buf = Vec::new();
        write_markers(&mut buf, &[], Format::Json).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().trim(), "[]");
    }

    #[test]
    fn test_legend_json() {
        let mut buf = Vec::new();
        write_legend(&mut buf, &create_legend(), Format::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["entries"].as_array().unwrap().len(), 6);
        assert_eq!(value["entries"][5]["label"], "5+");
    }
}
