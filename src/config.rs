//! Map configuration.
//!
//! Everything the page needs from the environment is collected here once at
//! startup and passed explicitly into map assembly.

/// Tile URL template shared by both base layers.
pub const DEFAULT_TILE_URL: &str =
    "https://api.tiles.mapbox.com/v4/{id}/{z}/{x}/{y}.png?access_token={accessToken}";

/// Attribution shown in the map corner.
pub const TILE_ATTRIBUTION: &str = "Map data &copy; <a href=\"https://www.openstreetmap.org/\">OpenStreetMap</a> contributors, <a href=\"https://creativecommons.org/licenses/by-sa/2.0/\">CC-BY-SA</a>, Imagery © <a href=\"https://www.mapbox.com/\">Mapbox</a>";

/// Deepest zoom the tile provider serves.
pub const MAX_ZOOM: u8 = 18;

/// Initial viewport: central United States, zoomed out to the whole world.
pub const DEFAULT_CENTER: (f64, f64) = (37.09, -95.71);
pub const DEFAULT_ZOOM: u8 = 2;

/// Which base layer is visible when the page loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaseMap {
    #[default]
    Light,
    Dark,
}

impl BaseMap {
    /// Layer-control label.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
        }
    }

    /// Tile set id substituted into the URL template.
    #[must_use]
    pub const fn tile_id(self) -> &'static str {
        match self {
            Self::Light => "mapbox.light",
            Self::Dark => "mapbox.dark",
        }
    }
}

impl std::str::FromStr for BaseMap {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(format!("unknown base map: {s} (expected: light, dark)")),
        }
    }
}

/// Settings for assembling the map page.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    /// Tile provider access token
    pub api_key: String,
    /// Tile URL template with `{id}`, `{z}`, `{x}`, `{y}` and `{accessToken}`
    pub tile_url: String,
    /// Initial center as (latitude, longitude)
    pub center: (f64, f64),
    pub zoom: u8,
    pub base: BaseMap,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            tile_url: DEFAULT_TILE_URL.to_string(),
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            base: BaseMap::default(),
        }
    }
}

/// Parse a `lat,lon` pair.
///
/// # Errors
///
/// Returns a message if the value is not two numbers in range.
pub fn parse_center(s: &str) -> Result<(f64, f64), String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 2 {
        return Err(format!(
            "center requires 2 values (lat,lon), got {}",
            parts.len()
        ));
    }

    let lat: f64 = parts[0]
        .trim()
        .parse()
        .map_err(|e| format!("invalid latitude: {e}"))?;
    let lon: f64 = parts[1]
        .trim()
        .parse()
        .map_err(|e| format!("invalid longitude: {e}"))?;

    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("latitude {lat} out of range [-90, 90]"));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(format!("longitude {lon} out of range [-180, 180]"));
    }

    Ok((lat, lon))
}
