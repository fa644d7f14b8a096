//! Command-line interface definitions.
//!
//! Uses clap derive API for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::client::FeedType;
use crate::config::{BaseMap, DEFAULT_TILE_URL, DEFAULT_ZOOM, MAX_ZOOM, MapConfig, parse_center};
use crate::output::Format;

/// Live earthquake map from the USGS feed.
#[derive(Parser, Debug)]
#[command(name = "quakemap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    pub quiet: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the map as a self-contained HTML page
    Render(RenderArgs),

    /// Print the styled markers without rendering a page
    Markers(MarkersArgs),

    /// Print the magnitude legend
    Legend(LegendArgs),

    /// Serve the map over HTTP, re-fetching on every page load
    Serve(ServeArgs),
}

/// Where the feed comes from.
#[derive(Args, Debug)]
pub struct FeedArgs {
    /// Feed type to fetch
    #[arg(long, default_value = "all_day", value_parser = parse_feed_type)]
    pub feed: FeedType,

    /// Read the feed from a GeoJSON file instead of fetching it
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,
}

/// Map page settings.
#[derive(Args, Debug)]
pub struct MapArgs {
    /// Tile provider access token
    #[arg(long, env = "QUAKEMAP_API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    /// Tile URL template
    #[arg(long, default_value = DEFAULT_TILE_URL)]
    pub tile_url: String,

    /// Initial map center: lat,lon
    #[arg(long, default_value = "37.09,-95.71", value_parser = parse_center, allow_hyphen_values = true)]
    pub center: (f64, f64),

    /// Initial zoom level
    #[arg(long, default_value_t = DEFAULT_ZOOM, value_parser = clap::value_parser!(u8).range(0..=i64::from(MAX_ZOOM)))]
    pub zoom: u8,

    /// Base layer shown on load (light or dark)
    #[arg(long, default_value = "light", value_parser = parse_base_map)]
    pub base: BaseMap,
}

impl MapArgs {
    /// Collect the flags into a [`MapConfig`].
    #[must_use]
    pub fn to_config(&self) -> MapConfig {
        MapConfig {
            api_key: self.api_key.clone(),
            tile_url: self.tile_url.clone(),
            center: self.center,
            zoom: self.zoom,
            base: self.base,
        }
    }
}

/// Arguments for the `render` command.
#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub feed: FeedArgs,

    #[command(flatten)]
    pub map: MapArgs,

    /// Write the page here instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Arguments for the `markers` command.
#[derive(Args, Debug)]
pub struct MarkersArgs {
    #[command(flatten)]
    pub feed: FeedArgs,

    /// Output format
    #[arg(long, short = 'f', default_value = "human", value_parser = parse_format)]
    pub format: Format,
}

/// Arguments for the `legend` command.
#[derive(Args, Debug)]
pub struct LegendArgs {
    /// Output format (human or json)
    #[arg(long, short = 'f', default_value = "human", value_parser = parse_format)]
    pub format: Format,
}

/// Arguments for the `serve` command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, short = 'p', default_value = "8080")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    #[command(flatten)]
    pub feed: FeedArgs,

    #[command(flatten)]
    pub map: MapArgs,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

/// Parse a feed type from string.
fn parse_feed_type(s: &str) -> Result<FeedType, String> {
    s.parse()
}

/// Parse an output format from string.
fn parse_format(s: &str) -> Result<Format, String> {
    s.parse()
}

/// Parse a base map name from string.
fn parse_base_map(s: &str) -> Result<BaseMap, String> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_render_defaults() {
        let cli = Cli::try_parse_from(["quakemap", "render"]).unwrap();
        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };

        assert_eq!(args.feed.feed, FeedType::AllDay);
        assert!(args.feed.input.is_none());
        assert!(args.output.is_none());

        let config = args.map.to_config();
        assert_eq!(config.center, (37.09, -95.71));
        assert_eq!(config.zoom, 2);
        assert_eq!(config.base, BaseMap::Light);
        assert_eq!(config.tile_url, DEFAULT_TILE_URL);
    }

    #[test]
    fn test_map_flags() {
        let cli = Cli::try_parse_from([
            "quakemap",
            "serve",
            "--api-key",
            "pk.abc",
            "--base",
            "dark",
            "--center",
            "35.0,139.0",
            "--zoom",
            "5",
            "--input",
            "feed.geojson",
        ])
        .unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };

        let config = args.map.to_config();
        assert_eq!(config.api_key, "pk.abc");
        assert_eq!(config.base, BaseMap::Dark);
        assert_eq!(config.zoom, 5);
        assert_eq!(args.feed.input, Some(PathBuf::from("feed.geojson")));
        assert_eq!(args.port, 8080);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Cli::try_parse_from(["quakemap", "render", "--zoom", "19"]).is_err());
        assert!(Cli::try_parse_from(["quakemap", "render", "--feed", "all_year"]).is_err());
        assert!(Cli::try_parse_from(["quakemap", "markers", "-f", "xml"]).is_err());
    }
}
