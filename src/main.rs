//! quakemap - Live earthquake map from the USGS feed.
//!
//! Fetches the USGS GeoJSON summary feed, styles each event by magnitude and
//! renders an interactive Leaflet map with a legend and switchable base
//! layers, as a static page or from a small web server.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

mod cli;
mod client;
mod config;
mod errors;
mod legend;
mod map;
mod markers;
mod models;
mod output;
mod server;
mod style;

use cli::{Cli, Command};
use client::FeedSource;
use config::MapConfig;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Render(args) => cmd_render(args),
        Command::Markers(args) => cmd_markers(args),
        Command::Legend(args) => cmd_legend(&args),
        Command::Serve(args) => cmd_serve(args),
    }
}

/// Initialize tracing subscriber.
fn init_tracing(verbose: bool, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Single-threaded runtime for the one-shot commands: one fetch, then a
/// synchronous render pass.
fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")
}

fn warn_missing_api_key(config: &MapConfig) {
    if config.api_key.is_empty() {
        tracing::warn!("no tile access token set (--api-key or QUAKEMAP_API_KEY); base layers may not load");
    }
}

/// Execute the `render` command - write the map page once.
fn cmd_render(args: cli::RenderArgs) -> Result<()> {
    let config = args.map.to_config();
    warn_missing_api_key(&config);

    let source = FeedSource::new(args.feed.input, args.feed.feed)
        .context("failed to create feed client")?;

    let built = runtime()?.block_on(map::build_map(&source, &config));

    let (page, outcome) = match built {
        Ok(descriptor) => {
            let page = map::render_page(&descriptor).context("failed to render map page")?;
            let count = descriptor.earthquakes().map_or(0, |o| o.markers.len());
            tracing::info!(
                "rendered {} earthquakes from {} on the {} base layer",
                count,
                source.describe(),
                descriptor.active_base_layer().unwrap_or("default")
            );
            (page, Ok(()))
        }
        Err(e) => {
            // Still emit a page so the failure is visible where the map would be
            let page = map::render_error_page(map::DEFAULT_TITLE, &e);
            let err = anyhow::Error::new(e)
                .context(format!("failed to load feed from {}", source.describe()));
            (page, Err(err))
        }
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, page)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!("wrote {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(page.as_bytes())?;
            handle.flush()?;
        }
    }

    outcome
}

/// Execute the `markers` command - print styled markers.
fn cmd_markers(args: cli::MarkersArgs) -> Result<()> {
    let source = FeedSource::new(args.feed.input, args.feed.feed)
        .context("failed to create feed client")?;

    let feed = runtime()?
        .block_on(source.load())
        .with_context(|| format!("failed to load feed from {}", source.describe()))?;

    let markers = markers::create_features(&feed.features);

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    output::write_markers(&mut handle, &markers, args.format)?;

    Ok(())
}

/// Execute the `legend` command.
fn cmd_legend(args: &cli::LegendArgs) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    output::write_legend(&mut handle, &legend::create_legend(), args.format)?;
    Ok(())
}

/// Execute the `serve` command - start web server.
fn cmd_serve(args: cli::ServeArgs) -> Result<()> {
    let map = args.map.to_config();
    warn_missing_api_key(&map);

    let source = FeedSource::new(args.feed.input, args.feed.feed)
        .context("failed to create feed client")?;

    let url = format!("http://{}:{}", args.host, args.port);
    println!("\x1b[1m🌍 quakemap\x1b[0m");
    println!("\x1b[2m───────────────────────────────────────\x1b[0m");
    println!("  Local:   \x1b[96m{url}\x1b[0m");
    println!("  Feed:    {}", source.describe());
    println!("\x1b[2m───────────────────────────────────────\x1b[0m");
    println!("\x1b[2mPress Ctrl+C to stop\x1b[0m\n");

    let config = server::ServerConfig {
        port: args.port,
        host: args.host,
        source,
        map,
    };

    // Open browser if requested (using xdg-open/open command)
    if args.open {
        #[cfg(target_os = "linux")]
        let _ = std::process::Command::new("xdg-open").arg(&url).spawn();
        #[cfg(target_os = "macos")]
        let _ = std::process::Command::new("open").arg(&url).spawn();
        #[cfg(target_os = "windows")]
        let _ = std::process::Command::new("cmd").args(["/c", "start", &url]).spawn();
    }

    tokio::runtime::Runtime::new()
        .context("failed to create tokio runtime")?
        .block_on(server::run_server(config))
}
