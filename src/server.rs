//! Web server for the earthquake map.
//!
//! Every page load fetches the feed again and renders a fresh map; nothing is
//! cached between requests. A failed fetch is shown as an error page instead
//! of a blank map.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde_json::json;

use crate::client::FeedSource;
use crate::config::MapConfig;
use crate::legend::{Legend, create_legend};
use crate::map::{DEFAULT_TITLE, build_map, render_error_page, render_page};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub source: FeedSource,
    pub map: MapConfig,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    source: Arc<FeedSource>,
    map: Arc<MapConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(source: FeedSource, map: MapConfig) -> Self {
        Self {
            source: Arc::new(source),
            map: Arc::new(map),
        }
    }
}

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/map.json", get(map_json_handler))
        .route("/legend.json", get(legend_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Start the web server.
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(config.source, config.map);
    let app = create_router(state);

    tracing::info!("quakemap serving at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Map page. Responds 502 with a visible error page if the feed fails.
async fn index_handler(State(state): State<AppState>) -> Response {
    let map = match build_map(&state.source, &state.map).await {
        Ok(map) => map,
        Err(e) => {
            tracing::warn!("feed load from {} failed: {}", state.source.describe(), e);
            return (
                StatusCode::BAD_GATEWAY,
                Html(render_error_page(DEFAULT_TITLE, &e)),
            )
                .into_response();
        }
    };

    match render_page(&map) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("failed to render map page: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render_error_page(DEFAULT_TITLE, &e)),
            )
                .into_response()
        }
    }
}

/// Map descriptor as JSON.
async fn map_json_handler(State(state): State<AppState>) -> Response {
    match build_map(&state.source, &state.map).await {
        Ok(map) => Json(map).into_response(),
        Err(e) => {
            tracing::warn!("feed load from {} failed: {}", state.source.describe(), e);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": e.to_string(), "kind": e.kind() })),
            )
                .into_response()
        }
    }
}

/// Static legend.
async fn legend_handler() -> Json<Legend> {
    Json(create_legend())
}

/// Health check endpoint.
async fn health_handler() -> &'static str {
    "OK"
}
