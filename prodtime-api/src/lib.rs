//! prodtime-api library - production-time service and report rendering
//!
//! Exposes the production-time aggregator over HTTP for the web application
//! (previews, PDF exports, analytics) and renders text reports for the
//! command-line tool.

use axum::extract::DefaultBodyLimit;
use axum::Router;
use prodtime_common::config::TomlConfig;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod logging;
pub mod report;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Bootstrap configuration the service was started with
    pub config: Arc<TomlConfig>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: TomlConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let max_body_bytes = state.config.max_body_bytes;

    let calculations = Router::new()
        .route("/api/tiers", get(api::list_tiers))
        .route("/api/production-time", post(api::production_time))
        .route("/api/totals/project", post(api::project_totals))
        .route("/api/totals/folder", post(api::folder_totals))
        .route("/api/totals/workspace", post(api::workspace_totals))
        .route("/api/analytics/tiers", post(api::tier_analytics))
        .layer(DefaultBodyLimit::max(max_body_bytes));

    let public = Router::new()
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes());

    Router::new()
        .merge(calculations)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
