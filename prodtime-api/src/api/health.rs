//! Liveness probe for the web application and deployment checks

use axum::{routing::get, Json, Router};
use prodtime_common::tiers::{QualityTier, DEFAULT_TIER};
use serde::Serialize;

use crate::AppState;

/// Liveness response; also reports which rate table is loaded
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    pub default_tier: QualityTier,
    pub tier_count: usize,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        module: "prodtime-api",
        version: env!("CARGO_PKG_VERSION"),
        default_tier: DEFAULT_TIER,
        tier_count: QualityTier::all().len(),
    })
}

/// Routes that stay reachable regardless of body limits
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
