//! Build identification for support requests

use axum::{extract::State, response::Json};
use serde::Serialize;

use crate::AppState;

/// Values embedded by `build.rs`, plus the limits this instance runs with
#[derive(Debug, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub build_timestamp: &'static str,
    pub build_profile: &'static str,
    /// Largest request body the calculation endpoints accept
    pub max_body_bytes: usize,
}

/// GET /api/buildinfo
pub async fn get_build_info(State(state): State<AppState>) -> Json<BuildInfo> {
    Json(BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: env!("GIT_HASH"),
        build_timestamp: env!("BUILD_TIMESTAMP"),
        build_profile: env!("BUILD_PROFILE"),
        max_body_bytes: state.config.max_body_bytes,
    })
}
