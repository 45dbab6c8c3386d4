//! Production-time calculation endpoints
//!
//! Each endpoint takes a snapshot fetched by the caller and returns derived
//! totals. Nothing is stored; every request recomputes from lesson fields.

use axum::Json;
use prodtime_common::aggregate::{
    aggregate_folder_checked, aggregate_forest, aggregate_project, preview_lesson, FolderReport,
    ForestReport, LessonReport, ProjectReport,
};
use prodtime_common::totals::{AggregateTotals, TierBreakdown};
use prodtime_common::tree::{Folder, Lesson, Project, Snapshot, Workspace};
use serde::Serialize;
use tracing::debug;

use super::ApiError;

/// Tier analytics for any snapshot kind
#[derive(Debug, Serialize)]
pub struct TierAnalyticsResponse {
    pub totals: AggregateTotals,
    pub breakdown: Vec<TierBreakdown>,
}

/// POST /api/production-time
///
/// Single-lesson preview: only the lesson's own tier or custom rate apply.
pub async fn production_time(Json(lesson): Json<Lesson>) -> Json<LessonReport> {
    Json(preview_lesson(&lesson))
}

/// POST /api/totals/project
pub async fn project_totals(Json(project): Json<Project>) -> Json<ProjectReport> {
    debug!(
        "Project totals requested for '{}' ({} lessons)",
        project.name,
        project.lesson_count()
    );
    Json(aggregate_project(&project, None))
}

/// POST /api/totals/folder
///
/// Rejects snapshots in which a folder id repeats.
pub async fn folder_totals(Json(folder): Json<Folder>) -> Result<Json<FolderReport>, ApiError> {
    debug!(
        "Folder totals requested for '{}' ({} folders)",
        folder.name,
        folder.folder_count()
    );
    Ok(Json(aggregate_folder_checked(&folder)?))
}

/// POST /api/totals/workspace
///
/// Flat folder/project listing; cycles and dangling references are errors.
pub async fn workspace_totals(
    Json(workspace): Json<Workspace>,
) -> Result<Json<ForestReport>, ApiError> {
    let forest = workspace.into_forest()?;
    Ok(Json(aggregate_forest(&forest)))
}

/// POST /api/analytics/tiers
///
/// Breakdown of completion and production time by tier for any snapshot.
pub async fn tier_analytics(
    Json(snapshot): Json<Snapshot>,
) -> Result<Json<TierAnalyticsResponse>, ApiError> {
    let report = prodtime_common::aggregate(&snapshot)?;
    let totals = report.totals().clone();

    Ok(Json(TierAnalyticsResponse {
        breakdown: totals.tier_breakdown(),
        totals,
    }))
}
