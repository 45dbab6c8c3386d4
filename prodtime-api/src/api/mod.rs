//! HTTP API handlers for prodtime-api

pub mod buildinfo;
pub mod error;
pub mod health;
pub mod tiers;
pub mod totals;

pub use buildinfo::get_build_info;
pub use error::ApiError;
pub use health::health_routes;
pub use tiers::list_tiers;
pub use totals::{folder_totals, production_time, project_totals, tier_analytics, workspace_totals};
