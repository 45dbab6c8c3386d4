//! Quality tier listing

use axum::Json;
use prodtime_common::tiers::{QualityTier, DEFAULT_TIER, LEGACY_ALIASES};
use serde::Serialize;

/// One rate table entry
#[derive(Debug, Serialize)]
pub struct TierInfo {
    pub tier: QualityTier,
    pub display_name: &'static str,
    pub rate: u32,
    /// Legacy labels that resolve to this tier
    pub aliases: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct TiersResponse {
    pub default_tier: QualityTier,
    pub tiers: Vec<TierInfo>,
}

/// GET /api/tiers
///
/// Returns the rate table so clients never keep their own copy.
pub async fn list_tiers() -> Json<TiersResponse> {
    let tiers = QualityTier::all()
        .iter()
        .map(|tier| TierInfo {
            tier: *tier,
            display_name: tier.display_name(),
            rate: tier.rate(),
            aliases: LEGACY_ALIASES
                .iter()
                .filter(|(_, target)| target == tier)
                .map(|(alias, _)| *alias)
                .collect(),
        })
        .collect();

    Json(TiersResponse {
        default_tier: DEFAULT_TIER,
        tiers,
    })
}
