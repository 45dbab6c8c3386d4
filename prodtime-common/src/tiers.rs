//! Quality tiers and the production rate table
//!
//! A quality tier names a production-effort profile. Each tier maps to a
//! rate: production hours needed per one hour of learner completion time.
//!
//! The table below is the only copy of the rates. Everything that needs a
//! rate reads it through [`rate_for`] or [`QualityTier::rate`].
//!
//! | Tier        | Rate |
//! |-------------|------|
//! | basic       | 150  |
//! | interactive | 200  |
//! | advanced    | 300  |
//! | immersive   | 400  |

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

/// Production-effort profile controlling the completion-to-production multiplier
///
/// Variants are declared in ascending rate order; `Ord` follows that order,
/// which keeps per-tier maps sorted from cheapest to most expensive tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    /// Text and static media (legacy label: `starter`)
    Basic,
    /// Light interactivity, the global default (legacy label: `medium`)
    Interactive,
    /// Rich interactions and assessments
    Advanced,
    /// Simulations and video-heavy content (legacy label: `professional`)
    Immersive,
}

/// Tier used whenever a tier is unknown or nothing in the hierarchy sets one
pub const DEFAULT_TIER: QualityTier = QualityTier::Interactive;

/// Production hours per completion hour, one entry per canonical tier
pub const RATE_TABLE: [(QualityTier, u32); 4] = [
    (QualityTier::Basic, 150),
    (QualityTier::Interactive, 200),
    (QualityTier::Advanced, 300),
    (QualityTier::Immersive, 400),
];

/// Legacy labels still present in stored projects, with their canonical tier
pub const LEGACY_ALIASES: [(&str, QualityTier); 3] = [
    ("starter", QualityTier::Basic),
    ("medium", QualityTier::Interactive),
    ("professional", QualityTier::Immersive),
];

/// Look up the rate for a tier
pub const fn rate_for(tier: QualityTier) -> u32 {
    match tier {
        QualityTier::Basic => RATE_TABLE[0].1,
        QualityTier::Interactive => RATE_TABLE[1].1,
        QualityTier::Advanced => RATE_TABLE[2].1,
        QualityTier::Immersive => RATE_TABLE[3].1,
    }
}

/// Look up the rate for a raw tier label, falling back to the default tier
///
/// # Examples
///
/// ```
/// use prodtime_common::tiers::rate_for_label;
///
/// assert_eq!(rate_for_label(Some("basic")), 150);
/// assert_eq!(rate_for_label(Some("professional")), 400);
/// assert_eq!(rate_for_label(Some("bogus_value")), 200);
/// assert_eq!(rate_for_label(None), 200);
/// ```
pub fn rate_for_label(label: Option<&str>) -> u32 {
    rate_for(QualityTier::normalize(label))
}

impl QualityTier {
    /// Parse a tier label (canonical or legacy alias)
    ///
    /// Matching ignores case and surrounding whitespace. Unknown labels
    /// return `None`; use [`QualityTier::normalize`] for the defaulting form.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_lowercase();
        match label.as_str() {
            "basic" => Some(QualityTier::Basic),
            "interactive" => Some(QualityTier::Interactive),
            "advanced" => Some(QualityTier::Advanced),
            "immersive" => Some(QualityTier::Immersive),
            other => LEGACY_ALIASES
                .iter()
                .find(|(alias, _)| *alias == other)
                .map(|(_, tier)| *tier),
        }
    }

    /// Resolve a possibly missing or unknown label to a tier
    ///
    /// Absent and unknown labels resolve to [`DEFAULT_TIER`].
    pub fn normalize(label: Option<&str>) -> Self {
        match label {
            Some(raw) => Self::from_label(raw).unwrap_or_else(|| {
                debug!("Unknown quality tier '{}', using '{}'", raw, DEFAULT_TIER.as_str());
                DEFAULT_TIER
            }),
            None => DEFAULT_TIER,
        }
    }

    /// Production hours per completion hour for this tier
    pub const fn rate(self) -> u32 {
        rate_for(self)
    }

    /// Canonical lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::Basic => "basic",
            QualityTier::Interactive => "interactive",
            QualityTier::Advanced => "advanced",
            QualityTier::Immersive => "immersive",
        }
    }

    /// Human-readable display name
    pub fn display_name(&self) -> &'static str {
        match self {
            QualityTier::Basic => "Basic",
            QualityTier::Interactive => "Interactive",
            QualityTier::Advanced => "Advanced",
            QualityTier::Immersive => "Immersive",
        }
    }

    /// All canonical tiers in ascending rate order
    pub fn all() -> &'static [QualityTier] {
        &[
            QualityTier::Basic,
            QualityTier::Interactive,
            QualityTier::Advanced,
            QualityTier::Immersive,
        ]
    }
}

impl Default for QualityTier {
    fn default() -> Self {
        DEFAULT_TIER
    }
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot payloads are lenient: an unknown label becomes the default tier
impl<'de> Deserialize<'de> for QualityTier {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(QualityTier::normalize(Some(raw.as_str())))
    }
}

/// Deserialize an optional tier override
///
/// `null`, a missing field and a blank string all mean "not set" so that the
/// next level of the hierarchy decides. Any other string is set, unknown
/// labels included (they resolve to the default tier).
pub fn deserialize_optional<'de, D>(deserializer: D) -> std::result::Result<Option<QualityTier>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| QualityTier::normalize(Some(s))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_table_values() {
        assert_eq!(rate_for(QualityTier::Basic), 150);
        assert_eq!(rate_for(QualityTier::Interactive), 200);
        assert_eq!(rate_for(QualityTier::Advanced), 300);
        assert_eq!(rate_for(QualityTier::Immersive), 400);
    }

    #[test]
    fn test_rate_table_covers_every_tier_once() {
        for tier in QualityTier::all() {
            let hits = RATE_TABLE.iter().filter(|(t, _)| t == tier).count();
            assert_eq!(hits, 1, "tier {} must appear exactly once", tier);
        }
    }

    #[test]
    fn test_legacy_aliases() {
        assert_eq!(QualityTier::from_label("starter"), Some(QualityTier::Basic));
        assert_eq!(QualityTier::from_label("medium"), Some(QualityTier::Interactive));
        assert_eq!(QualityTier::from_label("professional"), Some(QualityTier::Immersive));
    }

    #[test]
    fn test_label_matching_ignores_case_and_whitespace() {
        assert_eq!(QualityTier::from_label("  Advanced "), Some(QualityTier::Advanced));
        assert_eq!(QualityTier::from_label("STARTER"), Some(QualityTier::Basic));
    }

    #[test]
    fn test_unknown_label() {
        assert_eq!(QualityTier::from_label("bogus_value"), None);
        assert_eq!(QualityTier::normalize(Some("bogus_value")), QualityTier::Interactive);
        assert_eq!(QualityTier::normalize(None), QualityTier::Interactive);
        assert_eq!(rate_for_label(Some("")), 200);
    }

    #[test]
    fn test_all_sorted_by_rate() {
        let rates: Vec<u32> = QualityTier::all().iter().map(|t| t.rate()).collect();
        assert_eq!(rates, vec![150, 200, 300, 400]);
        let mut sorted = QualityTier::all().to_vec();
        sorted.sort();
        assert_eq!(sorted, QualityTier::all());
    }

    #[test]
    fn test_serde_uses_canonical_label() {
        let json = serde_json::to_string(&QualityTier::Immersive).unwrap();
        assert_eq!(json, "\"immersive\"");

        let tier: QualityTier = serde_json::from_str("\"professional\"").unwrap();
        assert_eq!(tier, QualityTier::Immersive);

        let tier: QualityTier = serde_json::from_str("\"nonsense\"").unwrap();
        assert_eq!(tier, QualityTier::Interactive);
    }

    #[test]
    fn test_optional_blank_means_unset() {
        #[derive(Deserialize)]
        struct Holder {
            #[serde(default, deserialize_with = "deserialize_optional")]
            tier: Option<QualityTier>,
        }

        let h: Holder = serde_json::from_str(r#"{"tier": "  "}"#).unwrap();
        assert_eq!(h.tier, None);
        let h: Holder = serde_json::from_str(r#"{"tier": null}"#).unwrap();
        assert_eq!(h.tier, None);
        let h: Holder = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(h.tier, None);
        let h: Holder = serde_json::from_str(r#"{"tier": "bogus"}"#).unwrap();
        assert_eq!(h.tier, Some(QualityTier::Interactive));
    }
}
