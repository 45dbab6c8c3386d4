//! Effective tier and rate resolution
//!
//! The rate for a lesson is the first one set while walking
//! lesson → section → project → folder default → global default.
//! At each level an explicit custom rate beats that level's tier.
//!
//! The tier used for per-tier bucketing is the first tier set along the same
//! walk, so a custom rate is reported under the nearest tier at or above the
//! level that supplied it.

use crate::tiers::{QualityTier, DEFAULT_TIER};
use crate::tree::{Lesson, Project, Section};
use serde::Serialize;

/// A hierarchy level that may override the tier or the rate
pub trait RateOverride {
    /// Tier set at this level, if any
    fn quality_tier(&self) -> Option<QualityTier>;

    /// Custom rate set at this level, if any (zero counts as unset)
    fn custom_rate(&self) -> Option<u32>;
}

impl RateOverride for Lesson {
    fn quality_tier(&self) -> Option<QualityTier> {
        self.quality_tier
    }

    fn custom_rate(&self) -> Option<u32> {
        self.custom_rate.filter(|rate| *rate > 0)
    }
}

impl RateOverride for Section {
    fn quality_tier(&self) -> Option<QualityTier> {
        self.quality_tier
    }

    fn custom_rate(&self) -> Option<u32> {
        self.custom_rate.filter(|rate| *rate > 0)
    }
}

impl RateOverride for Project {
    fn quality_tier(&self) -> Option<QualityTier> {
        self.quality_tier
    }

    fn custom_rate(&self) -> Option<u32> {
        self.custom_rate.filter(|rate| *rate > 0)
    }
}

/// Level of the hierarchy that supplied the effective rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RateSource {
    Lesson,
    Section,
    Project,
    Folder,
    Default,
}

/// Outcome of resolution for one lesson
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedRate {
    /// Tier the lesson's minutes are bucketed under
    pub tier: QualityTier,
    /// Production hours per completion hour
    pub rate: u32,
    /// Level that supplied `rate`
    pub source: RateSource,
    /// `true` when `rate` came from a custom rate rather than the tier table
    pub custom: bool,
}

/// Resolve the effective tier and rate for a lesson within its hierarchy
///
/// # Examples
///
/// ```
/// use prodtime_common::resolver::{resolve, RateSource};
/// use prodtime_common::tree::{Lesson, Project, Section};
/// use prodtime_common::QualityTier;
///
/// let lesson = Lesson::default();
/// let section = Section { custom_rate: Some(500), ..Default::default() };
/// let project = Project { quality_tier: Some(QualityTier::Basic), ..Default::default() };
///
/// let resolved = resolve(&lesson, &section, &project, None);
/// assert_eq!(resolved.rate, 500);
/// assert_eq!(resolved.source, RateSource::Section);
/// assert_eq!(resolved.tier, QualityTier::Basic);
/// ```
pub fn resolve(
    lesson: &Lesson,
    section: &Section,
    project: &Project,
    folder_default: Option<QualityTier>,
) -> ResolvedRate {
    resolve_chain(
        &[
            (RateSource::Lesson, lesson as &dyn RateOverride),
            (RateSource::Section, section as &dyn RateOverride),
            (RateSource::Project, project as &dyn RateOverride),
        ],
        folder_default,
    )
}

/// Resolve over an arbitrary chain of levels, nearest first
///
/// Used directly for partial hierarchies such as a single-lesson preview.
pub fn resolve_chain(
    levels: &[(RateSource, &dyn RateOverride)],
    folder_default: Option<QualityTier>,
) -> ResolvedRate {
    let tier = levels
        .iter()
        .find_map(|(_, level)| level.quality_tier())
        .or(folder_default)
        .unwrap_or(DEFAULT_TIER);

    for (source, level) in levels {
        if let Some(rate) = level.custom_rate() {
            return ResolvedRate {
                tier,
                rate,
                source: *source,
                custom: true,
            };
        }
        if let Some(level_tier) = level.quality_tier() {
            return ResolvedRate {
                tier: level_tier,
                rate: level_tier.rate(),
                source: *source,
                custom: false,
            };
        }
    }

    match folder_default {
        Some(folder_tier) => ResolvedRate {
            tier: folder_tier,
            rate: folder_tier.rate(),
            source: RateSource::Folder,
            custom: false,
        },
        None => ResolvedRate {
            tier: DEFAULT_TIER,
            rate: DEFAULT_TIER.rate(),
            source: RateSource::Default,
            custom: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(tier: Option<QualityTier>, rate: Option<u32>) -> Lesson {
        Lesson {
            title: "lesson".to_string(),
            completion_time: Some("5m".to_string()),
            quality_tier: tier,
            custom_rate: rate,
        }
    }

    fn section(tier: Option<QualityTier>, rate: Option<u32>) -> Section {
        Section {
            quality_tier: tier,
            custom_rate: rate,
            ..Default::default()
        }
    }

    fn project(tier: Option<QualityTier>, rate: Option<u32>) -> Project {
        Project {
            quality_tier: tier,
            custom_rate: rate,
            ..Default::default()
        }
    }

    #[test]
    fn test_global_default_when_nothing_set() {
        let r = resolve(&lesson(None, None), &section(None, None), &project(None, None), None);
        assert_eq!(r.tier, QualityTier::Interactive);
        assert_eq!(r.rate, 200);
        assert_eq!(r.source, RateSource::Default);
        assert!(!r.custom);
    }

    #[test]
    fn test_folder_default_used_when_project_unset() {
        let r = resolve(
            &lesson(None, None),
            &section(None, None),
            &project(None, None),
            Some(QualityTier::Advanced),
        );
        assert_eq!(r.tier, QualityTier::Advanced);
        assert_eq!(r.rate, 300);
        assert_eq!(r.source, RateSource::Folder);
    }

    #[test]
    fn test_project_tier_beats_folder_default() {
        let r = resolve(
            &lesson(None, None),
            &section(None, None),
            &project(Some(QualityTier::Immersive), None),
            Some(QualityTier::Basic),
        );
        assert_eq!(r.rate, 400);
        assert_eq!(r.source, RateSource::Project);
    }

    #[test]
    fn test_lesson_custom_rate_wins_over_everything() {
        let r = resolve(
            &lesson(Some(QualityTier::Basic), Some(777)),
            &section(Some(QualityTier::Advanced), Some(600)),
            &project(Some(QualityTier::Immersive), Some(900)),
            Some(QualityTier::Advanced),
        );
        assert_eq!(r.rate, 777);
        assert_eq!(r.source, RateSource::Lesson);
        assert!(r.custom);
        assert_eq!(r.tier, QualityTier::Basic);
    }

    #[test]
    fn test_lesson_tier_beats_section_custom_rate() {
        let r = resolve(
            &lesson(Some(QualityTier::Basic), None),
            &section(None, Some(500)),
            &project(None, None),
            None,
        );
        assert_eq!(r.rate, 150);
        assert_eq!(r.source, RateSource::Lesson);
    }

    #[test]
    fn test_section_custom_rate_beats_project_tier() {
        let r = resolve(
            &lesson(None, None),
            &section(None, Some(500)),
            &project(Some(QualityTier::Basic), None),
            None,
        );
        assert_eq!(r.rate, 500);
        assert_eq!(r.source, RateSource::Section);
        assert!(r.custom);
        // Bucketed under the nearest tier above the custom rate
        assert_eq!(r.tier, QualityTier::Basic);
    }

    #[test]
    fn test_custom_rate_without_any_tier_buckets_under_default() {
        let r = resolve(&lesson(None, None), &section(None, None), &project(None, Some(320)), None);
        assert_eq!(r.rate, 320);
        assert_eq!(r.tier, QualityTier::Interactive);
    }

    #[test]
    fn test_zero_custom_rate_is_unset() {
        let r = resolve(
            &lesson(None, Some(0)),
            &section(Some(QualityTier::Advanced), None),
            &project(None, None),
            None,
        );
        assert_eq!(r.rate, 300);
        assert_eq!(r.source, RateSource::Section);
        assert!(!r.custom);
    }

    #[test]
    fn test_chain_for_single_lesson() {
        let l = lesson(Some(QualityTier::Immersive), None);
        let r = resolve_chain(&[(RateSource::Lesson, &l as &dyn RateOverride)], None);
        assert_eq!(r.rate, 400);
    }
}
