//! Derived totals attached to every project, folder and folder rollup
//!
//! Totals are computed on read from lesson fields and never stored. Every
//! lesson's minutes land both in the overall sums and in exactly one tier
//! bucket, so the buckets always add up to the overall sums.

use crate::tiers::QualityTier;
use serde::Serialize;
use std::collections::BTreeMap;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Counts and minute sums for a node and everything beneath it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateTotals {
    pub lesson_count: u32,
    pub module_count: u32,
    pub completion_minutes: u64,
    pub production_minutes: u64,
    pub per_tier_completion_minutes: BTreeMap<QualityTier, u64>,
    pub per_tier_production_minutes: BTreeMap<QualityTier, u64>,
}

/// One row of a tier breakdown report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierBreakdown {
    pub tier: QualityTier,
    pub completion_minutes: u64,
    pub production_minutes: u64,
    pub production_hours: f64,
    /// Share of the node's production minutes, in percent (one decimal)
    pub share_percent: f64,
}

/// Convert minutes to hours rounded to one decimal place, for display
pub fn minutes_to_hours(minutes: u64) -> f64 {
    (minutes as f64 / 60.0 * 10.0).round() / 10.0
}

fn add_to_bucket(buckets: &mut BTreeMap<QualityTier, u64>, tier: QualityTier, minutes: u64) {
    let bucket = buckets.entry(tier).or_insert(0);
    *bucket = bucket.saturating_add(minutes);
}

fn saturating_sum(buckets: &BTreeMap<QualityTier, u64>) -> u64 {
    buckets.values().fold(0, |acc, minutes| acc.saturating_add(*minutes))
}

impl AggregateTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one lesson's contribution
    ///
    /// All sums saturate at their type's maximum.
    pub fn add_lesson(&mut self, tier: QualityTier, completion_minutes: u32, production_minutes: u64) {
        let completion_minutes = u64::from(completion_minutes);
        self.lesson_count = self.lesson_count.saturating_add(1);
        self.completion_minutes = self.completion_minutes.saturating_add(completion_minutes);
        self.production_minutes = self.production_minutes.saturating_add(production_minutes);
        add_to_bucket(&mut self.per_tier_completion_minutes, tier, completion_minutes);
        add_to_bucket(&mut self.per_tier_production_minutes, tier, production_minutes);
    }

    /// Fold another node's totals into this one
    pub fn absorb(&mut self, other: &AggregateTotals) {
        self.lesson_count = self.lesson_count.saturating_add(other.lesson_count);
        self.module_count = self.module_count.saturating_add(other.module_count);
        self.completion_minutes = self.completion_minutes.saturating_add(other.completion_minutes);
        self.production_minutes = self.production_minutes.saturating_add(other.production_minutes);
        for (tier, minutes) in &other.per_tier_completion_minutes {
            add_to_bucket(&mut self.per_tier_completion_minutes, *tier, *minutes);
        }
        for (tier, minutes) in &other.per_tier_production_minutes {
            add_to_bucket(&mut self.per_tier_production_minutes, *tier, *minutes);
        }
    }

    /// Count `modules` more modules
    pub fn add_modules(&mut self, modules: usize) {
        let modules = u32::try_from(modules).unwrap_or(u32::MAX);
        self.module_count = self.module_count.saturating_add(modules);
    }

    /// Completion time in hours, one decimal place, for display
    pub fn completion_hours(&self) -> f64 {
        minutes_to_hours(self.completion_minutes)
    }

    /// Production time in hours, one decimal place, for display
    pub fn production_hours(&self) -> f64 {
        minutes_to_hours(self.production_minutes)
    }

    /// Production minutes recorded under `tier`
    pub fn production_minutes_for(&self, tier: QualityTier) -> u64 {
        self.per_tier_production_minutes.get(&tier).copied().unwrap_or(0)
    }

    /// Completion minutes recorded under `tier`
    pub fn completion_minutes_for(&self, tier: QualityTier) -> u64 {
        self.per_tier_completion_minutes.get(&tier).copied().unwrap_or(0)
    }

    /// `true` when the tier buckets sum exactly to the overall sums
    pub fn is_balanced(&self) -> bool {
        saturating_sum(&self.per_tier_completion_minutes) == self.completion_minutes
            && saturating_sum(&self.per_tier_production_minutes) == self.production_minutes
    }

    /// Per-tier rows in ascending rate order, tiers without lessons omitted
    pub fn tier_breakdown(&self) -> Vec<TierBreakdown> {
        self.per_tier_completion_minutes
            .keys()
            .chain(self.per_tier_production_minutes.keys())
            .copied()
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .map(|tier| {
                let production_minutes = self.production_minutes_for(tier);
                let share_percent = if self.production_minutes == 0 {
                    0.0
                } else {
                    (production_minutes as f64 * 1000.0 / self.production_minutes as f64).round() / 10.0
                };
                TierBreakdown {
                    tier,
                    completion_minutes: self.completion_minutes_for(tier),
                    production_minutes,
                    production_hours: minutes_to_hours(production_minutes),
                    share_percent,
                }
            })
            .collect()
    }
}

impl AddAssign<&AggregateTotals> for AggregateTotals {
    fn add_assign(&mut self, other: &AggregateTotals) {
        self.absorb(other);
    }
}

impl AddAssign for AggregateTotals {
    fn add_assign(&mut self, other: AggregateTotals) {
        self.absorb(&other);
    }
}

impl Add for AggregateTotals {
    type Output = AggregateTotals;

    fn add(mut self, other: AggregateTotals) -> AggregateTotals {
        self.absorb(&other);
        self
    }
}

impl Sum for AggregateTotals {
    fn sum<I: Iterator<Item = AggregateTotals>>(iter: I) -> Self {
        iter.fold(AggregateTotals::new(), |acc, totals| acc + totals)
    }
}

impl<'a> Sum<&'a AggregateTotals> for AggregateTotals {
    fn sum<I: Iterator<Item = &'a AggregateTotals>>(iter: I) -> Self {
        iter.fold(AggregateTotals::new(), |mut acc, totals| {
            acc.absorb(totals);
            acc
        })
    }
}
