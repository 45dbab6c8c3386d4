//! # Production-Time Common Library
//!
//! Shared code for the production-time service and report tool:
//! - Quality tier rate table and tier resolution
//! - Completion-time parsing and production-minute calculation
//! - Typed project/folder snapshot model
//! - Recursive aggregation into `AggregateTotals`
//! - Configuration loading
//! - Human-readable duration formatting

pub mod aggregate;
pub mod completion;
pub mod config;
pub mod error;
pub mod human_time;
pub mod resolver;
pub mod tiers;
pub mod totals;
pub mod tree;

pub use aggregate::{aggregate, Report};
pub use error::{Error, Result};
pub use tiers::QualityTier;
pub use totals::AggregateTotals;
