//! Folio Analytics - financial projections and portfolio risk analytics.
//!
//! Every calculation is a pure function of its inputs: savings-plan
//! projections in [`projection`], snapshot-level risk statistics in
//! [`risk`], rule-based advice in [`recommendations`], and the combined
//! report views in [`metrics`]. Fetching snapshots is left to a
//! [`portfolio::PortfolioSnapshotRepositoryTrait`] implementation.

pub mod config;
pub mod constants;
pub mod errors;
pub mod metrics;
pub mod portfolio;
pub mod projection;
pub mod recommendations;
pub mod risk;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::AnalyticsConfig;
pub use metrics::{AdvancedMetrics, MetricsAggregator, MetricsService, MetricsServiceTrait, RiskReport};
pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
