//! Metrics module - report views over a snapshot and the async service that loads it.

mod metrics_aggregator;
mod metrics_model;
mod metrics_service;
mod metrics_traits;

pub use metrics_aggregator::MetricsAggregator;
pub use metrics_model::*;
pub use metrics_service::MetricsService;
pub use metrics_traits::MetricsServiceTrait;
