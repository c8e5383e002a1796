use std::sync::Arc;

use async_trait::async_trait;
use log::info;

use super::{AdvancedMetrics, MetricsAggregator, MetricsServiceTrait, RiskReport};
use crate::errors::{Error, Result};
use crate::portfolio::{PortfolioSnapshot, PortfolioSnapshotRepositoryTrait};
use crate::projection::{
    GoalSolveRequest, GoalSolveResult, ProjectionRequest, ProjectionResult, ScenarioComparison,
    ScenarioRequest,
};

/// Binds the aggregator to the storage collaborator that supplies snapshots.
///
/// Snapshot analysis is CPU-bound, so it runs on tokio's blocking pool to keep
/// the async workers free.
pub struct MetricsService {
    repository: Arc<dyn PortfolioSnapshotRepositoryTrait>,
    aggregator: Arc<MetricsAggregator>,
}

impl MetricsService {
    pub fn new(
        repository: Arc<dyn PortfolioSnapshotRepositoryTrait>,
        aggregator: Arc<MetricsAggregator>,
    ) -> Self {
        Self {
            repository,
            aggregator,
        }
    }

    pub fn aggregator(&self) -> &MetricsAggregator {
        &self.aggregator
    }

    async fn run_blocking<T, F>(&self, portfolio_id: &str, compute: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&MetricsAggregator, &PortfolioSnapshot) -> Result<T> + Send + 'static,
    {
        let snapshot = self.repository.get_snapshot(portfolio_id).await?;
        let aggregator = Arc::clone(&self.aggregator);

        tokio::task::spawn_blocking(move || compute(&aggregator, &snapshot))
            .await
            .map_err(|e| Error::Unexpected(format!("Metrics task failed: {}", e)))?
    }
}

#[async_trait]
impl MetricsServiceTrait for MetricsService {
    fn calculate_projection(&self, request: &ProjectionRequest) -> Result<ProjectionResult> {
        self.aggregator.calculate_projection(request)
    }

    fn compare_scenarios(&self, request: &ScenarioRequest) -> Result<ScenarioComparison> {
        self.aggregator.compare_scenarios(request)
    }

    fn solve_required_contribution(&self, request: &GoalSolveRequest) -> Result<GoalSolveResult> {
        self.aggregator.solve_required_contribution(request)
    }

    async fn analyze_portfolio_risk(&self, portfolio_id: &str) -> Result<RiskReport> {
        info!("Analyzing portfolio risk for {}", portfolio_id);
        self.run_blocking(portfolio_id, |aggregator, snapshot| {
            aggregator.portfolio_analysis(snapshot)
        })
        .await
    }

    async fn get_advanced_metrics(&self, portfolio_id: &str) -> Result<AdvancedMetrics> {
        info!("Computing advanced metrics for {}", portfolio_id);
        self.run_blocking(portfolio_id, |aggregator, snapshot| {
            aggregator.advanced_metrics(snapshot)
        })
        .await
    }
}
