use async_trait::async_trait;

use super::{AdvancedMetrics, RiskReport};
use crate::errors::Result;
use crate::projection::{
    GoalSolveRequest, GoalSolveResult, ProjectionRequest, ProjectionResult, ScenarioComparison,
    ScenarioRequest,
};

/// Request/response contracts exposed to callers.
#[async_trait]
pub trait MetricsServiceTrait: Send + Sync {
    /// Projects a savings plan forward under compound growth.
    fn calculate_projection(&self, request: &ProjectionRequest) -> Result<ProjectionResult>;

    /// Runs a plan at the conservative, moderate and aggressive rates.
    fn compare_scenarios(&self, request: &ScenarioRequest) -> Result<ScenarioComparison>;

    /// Finds the monthly contribution that reaches a target amount.
    fn solve_required_contribution(&self, request: &GoalSolveRequest) -> Result<GoalSolveResult>;

    /// Loads the portfolio's snapshot and computes its risk report.
    ///
    /// # Errors
    /// Repository failures are returned unchanged; an invalid snapshot yields
    /// an `InvalidInput` naming the offending holding field.
    async fn analyze_portfolio_risk(&self, portfolio_id: &str) -> Result<RiskReport>;

    /// Like [`analyze_portfolio_risk`](Self::analyze_portfolio_risk), with the
    /// sector breakdown, volatility trend and summary recommendation.
    async fn get_advanced_metrics(&self, portfolio_id: &str) -> Result<AdvancedMetrics>;
}
