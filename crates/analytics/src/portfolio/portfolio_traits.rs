use async_trait::async_trait;

use crate::errors::Result;
use crate::portfolio::PortfolioSnapshot;

/// Storage collaborator that assembles a consistent holdings snapshot.
///
/// Implementations must return every holding's value series in ascending
/// timestamp order, with all amounts already expressed in the reporting
/// currency.
#[async_trait]
pub trait PortfolioSnapshotRepositoryTrait: Send + Sync {
    async fn get_snapshot(&self, portfolio_id: &str) -> Result<PortfolioSnapshot>;
}
