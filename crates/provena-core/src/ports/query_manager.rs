//! Query manager trait definition.
//!
//! The query manager runs read-only queries that span several collections.

use async_trait::async_trait;

use super::RepositoryError;
use crate::backend::BackendHandle;
use crate::domain::{ConfiguredComputer, EntityCounts, LogStatistics};

#[async_trait]
pub trait QueryManager: Send + Sync {
    /// Handle to the facade this query manager belongs to.
    fn backend(&self) -> &BackendHandle;

    /// Number of stored rows per collection.
    async fn entity_counts(&self) -> Result<EntityCounts, RepositoryError>;

    /// Totals of log entries by level and by UTC day, optionally for one node.
    async fn log_statistics(&self, node_id: Option<i64>)
    -> Result<LogStatistics, RepositoryError>;

    /// Computers the user identified by `email` has an auth-info on,
    /// ordered by label.
    ///
    /// Returns `NotFound` if no such user exists.
    async fn computers_for_user(
        &self,
        email: &str,
    ) -> Result<Vec<ConfiguredComputer>, RepositoryError>;
}
