//! Log collection trait definition.

use async_trait::async_trait;

use super::RepositoryError;
use crate::backend::BackendHandle;
use crate::domain::{LogEntry, LogFilter, NewLogEntry};

/// Collection of log entries.
#[async_trait]
pub trait LogCollection: Send + Sync {
    /// Handle to the facade this collection belongs to.
    fn backend(&self) -> &BackendHandle;

    /// Record a log entry. A fresh UUID is assigned.
    async fn create_entry(&self, entry: NewLogEntry) -> Result<LogEntry, RepositoryError>;

    async fn get_by_id(&self, id: i64) -> Result<LogEntry, RepositoryError>;

    /// Entries matching `filter`, honouring its order, limit and offset.
    async fn find(&self, filter: &LogFilter) -> Result<Vec<LogEntry>, RepositoryError>;

    /// Entries of one node in chronological order.
    async fn logs_for_node(&self, node_id: i64) -> Result<Vec<LogEntry>, RepositoryError>;

    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;

    /// Delete entries matching `filter`, ignoring order, limit and offset.
    /// Returns the number removed.
    async fn delete_many(&self, filter: &LogFilter) -> Result<u64, RepositoryError>;

    /// Delete every entry. Returns the number removed.
    async fn delete_all(&self) -> Result<u64, RepositoryError>;
}
