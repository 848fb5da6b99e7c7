//! Computer collection trait definition.

use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryError;
use crate::backend::BackendHandle;
use crate::domain::{Computer, NewComputer};

/// Collection of computers.
///
/// Labels are unique. Deleting a computer removes every auth-info that
/// configures it, through the auth-info collection of the same backend.
#[async_trait]
pub trait ComputerCollection: Send + Sync {
    /// Handle to the facade this collection belongs to.
    fn backend(&self) -> &BackendHandle;

    /// Register a new computer. A fresh UUID is assigned.
    async fn create(&self, computer: NewComputer) -> Result<Computer, RepositoryError>;

    async fn get_by_id(&self, id: i64) -> Result<Computer, RepositoryError>;

    async fn get_by_label(&self, label: &str) -> Result<Computer, RepositoryError>;

    async fn get_by_uuid(&self, uuid: Uuid) -> Result<Computer, RepositoryError>;

    /// List all computers ordered by label.
    async fn list(&self) -> Result<Vec<Computer>, RepositoryError>;

    /// Replace every mutable field of an existing computer.
    async fn update(&self, computer: &Computer) -> Result<(), RepositoryError>;

    /// Delete a computer and its auth-infos.
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;
}
