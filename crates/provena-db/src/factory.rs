//! Composition utilities for building the `SQLite` backend.
//!
//! This module wires the `SQLite` collections into a
//! [`BackendFacade`]. It is focused purely on construction and should not
//! contain any domain logic.

use std::path::Path;
use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::debug;

use provena_core::ports::{
    AuthInfoCollection, ComputerCollection, LogCollection, QueryManager, UserCollection,
};
use provena_core::{BackendFacade, BackendHandle, CollaboratorFactory, RepositoryError};

use crate::collections::{
    SqliteAuthInfoCollection, SqliteComputerCollection, SqliteLogCollection, SqliteQueryManager,
    SqliteUserCollection,
};
use crate::setup::setup_database;

/// Builds `SQLite` collaborators that share one connection pool.
#[derive(Clone)]
pub struct SqliteCollaborators {
    pool: SqlitePool,
}

impl SqliteCollaborators {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl CollaboratorFactory for SqliteCollaborators {
    type Error = RepositoryError;

    fn logs(&self, backend: BackendHandle) -> Result<Arc<dyn LogCollection>, Self::Error> {
        Ok(Arc::new(SqliteLogCollection::new(self.pool.clone(), backend)))
    }

    fn users(&self, backend: BackendHandle) -> Result<Arc<dyn UserCollection>, Self::Error> {
        Ok(Arc::new(SqliteUserCollection::new(self.pool.clone(), backend)))
    }

    fn authinfos(
        &self,
        backend: BackendHandle,
    ) -> Result<Arc<dyn AuthInfoCollection>, Self::Error> {
        Ok(Arc::new(SqliteAuthInfoCollection::new(
            self.pool.clone(),
            backend,
        )))
    }

    fn computers(
        &self,
        backend: BackendHandle,
    ) -> Result<Arc<dyn ComputerCollection>, Self::Error> {
        Ok(Arc::new(SqliteComputerCollection::new(
            self.pool.clone(),
            backend,
        )))
    }

    fn query_manager(
        &self,
        backend: BackendHandle,
    ) -> Result<Arc<dyn QueryManager>, Self::Error> {
        Ok(Arc::new(SqliteQueryManager::new(self.pool.clone(), backend)))
    }
}

/// Factory for creating `SQLite`-backed facades.
///
/// This struct provides composition utilities only - no domain logic.
pub struct BackendFactory;

impl BackendFactory {
    /// Build a backend facade over an existing pool.
    ///
    /// This is the recommended way for adapters to obtain a backend once the
    /// schema exists.
    pub fn build_backend(pool: SqlitePool) -> Result<Arc<BackendFacade>, RepositoryError> {
        let backend = BackendFacade::assemble(&SqliteCollaborators::new(pool))?;
        debug!("assembled sqlite backend");
        Ok(backend)
    }

    /// Open (creating if needed) the database at `db_path` and build a backend.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use provena_core::paths::database_path;
    /// use provena_db::BackendFactory;
    ///
    /// let backend = BackendFactory::open(&database_path("default")?).await?;
    /// let users = backend.users().list().await?;
    /// ```
    pub async fn open(db_path: &Path) -> anyhow::Result<Arc<BackendFacade>> {
        let pool = setup_database(db_path).await?;
        Ok(Self::build_backend(pool)?)
    }
}

/// Test database helper for integration tests.
///
/// Provides an in-memory `SQLite` database with the production schema.
#[cfg(any(test, feature = "test-utils"))]
pub struct TestDb {
    pool: SqlitePool,
}

#[cfg(any(test, feature = "test-utils"))]
impl TestDb {
    /// Create a new in-memory test database with full schema.
    pub async fn new() -> anyhow::Result<Self> {
        let pool = crate::setup::setup_test_database().await?;
        Ok(Self { pool })
    }

    /// Get the underlying pool.
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Assemble a fresh backend over this database.
    ///
    /// Each call builds a new facade; keep the returned `Arc` alive for as
    /// long as its collections need their siblings.
    pub fn backend(&self) -> Arc<BackendFacade> {
        BackendFactory::build_backend(self.pool.clone())
            .expect("sqlite collaborators are infallible to construct")
    }
}
