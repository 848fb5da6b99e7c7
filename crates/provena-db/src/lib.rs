//! `SQLite` collaborators and backend assembly for provena.
//!
//! Entry points call [`setup_database`] with the resolved database path and
//! hand the pool to [`BackendFactory::build_backend`], which returns the
//! assembled [`BackendFacade`](provena_core::BackendFacade).
#![deny(unsafe_code)]

pub mod collections;
pub mod factory;
mod schema;
pub mod setup;

// Re-export factory for convenient access
pub use factory::{BackendFactory, SqliteCollaborators};

// Re-export TestDb for integration tests
#[cfg(any(test, feature = "test-utils"))]
pub use factory::TestDb;

// Re-export collection implementations
pub use collections::{
    SqliteAuthInfoCollection, SqliteComputerCollection, SqliteLogCollection,
    SqliteQueryManager, SqliteUserCollection,
};

// Re-export setup functions for convenient access
pub use setup::setup_database;
#[cfg(any(test, feature = "test-utils"))]
pub use setup::setup_test_database;
