//! Port definitions (trait abstractions) for the backend collaborators.
//!
//! Ports define the interfaces the facade exposes. They contain no
//! implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `sqlx` types in any signature
//! - Every collaborator is `Send + Sync` so the facade can be shared
//! - Every collaborator exposes the [`BackendHandle`](crate::BackendHandle)
//!   it was built with

pub mod authinfo_collection;
pub mod computer_collection;
pub mod log_collection;
pub mod query_manager;
pub mod user_collection;

use thiserror::Error;

pub use authinfo_collection::AuthInfoCollection;
pub use computer_collection::ComputerCollection;
pub use log_collection::LogCollection;
pub use query_manager::QueryManager;
pub use user_collection::UserCollection;

/// Domain-specific errors for collection operations.
///
/// This error type abstracts away storage implementation details (e.g. sqlx
/// errors) and gives callers a stable set of failure kinds.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The requested entity was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An entity with the same natural key already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Storage backend error (database, filesystem, etc.).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A constraint was violated (e.g. foreign key).
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Input rejected before reaching storage.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The facade this collaborator belongs to is not reachable.
    #[error("Backend is not available to this collection")]
    Detached,
}
