//! Core domain types, collection ports and the backend facade for provena.
//!
//! This crate knows nothing about storage. Concrete collaborators live in
//! `provena-db`; adapters receive an assembled [`BackendFacade`] and reach
//! every collection through it.
#![deny(unused_crate_dependencies)]

pub mod backend;
pub mod domain;
pub mod paths;
pub mod ports;

pub use backend::{Backend, BackendFacade, BackendHandle, CollaboratorFactory};
pub use domain::{
    Attributes, AuthInfo, Computer, ConfiguredComputer, EntityCounts, LogEntry, LogFilter, LogLevel,
    LogStatistics, NewAuthInfo, NewComputer, NewLogEntry, NewUser, SortOrder, User,
    normalize_email,
};
pub use paths::{
    DEFAULT_PROFILE, PathError, data_root, database_path, database_path_in, validate_profile_name,
};
pub use ports::{
    AuthInfoCollection, ComputerCollection, LogCollection, QueryManager,
    RepositoryError, UserCollection,
};

#[cfg(test)]
use tempfile as _;
