//! CLI-specific error types and mappings.
//!
//! This module provides error types for the CLI adapter and mappings
//! from repository and path errors to exit codes.

use provena_core::{PathError, RepositoryError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Core domain error.
    #[error("{0}")]
    Core(String),

    /// Argument parsing error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// The named entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Core(_) => 1,
            Self::Arguments(_) => 2, // EX_USAGE
            Self::NotFound(_) => 66, // EX_NOINPUT
            Self::Config(_) => 78,   // EX_CONFIG
            Self::Database(_) => 73, // EX_CANTCREAT (closest fit)
        }
    }
}

impl From<RepositoryError> for CliError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => Self::NotFound(format!("Not found: {msg}")),
            RepositoryError::Validation(msg) => Self::Arguments(msg),
            RepositoryError::Detached => Self::Core(err.to_string()),
            other => Self::Database(other.to_string()),
        }
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        match err {
            PathError::InvalidProfile(_) => Self::Arguments(err.to_string()),
            other => Self::Config(other.to_string()),
        }
    }
}

/// Exit code for an error returned from a command.
///
/// Known error types anywhere in the chain decide the code; anything else is
/// a general failure.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(cli) = cause.downcast_ref::<CliError>() {
            return cli.exit_code();
        }
        if let Some(repo) = cause.downcast_ref::<RepositoryError>() {
            return match repo {
                RepositoryError::NotFound(_) => 66,
                RepositoryError::Validation(_) => 2,
                RepositoryError::Detached => 1,
                _ => 73,
            };
        }
        if let Some(path) = cause.downcast_ref::<PathError>() {
            return match path {
                PathError::InvalidProfile(_) => 2,
                _ => 78,
            };
        }
    }
    1
}
