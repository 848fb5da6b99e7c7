//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where the CLI wires infrastructure
//! together: it resolves the database path, opens the pool and assembles the
//! backend facade via `provena-db`.
//!
//! Command handlers receive the composed [`CliContext`] and reach every
//! collection through its backend.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use provena_core::{Backend, BackendFacade, DEFAULT_PROFILE, database_path};
use provena_db::BackendFactory;

use crate::error::CliError;
use crate::parser::Cli;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Profile whose database is opened.
    pub profile: String,
    /// Explicit database file, overriding the profile database.
    pub database: Option<PathBuf>,
}

impl CliConfig {
    /// Build the config from parsed global options.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            profile: cli.profile.clone(),
            database: cli.database.clone(),
        }
    }

    /// The database file this invocation operates on.
    pub fn resolve_database_path(&self) -> Result<PathBuf, CliError> {
        match &self.database {
            Some(path) => Ok(path.clone()),
            None => Ok(database_path(&self.profile)?),
        }
    }
}

/// Fully composed context for CLI commands.
pub struct CliContext {
    backend: Arc<BackendFacade>,
    config: CliConfig,
    database_path: PathBuf,
}

impl CliContext {
    /// Access the backend.
    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    /// The configuration the context was bootstrapped from.
    pub const fn config(&self) -> &CliConfig {
        &self.config
    }

    /// The database file the backend was opened on.
    pub fn database_path(&self) -> &Path {
        &self.database_path
    }
}

/// Bootstrap the CLI application.
///
/// Opens (creating if needed) the selected database, applies the schema and
/// assembles the backend facade over it.
pub async fn bootstrap(config: CliConfig) -> Result<CliContext> {
    let database_path = config.resolve_database_path()?;
    info!(profile = %config.profile, path = %database_path.display(), "bootstrapping backend");

    let backend = BackendFactory::open(&database_path)
        .await
        .map_err(|e| CliError::Database(format!("{e:#}")))?;
    debug!("backend ready");

    Ok(CliContext {
        backend,
        config,
        database_path,
    })
}

/// Bootstrap around an already assembled backend (for testing).
pub fn bootstrap_with(backend: Arc<BackendFacade>, database_path: PathBuf) -> CliContext {
    CliContext {
        backend,
        config: CliConfig {
            profile: DEFAULT_PROFILE.to_string(),
            database: Some(database_path.clone()),
        },
        database_path,
    }
}
