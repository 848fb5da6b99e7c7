//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use std::path::PathBuf;

use clap::Parser;
use provena_core::DEFAULT_PROFILE;

use crate::commands::Commands;

/// Command-line interface for a provena profile database.
///
/// Global options select which database the subcommand operates on.
#[derive(Parser)]
#[command(name = "provena")]
#[command(about = "Manage users, computers, credentials and logs of a provenance store")]
#[command(version)]
pub struct Cli {
    /// Profile whose database is used
    #[arg(long, global = true, env = "PROVENA_PROFILE", default_value = DEFAULT_PROFILE)]
    pub profile: String,

    /// Use this database file instead of the profile database
    #[arg(long, global = true, env = "PROVENA_DATABASE")]
    pub database: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
