//! Main commands enum and entity subcommands.
//!
//! This module defines the available commands for the CLI tool.

use clap::Subcommand;
use provena_core::LogLevel;

/// Available commands.
///
/// Every command except `paths` runs against the assembled backend of the
/// selected profile.
#[derive(Subcommand)]
pub enum Commands {
    /// Show the resolved data root and database path
    Paths,

    /// Create the profile database (or bring its schema up to date)
    Init,

    /// Manage users
    User {
        #[command(subcommand)]
        command: UserCommand,
    },

    /// Manage computers
    Computer {
        #[command(subcommand)]
        command: ComputerCommand,
    },

    /// Manage per-user computer credentials
    Authinfo {
        #[command(subcommand)]
        command: AuthInfoCommand,
    },

    /// Inspect or purge log entries
    Log {
        #[command(subcommand)]
        command: LogCommand,
    },

    /// Show entity counts and log statistics
    Stats {
        /// Restrict log statistics to one node
        #[arg(long)]
        node: Option<i64>,
    },
}

/// User command variants.
#[derive(Subcommand)]
pub enum UserCommand {
    /// Register a user
    Add {
        /// Email address identifying the user
        email: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
        #[arg(long, default_value = "")]
        institution: String,
    },
    /// List all users
    List,
    /// Remove a user together with their credentials
    Remove {
        /// Email address of the user
        email: String,
    },
}

/// Computer command variants.
#[derive(Subcommand)]
pub enum ComputerCommand {
    /// Register a computer
    Add {
        /// Unique label of the computer
        label: String,
        /// Hostname used by the transport
        hostname: String,
        /// Transport plugin name
        #[arg(long, default_value = "core.ssh")]
        transport: String,
        /// Scheduler plugin name
        #[arg(long, default_value = "core.direct")]
        scheduler: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List all computers
    List,
    /// Remove a computer together with every credential configured for it
    Remove {
        /// Label of the computer
        label: String,
    },
}

/// Credential command variants.
///
/// The user defaults to `PROVENA_USER` when `--user` is not given.
#[derive(Subcommand)]
pub enum AuthInfoCommand {
    /// Configure a computer for a user
    Configure {
        /// Label of the computer
        computer: String,
        /// Email of the user
        #[arg(short, long, env = "PROVENA_USER")]
        user: String,
        /// Transport parameter as `key=value`; values are parsed as JSON when possible
        #[arg(short, long = "param")]
        params: Vec<String>,
    },
    /// List computers configured for a user
    List {
        /// Email of the user
        #[arg(short, long, env = "PROVENA_USER")]
        user: String,
    },
    /// Disable a configured computer for a user
    Disable {
        /// Label of the computer
        computer: String,
        /// Email of the user
        #[arg(short, long, env = "PROVENA_USER")]
        user: String,
    },
    /// Re-enable a configured computer for a user
    Enable {
        /// Label of the computer
        computer: String,
        /// Email of the user
        #[arg(short, long, env = "PROVENA_USER")]
        user: String,
    },
}

/// Log command variants.
#[derive(Subcommand)]
pub enum LogCommand {
    /// List log entries
    List {
        /// Only entries attached to this node
        #[arg(long)]
        node: Option<i64>,
        /// Minimum level (DEBUG, INFO, REPORT, WARNING, ERROR, CRITICAL)
        #[arg(long)]
        level: Option<LogLevel>,
        /// Only entries from this logger
        #[arg(long)]
        logger: Option<String>,
        /// Entries at or after this time (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        since: Option<String>,
        /// Maximum number of entries to show
        #[arg(short, long)]
        limit: Option<u32>,
        /// Newest entries first
        #[arg(long)]
        newest_first: bool,
    },
    /// Delete log entries
    Purge {
        /// Only entries attached to this node
        #[arg(long)]
        node: Option<i64>,
        /// Only entries before this time (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        before: Option<String>,
        /// Allow purging every entry when no other filter is given
        #[arg(long)]
        all: bool,
    },
}
