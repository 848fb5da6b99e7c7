//! Command-line adapter for provena.
//!
//! The binary in `main.rs` parses arguments, calls [`bootstrap`] to assemble
//! the backend and hands the resulting [`CliContext`] to a handler.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;

// Used by the binary only
use dotenvy as _;
use tokio as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::{AuthInfoCommand, Commands, ComputerCommand, LogCommand, UserCommand};
pub use error::{CliError, exit_code_for};
pub use parser::Cli;
