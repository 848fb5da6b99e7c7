//! Paths command handler.
//!
//! Displays the resolved data root and database file for diagnostics.

use anyhow::Result;

use provena_core::data_root;

use crate::bootstrap::CliConfig;

/// Execute the paths command.
///
/// Does not open the database, so it also works when the database cannot be
/// created.
pub fn execute(config: &CliConfig) -> Result<()> {
    println!("data_root = {}", data_root()?.display());
    println!("profile   = {}", config.profile);
    println!("database  = {}", config.resolve_database_path()?.display());
    Ok(())
}
