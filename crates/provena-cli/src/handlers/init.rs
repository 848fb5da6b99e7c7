//! Init command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;

/// Execute the init command.
///
/// Bootstrapping already created the file and applied the schema; this
/// reports what the database now holds.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    let counts = ctx.backend().query_manager().entity_counts().await?;

    println!("Database ready at {}", ctx.database_path().display());
    println!(
        "{} user(s), {} computer(s), {} credential(s), {} log entr{}",
        counts.users,
        counts.computers,
        counts.authinfos,
        counts.logs,
        if counts.logs == 1 { "y" } else { "ies" }
    );
    Ok(())
}
