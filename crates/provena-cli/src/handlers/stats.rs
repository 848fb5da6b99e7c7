//! Stats command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;

/// Print entity counts and log statistics.
pub async fn execute(ctx: &CliContext, node: Option<i64>) -> Result<()> {
    let query_manager = ctx.backend().query_manager();
    let counts = query_manager.entity_counts().await?;
    let logs = query_manager.log_statistics(node).await?;

    println!("Users:       {}", counts.users);
    println!("Computers:   {}", counts.computers);
    println!("Credentials: {}", counts.authinfos);
    println!("Log entries: {}", counts.logs);

    if logs.total == 0 {
        return Ok(());
    }

    match node {
        Some(node) => println!("\nLogs of node {node} ({} total):", logs.total),
        None => println!("\nLogs ({} total):", logs.total),
    }
    for (level, count) in &logs.by_level {
        println!("  {level:<9} {count}");
    }
    println!("\nBy day:");
    for (day, count) in &logs.by_day {
        println!("  {day} {count}");
    }

    Ok(())
}
