//! Computer command handlers.

use anyhow::Result;

use provena_core::NewComputer;

use crate::bootstrap::CliContext;
use crate::presentation::{print_separator, truncate_string};

/// Register a new computer.
pub async fn add(ctx: &CliContext, computer: NewComputer) -> Result<()> {
    let created = ctx.backend().computers().create(computer).await?;
    println!(
        "Added computer `{}` ({}, uuid {})",
        created.label, created.hostname, created.uuid
    );
    Ok(())
}

/// List all computers.
pub async fn list(ctx: &CliContext) -> Result<()> {
    let computers = ctx.backend().computers().list().await?;

    if computers.is_empty() {
        println!("No computers found.");
        println!("Use 'provena computer add <label> <hostname>' to register one.");
        return Ok(());
    }

    println!(
        "{:<5} {:<20} {:<28} {:<14} Scheduler",
        "ID", "Label", "Hostname", "Transport"
    );
    print_separator(85);
    for computer in computers {
        println!(
            "{:<5} {:<20} {:<28} {:<14} {}",
            computer.id,
            truncate_string(&computer.label, 19),
            truncate_string(&computer.hostname, 27),
            truncate_string(&computer.transport_type, 13),
            computer.scheduler_type
        );
    }

    Ok(())
}

/// Remove a computer and every credential configured for it.
pub async fn remove(ctx: &CliContext, label: &str) -> Result<()> {
    let computers = ctx.backend().computers();
    let computer = computers.get_by_label(label).await?;
    computers.delete(computer.id).await?;
    println!("Removed computer `{}`", computer.label);
    Ok(())
}
