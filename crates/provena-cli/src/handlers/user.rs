//! User command handlers.

use anyhow::Result;

use provena_core::NewUser;

use crate::bootstrap::CliContext;
use crate::presentation::{or_dash, print_separator, truncate_string};

/// Register a new user.
pub async fn add(ctx: &CliContext, user: NewUser) -> Result<()> {
    let created = ctx.backend().users().create(user).await?;
    println!("Added user {} (id {})", created.email, created.id);
    Ok(())
}

/// List all users.
pub async fn list(ctx: &CliContext) -> Result<()> {
    let users = ctx.backend().users().list().await?;

    if users.is_empty() {
        println!("No users found.");
        println!("Use 'provena user add <email>' to register one.");
        return Ok(());
    }

    println!("{:<5} {:<32} {:<25} Institution", "ID", "Email", "Name");
    print_separator(80);
    for user in users {
        let name = user.full_name();
        println!(
            "{:<5} {:<32} {:<25} {}",
            user.id,
            truncate_string(&user.email, 31),
            truncate_string(or_dash(&name), 24),
            or_dash(&user.institution)
        );
    }

    Ok(())
}

/// Remove a user and every credential configured for them.
pub async fn remove(ctx: &CliContext, email: &str) -> Result<()> {
    let users = ctx.backend().users();
    let user = users.get_by_email(email).await?;
    users.delete(user.id).await?;
    println!("Removed user {}", user.email);
    Ok(())
}
