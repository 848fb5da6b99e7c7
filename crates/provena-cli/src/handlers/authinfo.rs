//! Credential (auth-info) command handlers.

use anyhow::Result;
use serde_json::Value;
use tracing::debug;

use provena_core::{Attributes, NewAuthInfo, RepositoryError};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::print_separator;

/// Parse a `key=value` transport parameter.
///
/// The value is read as JSON when it parses (`22`, `true`, `["a"]`) and kept
/// as a plain string otherwise.
pub fn parse_param(raw: &str) -> Result<(String, Value), CliError> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| CliError::Arguments(format!("expected key=value, got `{raw}`")))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(CliError::Arguments(format!("empty parameter name in `{raw}`")));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Configure `computer` for `user`, replacing any previous parameters.
///
/// A reconfigured credential keeps its enabled state.
pub async fn configure(
    ctx: &CliContext,
    computer: &str,
    user: &str,
    params: &[String],
) -> Result<()> {
    let mut auth_params = Attributes::new();
    for raw in params {
        let (key, value) = parse_param(raw)?;
        auth_params.insert(key, value);
    }

    let backend = ctx.backend();
    let user = backend.users().get_by_email(user).await?;
    let computer = backend.computers().get_by_label(computer).await?;

    let reconfigured = match backend.authinfos().get(computer.id, user.id).await {
        Ok(existing) => {
            debug!(id = existing.id, "replacing parameters of existing auth-info");
            backend
                .authinfos()
                .update_auth_params(existing.id, auth_params)
                .await?;
            true
        }
        Err(RepositoryError::NotFound(_)) => {
            backend
                .authinfos()
                .create(NewAuthInfo::new(user.id, computer.id).with_auth_params(auth_params))
                .await?;
            false
        }
        Err(e) => return Err(e.into()),
    };

    println!(
        "{} computer `{}` for {}",
        if reconfigured { "Reconfigured" } else { "Configured" },
        computer.label,
        user.email
    );
    Ok(())
}

/// List the computers configured for `user`.
pub async fn list(ctx: &CliContext, user: &str) -> Result<()> {
    let configured = ctx
        .backend()
        .query_manager()
        .computers_for_user(user)
        .await?;

    if configured.is_empty() {
        println!("No computers configured for {user}.");
        return Ok(());
    }

    println!("{:<20} {:<28} Enabled", "Computer", "Hostname");
    print_separator(60);
    for entry in configured {
        println!(
            "{:<20} {:<28} {}",
            entry.computer.label,
            entry.computer.hostname,
            if entry.enabled { "yes" } else { "no" }
        );
    }

    Ok(())
}

/// Enable or disable the credential of `user` on `computer`.
pub async fn set_enabled(ctx: &CliContext, computer: &str, user: &str, enabled: bool) -> Result<()> {
    let backend = ctx.backend();
    let user = backend.users().get_by_email(user).await?;
    let computer = backend.computers().get_by_label(computer).await?;
    let authinfo = backend.authinfos().get(computer.id, user.id).await?;

    backend.authinfos().set_enabled(authinfo.id, enabled).await?;
    println!(
        "Computer `{}` {} for {}",
        computer.label,
        if enabled { "enabled" } else { "disabled" },
        user.email
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support;
    use provena_core::{NewComputer, NewUser};
    use serde_json::json;

    #[test]
    fn test_parse_param() {
        assert_eq!(parse_param("port=22").unwrap(), ("port".to_string(), json!(22)));
        assert_eq!(
            parse_param("username=jdoe").unwrap(),
            ("username".to_string(), json!("jdoe"))
        );
        assert_eq!(
            parse_param("proxy_command=ssh -W %h:%p gw").unwrap(),
            ("proxy_command".to_string(), json!("ssh -W %h:%p gw"))
        );
        assert!(matches!(parse_param("port"), Err(CliError::Arguments(_))));
        assert!(matches!(parse_param("=22"), Err(CliError::Arguments(_))));
    }

    #[tokio::test]
    async fn test_configure_disable_reconfigure() {
        let (_db, ctx) = test_support::context().await;
        let backend = ctx.backend();
        let user = backend
            .users()
            .create(NewUser::with_email("jane@example.org"))
            .await
            .unwrap();
        let computer = backend
            .computers()
            .create(NewComputer::new("daint", "daint.cscs.ch", "core.ssh", "core.slurm"))
            .await
            .unwrap();

        configure(&ctx, "daint", "jane@example.org", &["port=22".to_string()])
            .await
            .unwrap();
        set_enabled(&ctx, "daint", "jane@example.org", false)
            .await
            .unwrap();
        let first = backend.authinfos().get(computer.id, user.id).await.unwrap();

        configure(&ctx, "daint", "jane@example.org", &["username=jdoe".to_string()])
            .await
            .unwrap();
        list(&ctx, "jane@example.org").await.unwrap();

        let info = backend.authinfos().get(computer.id, user.id).await.unwrap();
        assert_eq!(info.id, first.id);
        assert!(!info.enabled);
        assert_eq!(info.auth_params.len(), 1);
        assert_eq!(info.auth_params["username"], "jdoe");
    }

    #[tokio::test]
    async fn test_configure_unknown_computer() {
        let (_db, ctx) = test_support::context().await;
        ctx.backend()
            .users()
            .create(NewUser::with_email("jane@example.org"))
            .await
            .unwrap();

        let err = configure(&ctx, "nowhere", "jane@example.org", &[])
            .await
            .unwrap_err();
        assert_eq!(crate::error::exit_code_for(&err), 66);
    }
}
