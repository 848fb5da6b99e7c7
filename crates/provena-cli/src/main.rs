//! CLI entry point - the composition root.
//!
//! Command dispatch routes to handlers, which reach every collection through
//! the backend assembled by `bootstrap`.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use provena_cli::handlers::{authinfo, computer, init, log, paths, stats, user};
use provena_cli::{
    AuthInfoCommand, Cli, CliConfig, CliContext, Commands, ComputerCommand, LogCommand, UserCommand,
    bootstrap, exit_code_for,
};
use provena_core::{NewComputer, NewUser};

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::from_cli(&cli);

    let Some(command) = cli.command else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(());
    };

    // Path diagnostics must work even when the database cannot be opened
    if matches!(command, Commands::Paths) {
        return paths::execute(&config);
    }

    let ctx = bootstrap(config).await?;
    dispatch(&ctx, command).await
}

async fn dispatch(ctx: &CliContext, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Paths => paths::execute(ctx.config())?,
        Commands::Init => init::execute(ctx).await?,
        Commands::User { command } => match command {
            UserCommand::Add {
                email,
                first_name,
                last_name,
                institution,
            } => {
                let new = NewUser {
                    first_name,
                    last_name,
                    institution,
                    ..NewUser::with_email(email)
                };
                user::add(ctx, new).await?;
            }
            UserCommand::List => user::list(ctx).await?,
            UserCommand::Remove { email } => user::remove(ctx, &email).await?,
        },
        Commands::Computer { command } => match command {
            ComputerCommand::Add {
                label,
                hostname,
                transport,
                scheduler,
                description,
            } => {
                let mut new = NewComputer::new(label, hostname, transport, scheduler);
                new.description = description;
                computer::add(ctx, new).await?;
            }
            ComputerCommand::List => computer::list(ctx).await?,
            ComputerCommand::Remove { label } => computer::remove(ctx, &label).await?,
        },
        Commands::Authinfo { command } => match command {
            AuthInfoCommand::Configure {
                computer,
                user,
                params,
            } => authinfo::configure(ctx, &computer, &user, &params).await?,
            AuthInfoCommand::List { user } => authinfo::list(ctx, &user).await?,
            AuthInfoCommand::Disable { computer, user } => {
                authinfo::set_enabled(ctx, &computer, &user, false).await?;
            }
            AuthInfoCommand::Enable { computer, user } => {
                authinfo::set_enabled(ctx, &computer, &user, true).await?;
            }
        },
        Commands::Log { command } => match command {
            LogCommand::List {
                node,
                level,
                logger,
                since,
                limit,
                newest_first,
            } => {
                let args = log::ListArgs {
                    node,
                    level,
                    logger,
                    since,
                    limit,
                    newest_first,
                };
                log::list(ctx, args).await?;
            }
            LogCommand::Purge { node, before, all } => {
                log::purge(ctx, node, before.as_deref(), all).await?;
            }
        },
        Commands::Stats { node } => stats::execute(ctx, node).await?,
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables before parsing so they can feed `env` args
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}
