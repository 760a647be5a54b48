//! CLI entry point - the composition root.
//!
//! Command dispatch routes to handlers which delegate to `HubCore`.

use std::process::ExitCode;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use hub_cli::handlers::{self, resources::ListArgs};
use hub_cli::{Cli, CliConfig, CliError, Commands, OutputFormat, bootstrap};

/// Log to stderr at `info`, or `debug` with `-v`; `RUST_LOG` wins.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Cancel `token` on the first Ctrl-C.
fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, finishing directories in flight");
            token.cancel();
        }
    });
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::from_cli(&cli)?;
    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());
    let ctx = bootstrap(config, OutputFormat::from_json_flag(cli.json), cancel).await?;

    match cli.command {
        Commands::Sync(args) => {
            let report = handlers::sync::execute(&ctx, &args).await?;
            if report.failed > 0 {
                tracing::warn!(failed = report.failed, "Some catalog directories failed");
            }
        }
        Commands::List {
            kind,
            tags,
            verified,
            user,
        } => {
            let args = ListArgs {
                kind,
                tags,
                verified,
                user,
            };
            handlers::resources::list(&ctx, args).await?;
        }
        Commands::Show { id, readme } => handlers::resources::show(&ctx, id, readme).await?,
        Commands::Delete { id } => handlers::resources::delete(&ctx, id).await?,
        Commands::Tags => handlers::labels::tags(&ctx).await?,
        Commands::Categories => handlers::labels::categories(&ctx).await?,
        Commands::Links { id } => handlers::resources::links(&ctx, id).await?,
        Commands::Download { id } => handlers::resources::download(&ctx, id).await?,
        Commands::Submit(args) => handlers::submit::execute(&ctx, args).await?,
        Commands::Rate { command } => handlers::rate::execute(&ctx, command).await?,
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before parsing so env-backed flags see it
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            let code = err.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(code)
        }
    }
}
