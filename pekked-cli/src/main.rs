//! pekked command-line client
//!
//! Talks to a signing wallet over JSON-RPC and drives the registration
//! workflows from `pekked-app`. Logs go to stderr, output to stdout.

mod cli;
mod commands;
mod config;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Cli;

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_target(false),
        )
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config::load_or_default(cli.config.as_deref())?;
    let config = config::with_overrides(config, cli.rpc_url);
    tracing::debug!("Using wallet endpoint {:?}", config.rpc_url);
    commands::run(cli.command, &config).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
