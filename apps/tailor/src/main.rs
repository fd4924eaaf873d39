mod cli;
mod config;
mod errors;
mod generation;
mod layout;
mod llm_client;
mod models;
mod output;
mod render;

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{commands, Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for pipes
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), config::log_level()))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    debug!("tailor v{}", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Command::Generate(args) => commands::generate(args).await.map(|report| report.succeeded()),
        Command::Convert(args) => commands::convert(args).await.map(|()| true),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            e.exit_code()
        }
    }
}
