use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::error;

use pricehound::adapter::inbound::cli::command::{Cli, Commands};
use pricehound::adapter::inbound::cli::{check, run};

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Run(args) => run::execute(args).await.context("pricehound run failed"),
        Commands::Check(args) => check::execute(args).context("configuration check failed"),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "Fatal error");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
