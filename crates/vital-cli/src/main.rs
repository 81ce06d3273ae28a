//! Vital CLI - Command-line interface for the Vital health tracker
//!
//! Toggle widgets, set goals, and keep habits from the terminal.

mod cli;
mod commands;
mod error;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vital=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let db_path = commands::common::resolve_db_path(cli.db_path);
    let user = commands::common::resolve_user(cli.user)?;

    match cli.command {
        Commands::Status { json } => commands::status::run(&db_path, &user, json).await,
        Commands::Widget { command } => commands::widgets::run(&db_path, &user, command).await,
        Commands::Params { command } => commands::params::run(&db_path, &user, command).await,
        Commands::Habit { command } => commands::habits::run(&db_path, &user, command).await,
    }
}
