//! caseflow binary entry point.

mod cli;
mod config;
mod runner;

use clap::Parser;
use cli::{Cli, Command};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Process {
            case_folder,
            output,
            overwrite,
        } => cli::process::run(&case_folder, &output, overwrite.into(), config),
        Command::Validate { hydrated_json } => cli::validate::run(&hydrated_json),
        Command::Info => cli::info::run(config),
    }
}
