// server/src/cli/cli.rs

use anyhow::Result;
use clap::Parser;

use crate::cli::commands::{CliArgs, HmsCommands};
use crate::cli::handlers::{handle_show_config, handle_start};

/// Parses the command line and runs the chosen command; no subcommand
/// means `start`.
pub async fn start_cli() -> Result<()> {
    let args = CliArgs::parse();
    let config = args.config.as_deref();

    match args.command.unwrap_or(HmsCommands::Start {
        port: None,
        host: None,
    }) {
        HmsCommands::Start { port, host } => handle_start(config, port, host).await,
        HmsCommands::Config => handle_show_config(config),
    }
}
