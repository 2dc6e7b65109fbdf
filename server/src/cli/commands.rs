// server/src/cli/commands.rs

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// CLI entry point for the hospital API server
#[derive(Parser, Debug)]
#[command(name = "hms-server")]
#[command(version = "0.1.0")]
#[command(about = "Hospital management API server")]
pub struct CliArgs {
    /// YAML configuration file (defaults to config/hospital.yaml when present)
    #[arg(short = 'c', long = "config", value_name = "FILE", env = "HMS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<HmsCommands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum HmsCommands {
    /// Start the API server (the default)
    Start {
        #[arg(short = 'p', long = "port", value_name = "PORT")]
        port: Option<u16>,
        #[arg(long = "host", value_name = "HOST")]
        host: Option<String>,
    },
    /// Print the effective configuration with secrets redacted
    Config,
}
