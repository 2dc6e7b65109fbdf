// server/src/main.rs

// Entry point for the hospital API server: parses the command line and
// dispatches to the CLI handlers.

use anyhow::Result;
use hospital_server::cli::start_cli;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    start_cli().await
}
