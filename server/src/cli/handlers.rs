// server/src/cli/handlers.rs

use std::path::Path;

use anyhow::{Context, Result};
use log::{error, info};

use rest_api::config::Settings;
use rest_api::start_server;

/// Resolves when the process is asked to stop (Ctrl-C, or SIGTERM on unix).
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("Shutdown signal received");
}

pub async fn handle_start(
    config: Option<&Path>,
    port: Option<u16>,
    host: Option<String>,
) -> Result<()> {
    let mut settings = Settings::load(config)?;
    if let Some(port) = port {
        settings.server.port = port;
    }
    if let Some(host) = host {
        settings.server.host = host;
    }
    info!(
        "Starting hospital API on {} ({} storage, {} identity provider)",
        settings.bind_address(),
        settings.storage.engine,
        settings.auth.provider
    );
    start_server(settings, shutdown_signal()).await
}

pub fn handle_show_config(config: Option<&Path>) -> Result<()> {
    let settings = Settings::load(config)?;
    let rendered = serde_yaml::to_string(&settings.redacted())
        .context("Failed to render configuration")?;
    println!("{}", rendered);
    Ok(())
}
