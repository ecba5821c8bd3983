//! Serve command - run the HTTP recognition API.

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use crate::server::{self, AppState};

use super::{build_recognizer, load_config};

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Interface to bind (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

pub async fn run(args: ServeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    // The engine is loaded once here and shared by every request.
    let recognizer = build_recognizer(&config, args.model_dir.as_deref())?;
    info!("OCR engine ready: {}", recognizer.engine_name());

    let app = server::router(AppState::new(recognizer), &config.server);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    println!("{} Listening on http://{}", style("✓").green(), addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown requested");
    }
}
