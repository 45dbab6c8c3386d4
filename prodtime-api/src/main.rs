//! prodtime-api - production-time calculation service
//!
//! Serves lesson production-time previews, project/folder/workspace totals
//! and tier analytics to the web application over JSON.

use anyhow::{Context, Result};
use clap::Parser;
use prodtime_api::logging::init_tracing;
use prodtime_api::{build_router, AppState};
use prodtime_common::config::{save_config_path, write_toml_config, TomlConfig};
use std::path::PathBuf;
use tracing::{info, warn};

/// Production-time calculation service
#[derive(Parser, Debug)]
#[clap(name = "prodtime-api")]
#[clap(about = "Serve lesson production-time calculations over HTTP")]
struct Args {
    /// Configuration file (overrides PRODTIME_CONFIG and the platform default)
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides the configuration file)
    #[clap(long)]
    port: Option<u16>,

    /// Address to bind (overrides the configuration file)
    #[clap(long, value_name = "ADDR")]
    bind: Option<String>,

    /// Write the effective configuration (file plus overrides) back to the
    /// configuration file before serving
    #[clap(long)]
    save_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Configuration first: it decides where logs go
    let (mut config, config_source) = TomlConfig::load_with_source(args.config.as_deref());
    init_tracing(&config.logging)?;

    // Build identification immediately after tracing init
    info!(
        "Starting production-time service (prodtime-api) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    config_source.log();

    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }

    if args.save_config {
        // Best effort: a failed save never stops the service
        match save_config_path(args.config.as_deref()) {
            Some(path) => match write_toml_config(&config, &path) {
                Ok(()) => info!("Saved configuration to {}", path.display()),
                Err(e) => warn!("Failed to save configuration to {}: {}", path.display(), e),
            },
            None => warn!("No configuration directory available, configuration not saved"),
        }
    }

    let addr = config.socket_addr();
    let state = AppState::new(config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("prodtime-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
