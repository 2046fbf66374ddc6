//! OpenPay HTTP server
//!
//! Serves the alias directory and wallet resolver over HTTP.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use openpay_lib::OpenpayConfig;
use openpay_server::{build_router, AppState};

#[derive(Parser)]
#[command(name = "openpay-server")]
#[command(about = "OpenPay alias directory HTTP facade", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON configuration file
    #[arg(long, env = "OPENPAY_CONFIG", default_value = "openpay.json")]
    config: PathBuf,

    /// Directory file (overrides the configuration file)
    #[arg(long, env = "OPENPAY_DIRECTORY")]
    directory: Option<PathBuf>,

    /// Listen address, e.g. 0.0.0.0:5000
    #[arg(long, env = "OPENPAY_LISTEN")]
    listen: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "openpay_server=debug,openpay_lib=debug,tower_http=debug"
    } else {
        "openpay_server=info,openpay_lib=info,tower_http=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = OpenpayConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(directory) = cli.directory {
        config = config.with_directory_path(directory);
    }
    if let Some(listen) = cli.listen {
        config = config.with_listen_addr(listen);
    }
    config.validate()?;

    let addr = config.socket_addr()?;
    let state = AppState::from_config(&config)?;
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!(
        %addr,
        directory = %config.directory_path.display(),
        "openpay server listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("openpay server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down gracefully");
}
