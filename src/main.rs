use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use forward_proxy::config::{self, ProxyConfig};
use forward_proxy::http::HttpServer;
use forward_proxy::lifecycle::Shutdown;
use forward_proxy::observability;

#[derive(Parser)]
#[command(name = "forward-proxy")]
#[command(about = "JSON-described HTTP forwarding proxy", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => ProxyConfig::default(),
    };
    config::apply_env_overrides(&mut config)?;

    observability::logging::init(&config.observability.log_level);

    tracing::info!("forward-proxy v0.1.0 starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        override_host = config.upstream.override_host.as_deref().unwrap_or("-"),
        override_scheme = config.upstream.override_scheme.as_deref().unwrap_or("-"),
        "Configuration loaded"
    );

    // Bind TCP listener; a bind failure is fatal at startup.
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let ctrl_c_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            ctrl_c_shutdown.trigger();
        }
    });

    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
