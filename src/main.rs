//! Remote config host application.
//!
//! A thin Axum app showing the middleware in place: loads its settings,
//! builds one client, runs the startup hook and serves requests that carry
//! the cached configuration.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use remote_config_middleware::config::{load_config, validation::validate_config, ConfigError};
use remote_config_middleware::observability::{logging, metrics};
use remote_config_middleware::{AppConfig, HttpServer, RemoteConfigClient, Shutdown};

#[derive(Parser)]
#[command(name = "remote-config-middleware")]
#[command(about = "Host application for the remote config middleware", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `client.app_id`.
    #[arg(long)]
    app_id: Option<String>,
}

fn load(args: &Args) -> Result<AppConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(app_id) = &args.app_id {
        config.client.app_id = app_id.clone();
    }
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load(&args)?;

    logging::init_logging(&config.observability.log_level);

    tracing::info!("remote-config-middleware v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        app_id = %config.client.app_id,
        env = %config.client.env,
        cluster = %config.client.cluster,
        config_server = %config.client.config_server_url,
        namespaces = ?config.startup.namespaces,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // validated above
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let client = RemoteConfigClient::new(config.client.clone())?;
    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        signal.trigger_on_ctrl_c().await;
    });

    HttpServer::new(config, client).run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
