//! Souvenir server binary.

use anyhow::{Context, Result};
use clap::Parser;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use souvenir_core::config::AppConfig;
use souvenir_server::{AppState, create_router};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Souvenir - a personal map of visited places
#[derive(Parser, Debug)]
#[command(name = "souvenird")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "SOUVENIR_CONFIG",
        default_value = "config/server.toml"
    )]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Souvenir v{}", env!("CARGO_PKG_VERSION"));

    // The config file is optional: defaults and SOUVENIR_ env vars cover everything
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));
    if std::path::Path::new(&args.config).exists() {
        tracing::info!(config_path = %args.config, "Loading configuration from file");
        figment = figment.merge(Toml::file(&args.config));
    } else {
        tracing::debug!("No config file found at {}, using defaults", args.config);
    }

    let config: AppConfig = figment
        .merge(Env::prefixed("SOUVENIR_").split("__"))
        .extract()
        .context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    let storage = souvenir_storage::from_config(&config.storage)
        .await
        .context("failed to initialize photo storage")?;
    storage
        .health_check()
        .await
        .context("photo storage health check failed")?;
    tracing::info!(backend = storage.backend_name(), "Photo storage initialized");

    let metadata = souvenir_metadata::from_config(&config.metadata)
        .await
        .context("failed to initialize metadata store")?;
    metadata
        .health_check()
        .await
        .context("metadata store health check failed")?;
    tracing::info!(backend = metadata.backend_name(), "Metadata store initialized");

    if !config.server.admin_page().exists() {
        tracing::warn!(
            path = %config.server.admin_page().display(),
            "Admin page not found, the admin route will return 404"
        );
    }

    let addr: SocketAddr = config.server.bind.parse().context("invalid bind address")?;
    let admin_path = config.server.admin_path.clone();

    let state = AppState::new(config, storage, metadata);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    tracing::info!("Listening on http://{}", addr);
    tracing::info!("Admin page at http://{}{}", addr, admin_path);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
