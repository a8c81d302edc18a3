//! Narration server binary
//!
//! Configuration: `NARRATION_CONFIG` (file path, defaults to
//! `config/default.{toml,yaml}` when present) plus `NARRATION__*` overrides.

use std::path::PathBuf;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusBuilder;
use narration_config::{LoggingSettings, NarrationSettings};
use narration_pipeline::StubSpeechProvider;
use narration_server::{create_router, AppState};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATHS: [&str; 2] = ["config/default.toml", "config/default.yaml"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::var_os("NARRATION_CONFIG")
        .map(PathBuf::from)
        .or_else(|| {
            DEFAULT_CONFIG_PATHS
                .iter()
                .map(PathBuf::from)
                .find(|path| path.exists())
        });
    let settings = NarrationSettings::load(config_path.as_deref())?;
    init_tracing(&settings.logging);

    tracing::info!(
        config = ?config_path,
        version = env!("CARGO_PKG_VERSION"),
        "Starting narration server"
    );

    let metrics = PrometheusBuilder::new().install_recorder()?;
    let store = narration_persistence::init(&settings.persistence).await?;
    let provider = Arc::new(StubSpeechProvider::default());
    let state = AppState::new(&settings, store, provider, Some(metrics));
    let app = create_router(state);

    let addr = settings.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingSettings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
