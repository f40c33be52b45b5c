mod api;
mod config;
mod conviction;
mod ingestion;
mod metrics;
mod registry;
mod simulator;
mod store;

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; real environment variables still apply.
    dotenvy::dotenv().ok();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(config::WatcherConfig::default_config_path);
    let config = config::WatcherConfig::load(&config_path)?;

    let (dispatch, _otel_guard) =
        common::observability::build_dispatch("wallet-watcher", &config.observability.log_level);
    tracing::dispatcher::set_global_default(dispatch).map_err(anyhow::Error::msg)?;
    info!(path = %config_path, "loaded watcher config");

    let prometheus = if config.observability.metrics_enabled {
        Some(metrics::install().context("failed to install Prometheus recorder")?)
    } else {
        None
    };

    let registry = Arc::new(registry::Registry::builtin());
    let store = Arc::new(store::TradeStore::with_trades(simulator::seed_trades(
        &registry,
    )));
    info!(trades = store.len().await, "initialized with demo trades");

    let cancel = CancellationToken::new();
    let simulator_task = if config.simulator.demo_mode {
        info!(
            interval_secs = config.simulator.interval_secs,
            "demo mode enabled, trade simulator active"
        );
        Some(simulator::spawn(
            Arc::clone(&store),
            Arc::clone(&registry),
            config.simulator.interval(),
            cancel.clone(),
        ))
    } else {
        info!("live mode, waiting for webhook activity");
        None
    };

    let state = Arc::new(api::AppState {
        store,
        registry,
        demo_mode: config.simulator.demo_mode,
        started_at: chrono::Utc::now(),
        metrics: prometheus,
    });
    let app = api::router(state);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    info!(addr = %bind_addr, "starting wallet watcher HTTP server");
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    let shutdown = cancel.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
            info!("shutdown signal received");
            shutdown.cancel();
        })
        .await?;

    cancel.cancel();
    if let Some(task) = simulator_task {
        task.await.context("simulator task panicked")?;
    }
    info!("wallet watcher stopped");
    Ok(())
}
