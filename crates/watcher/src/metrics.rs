use anyhow::Result;
use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub fn describe() {
    describe_counter!(
        "watcher_trades_ingested_total",
        "Trades inserted into the recent-trade buffer, by source."
    );
    describe_counter!(
        "watcher_webhook_activities_total",
        "Webhook activities seen, by outcome (accepted, wrong_category, untracked_wallet, malformed)."
    );
    describe_gauge!(
        "watcher_buffered_trades",
        "Trades currently held in the recent-trade buffer."
    );
    describe_gauge!(
        "watcher_build_info",
        "Build info for the wallet watcher (value is always 1)."
    );
}

/// Install the global Prometheus recorder and return the handle `/metrics` renders from.
pub fn install() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    describe();
    metrics::gauge!("watcher_build_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
    Ok(handle)
}
