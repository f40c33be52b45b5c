pub mod alerts;
pub mod ingest;
pub mod wallets;

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::ingestion::IngestError;
use crate::registry::Registry;
use crate::store::TradeStore;

/// Shared application state available to all handlers.
pub struct AppState {
    pub store: Arc<TradeStore>,
    pub registry: Arc<Registry>,
    pub demo_mode: bool,
    pub started_at: chrono::DateTime<chrono::Utc>,
    /// `None` when metrics are disabled; `/metrics` then answers 404.
    pub metrics: Option<PrometheusHandle>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    BadBody(#[from] IngestError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::BadBody(_) => StatusCode::BAD_REQUEST,
        };
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(render_metrics))
        .route("/api/wallets", get(wallets::list_wallets))
        .route("/api/alerts", get(alerts::get_alerts))
        .route("/webhook/alchemy", post(ingest::alchemy_webhook))
        .route("/api/inject", post(ingest::inject_trade))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    demo_mode: bool,
    trades: usize,
    uptime_secs: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let uptime = chrono::Utc::now()
        .signed_duration_since(state.started_at)
        .num_seconds();

    Json(HealthResponse {
        status: "ok",
        service: "smart_money_tracker",
        version: env!("CARGO_PKG_VERSION"),
        demo_mode: state.demo_mode,
        trades: state.store.len().await,
        uptime_secs: uptime,
    })
}

async fn render_metrics(State(state): State<Arc<AppState>>) -> Response {
    match &state.metrics {
        Some(handle) => {
            handle.run_upkeep();
            (
                [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
                handle.render(),
            )
                .into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
