use axum::{
    extract::{Query, State},
    Json,
};
use common::types::Trade;
use serde::Deserialize;
use std::sync::Arc;

use crate::api::AppState;
use crate::store::CAPACITY;

const DEFAULT_LIMIT: usize = 10;

#[derive(Deserialize)]
pub struct AlertsQuery {
    pub limit: Option<usize>,
}

/// Most recent trades, newest first.
pub async fn get_alerts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AlertsQuery>,
) -> Json<Vec<Trade>> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, CAPACITY);
    Json(state.store.recent(limit).await)
}
