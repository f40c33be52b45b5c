use axum::{extract::State, Json};
use common::types::Wallet;
use std::sync::Arc;

use crate::api::AppState;

pub async fn list_wallets(State(state): State<Arc<AppState>>) -> Json<Vec<Wallet>> {
    Json(state.registry.wallets().to_vec())
}

#[cfg(test)]
mod tests {
    use crate::api::router;
    use crate::api::tests::{body_json, test_state};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_list_wallets() {
        let app = router(test_state(false));
        let req = Request::builder()
            .uri("/api/wallets")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let wallets = json.as_array().unwrap();
        assert_eq!(wallets.len(), 3);
        assert_eq!(wallets[1]["name"], "Binance14");
        assert_eq!(wallets[1]["style"], "Swing Trader");
        assert_eq!(wallets[1]["win_rate"], 72.3);
        assert_eq!(wallets[2]["avg_return"], 95.3);
        assert_eq!(
            wallets[0]["address"],
            "0x7f3a152F09324f2aee916CE069D3908603449173"
        );
    }
}
