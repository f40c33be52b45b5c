use axum::{body::Bytes, extract::State, response::IntoResponse, Json};
use common::types::Trade;
use serde::Serialize;
use std::sync::Arc;

use crate::api::{ApiError, AppState};
use crate::ingestion::{self, WebhookBody};

#[derive(Serialize)]
pub struct ProcessedResponse {
    pub status: &'static str,
    pub activity: usize,
    pub inserted: usize,
}

#[derive(Serialize)]
pub struct TradeAccepted {
    pub status: &'static str,
    pub trade: Trade,
}

/// Alchemy address-activity webhook. Bodies without the Alchemy envelope are
/// taken as freeform trade payloads.
pub async fn alchemy_webhook(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let response = match ingestion::parse_webhook_body(&body)? {
        WebhookBody::Alchemy(webhook) => {
            let summary = ingestion::ingest_webhook(&state.store, &state.registry, &webhook).await;
            Json(ProcessedResponse {
                status: "processed",
                activity: summary.activity,
                inserted: summary.inserted.len(),
            })
            .into_response()
        }
        WebhookBody::Freeform(payload) => {
            let trade = ingestion::ingest_payload(&state.store, &state.registry, &payload).await;
            Json(TradeAccepted {
                status: "received",
                trade,
            })
            .into_response()
        }
    };
    Ok(response)
}

/// Manual trade injection for demos and testing.
pub async fn inject_trade(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<TradeAccepted>, ApiError> {
    let payload = ingestion::parse_freeform_body(&body)?;
    let trade = ingestion::ingest_payload(&state.store, &state.registry, &payload).await;
    Ok(Json(TradeAccepted {
        status: "injected",
        trade,
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::router;
    use crate::api::tests::{body_json, test_state};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    const WHALE: &str = "0x7f3a152F09324f2aee916CE069D3908603449173";
    const OLAS: &str = "0x0001a500a6b18995b03f44bb040a5ffc28e45cb0";

    fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    #[tokio::test]
    async fn test_inject_empty_payload_defaults() {
        let state = test_state(false);
        let app = router(state.clone());

        let response = app.oneshot(post("/api/inject", "{}")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "injected");
        let trade = &json["trade"];
        assert_eq!(trade["id"], "4");
        assert_eq!(trade["wallet_name"], "Unknown Wallet");
        assert_eq!(trade["wallet_address"], WHALE);
        assert_eq!(trade["token"], "UNKNOWN");
        assert_eq!(trade["value_usd"], 5000.0);
        assert_eq!(trade["position_pct"], 10.0);
        assert_eq!(trade["conviction"], "Medium");
        assert_eq!(trade["narrative"], "General");
        assert_eq!(trade["source"], "manual");

        assert_eq!(state.store.len().await, 4);
        assert_eq!(state.store.recent(1).await[0].id, "4");
    }

    #[tokio::test]
    async fn test_inject_malformed_is_400() {
        let state = test_state(false);
        let app = router(state.clone());

        let response = app
            .clone()
            .oneshot(post("/api/inject", "{\"token\": "))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("EOF"));

        let response = app.oneshot(post("/api/inject", "[]")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "expected a JSON object");

        assert_eq!(state.store.len().await, 3);
    }

    #[tokio::test]
    async fn test_webhook_live_trade() {
        let state = test_state(false);
        let app = router(state.clone());
        // 7000 OLAS at $1.85 = $12,950
        let body = json!({
            "webhookId": "wh_test",
            "id": "whevt_1",
            "createdAt": "2024-05-01T12:00:00.000Z",
            "type": "ADDRESS_ACTIVITY",
            "event": {
                "network": "ETH_MAINNET",
                "activity": [
                    {
                        "fromAddress": WHALE,
                        "toAddress": "0xpool",
                        "hash": "0xlive",
                        "value": 7000,
                        "asset": "OLAS",
                        "category": "token",
                        "rawContract": { "address": OLAS, "decimals": 18 }
                    },
                    {
                        "fromAddress": "0x000000000000000000000000000000000000dEaD",
                        "hash": "0xignored",
                        "value": 7000,
                        "category": "token",
                        "rawContract": { "address": OLAS }
                    },
                    {
                        "fromAddress": WHALE,
                        "hash": "0xeth",
                        "value": 3.5,
                        "asset": "ETH",
                        "category": "external",
                        "rawContract": { "address": null }
                    }
                ]
            }
        });

        let response = app
            .oneshot(post("/webhook/alchemy", body.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "processed");
        assert_eq!(json["activity"], 3);
        assert_eq!(json["inserted"], 1);

        let recent = state.store.recent(1).await;
        let trade = &recent[0];
        assert_eq!(trade.id, "4");
        assert_eq!(trade.token, "OLAS");
        assert_eq!(trade.narrative, "AI Agents");
        assert_eq!(trade.tx_hash, "0xlive");
        assert_eq!(trade.conviction, common::types::Conviction::High);
        assert_eq!(state.store.len().await, 4);
    }

    #[tokio::test]
    async fn test_webhook_skips_undecodable_activity() {
        let state = test_state(false);
        let app = router(state.clone());
        let body = json!({
            "webhookId": "wh_test",
            "type": "ADDRESS_ACTIVITY",
            "event": {
                "network": "ETH_MAINNET",
                "activity": [
                    {
                        "fromAddress": WHALE,
                        "toAddress": null,
                        "hash": "0xgood",
                        "value": 7000,
                        "category": "token",
                        "rawContract": { "address": OLAS }
                    },
                    {
                        "fromAddress": WHALE,
                        "hash": "0xbad",
                        "value": "7000 OLAS",
                        "category": "token",
                        "rawContract": { "address": OLAS }
                    },
                    {
                        "fromAddress": WHALE,
                        "hash": "0xnegative",
                        "value": -20000,
                        "category": "token",
                        "rawContract": { "address": OLAS }
                    }
                ]
            }
        });

        let response = app
            .oneshot(post("/webhook/alchemy", body.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "processed");
        assert_eq!(json["activity"], 3);
        assert_eq!(json["inserted"], 1);

        assert_eq!(state.store.len().await, 4);
        let recent = state.store.recent(1).await;
        assert_eq!(recent[0].tx_hash, "0xgood");
        assert_eq!(recent[0].source, common::types::TradeSource::Live);
        assert!(recent[0].value_usd >= 0.0);
    }

    #[tokio::test]
    async fn test_webhook_freeform_fallback() {
        let state = test_state(false);
        let app = router(state.clone());

        let body = json!({ "wallet_name": "OTC Desk", "token": "RUNE", "value_usd": 8000.5 });
        let response = app
            .clone()
            .oneshot(post("/webhook/alchemy", body.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "received");
        assert_eq!(json["trade"]["wallet_name"], "OTC Desk");
        assert_eq!(json["trade"]["value_usd"], 8000.5);
        assert_eq!(json["trade"]["source"], "manual");

        let response = app
            .oneshot(post("/webhook/alchemy", "not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.store.len().await, 4);
    }
}
