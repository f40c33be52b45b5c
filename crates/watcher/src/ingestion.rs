use chrono::Utc;
use common::types::{Conviction, Trade, TradeSource};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::conviction::WEBHOOK_POLICY;
use crate::registry::{Registry, DEFAULT_NARRATIVE, UNKNOWN_SYMBOL};
use crate::store::{TradeDraft, TradeStore};

pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";
const UNKNOWN_WALLET: &str = "Unknown Wallet";
const MANUAL_VALUE_USD: f64 = 5000.0;
const MANUAL_POSITION_PCT: f64 = 10.0;

/// Transfer categories that represent token trades. Native ETH moves are ignored.
const TOKEN_CATEGORIES: [&str; 2] = ["token", "erc20"];

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("{0}")]
    Malformed(#[from] serde_json::Error),
    #[error("expected a JSON object")]
    NotAnObject,
}

/// Alchemy address-activity webhook envelope.
#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)] // Full envelope shape; only `event` drives ingestion
#[serde(rename_all = "camelCase")]
pub struct AlchemyWebhook {
    #[serde(default)]
    pub webhook_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    pub event: AlchemyEvent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlchemyEvent {
    #[serde(default)]
    pub network: Option<String>,
    /// Raw activity entries. Each is decoded on its own so one odd entry
    /// cannot sink the rest of the batch.
    #[serde(default)]
    pub activity: Vec<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(dead_code)] // Deserialized from the webhook, not all fields are used
pub struct AlchemyActivity {
    pub from_address: Option<String>,
    pub to_address: Option<String>,
    pub block_num: Option<String>,
    pub hash: Option<String>,
    /// Transfer amount in whole token units; null for some categories.
    pub value: Option<f64>,
    pub asset: Option<String>,
    pub category: Option<String>,
    pub raw_contract: RawContract,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(dead_code)]
pub struct RawContract {
    pub address: Option<String>,
    pub decimals: Option<u32>,
}

/// What `/webhook/alchemy` received.
#[derive(Debug)]
pub enum WebhookBody {
    Alchemy(AlchemyWebhook),
    Freeform(Map<String, Value>),
}

/// Parse a webhook body, preferring the Alchemy envelope and falling back to a
/// freeform object.
pub fn parse_webhook_body(body: &[u8]) -> Result<WebhookBody, IngestError> {
    let value: Value = serde_json::from_slice(body)?;
    if value.get("event").is_some() {
        if let Ok(webhook) = AlchemyWebhook::deserialize(&value) {
            return Ok(WebhookBody::Alchemy(webhook));
        }
    }
    match value {
        Value::Object(map) => Ok(WebhookBody::Freeform(map)),
        _ => Err(IngestError::NotAnObject),
    }
}

pub fn parse_freeform_body(body: &[u8]) -> Result<Map<String, Value>, IngestError> {
    match serde_json::from_slice::<Value>(body)? {
        Value::Object(map) => Ok(map),
        _ => Err(IngestError::NotAnObject),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActivityOutcome {
    Accepted(TradeDraft),
    WrongCategory,
    UntrackedWallet,
    /// Undecodable entry, or a negative or non-finite amount.
    Malformed,
}

impl ActivityOutcome {
    fn label(&self) -> &'static str {
        match self {
            Self::Accepted(_) => "accepted",
            Self::WrongCategory => "wrong_category",
            Self::UntrackedWallet => "untracked_wallet",
            Self::Malformed => "malformed",
        }
    }
}

/// Normalize one webhook activity. Only token transfers sent by a tracked wallet
/// produce a draft.
pub fn draft_from_activity(registry: &Registry, activity: &AlchemyActivity) -> ActivityOutcome {
    let category = activity.category.as_deref().unwrap_or_default();
    if !TOKEN_CATEGORIES.contains(&category) {
        return ActivityOutcome::WrongCategory;
    }
    let from = activity.from_address.as_deref().unwrap_or_default();
    let Some(wallet_name) = registry.wallet_name(from) else {
        return ActivityOutcome::UntrackedWallet;
    };
    let amount = activity.value.unwrap_or(0.0);
    if !amount.is_finite() || amount < 0.0 {
        return ActivityOutcome::Malformed;
    }

    let mut rng = rand::thread_rng();
    let token_address = activity.raw_contract.address.clone().unwrap_or_default();
    let symbol = registry.token_symbol(&token_address);
    let value_usd = amount * registry.price(symbol);
    let assessment = WEBHOOK_POLICY.assess(value_usd, &mut rng);
    let tx_hash = match activity.hash.as_deref() {
        Some(hash) if !hash.is_empty() => hash.to_string(),
        _ => random_tx_hash(&mut rng),
    };

    ActivityOutcome::Accepted(TradeDraft {
        wallet_address: from.to_string(),
        wallet_name: wallet_name.to_string(),
        token: symbol.to_string(),
        token_address,
        value_usd,
        position_pct: assessment.position_pct,
        conviction: assessment.conviction,
        narrative: registry.narrative(symbol).to_string(),
        tx_hash,
        timestamp: Utc::now(),
        source: TradeSource::Live,
    })
}

fn non_empty_str<'a>(payload: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Build a manual trade from an arbitrary JSON object. Missing, empty or
/// mistyped fields fall back to defaults.
pub fn draft_from_payload<R: Rng + ?Sized>(
    registry: &Registry,
    payload: &Map<String, Value>,
    rng: &mut R,
) -> TradeDraft {
    let tracked = non_empty_str(payload, "wallet_address").and_then(|a| registry.wallet(a));
    let wallet_address = tracked
        .or_else(|| registry.default_wallet())
        .map_or_else(|| ZERO_ADDRESS.to_string(), |w| w.address.clone());
    let wallet_name = non_empty_str(payload, "wallet_name")
        .or_else(|| tracked.map(|w| w.name.as_str()))
        .unwrap_or(UNKNOWN_WALLET);

    let value_usd = payload
        .get("value_usd")
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(MANUAL_VALUE_USD);
    let conviction = non_empty_str(payload, "conviction")
        .and_then(Conviction::from_str_loose)
        .unwrap_or(Conviction::Medium);

    TradeDraft {
        wallet_address,
        wallet_name: wallet_name.to_string(),
        token: non_empty_str(payload, "token")
            .unwrap_or(UNKNOWN_SYMBOL)
            .to_string(),
        token_address: ZERO_ADDRESS.to_string(),
        value_usd,
        position_pct: MANUAL_POSITION_PCT,
        conviction,
        narrative: non_empty_str(payload, "narrative")
            .unwrap_or(DEFAULT_NARRATIVE)
            .to_string(),
        tx_hash: random_tx_hash(rng),
        timestamp: Utc::now(),
        source: TradeSource::Manual,
    }
}

/// `0x` followed by 32 random bytes in hex.
pub fn random_tx_hash<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut bytes = [0u8; 32];
    rng.fill(&mut bytes[..]);
    format!("0x{}", hex::encode(bytes))
}

#[derive(Debug)]
pub struct WebhookSummary {
    pub activity: usize,
    pub inserted: Vec<Trade>,
}

/// Process every activity independently; malformed, untracked or non-token
/// activity is skipped.
pub async fn ingest_webhook(
    store: &TradeStore,
    registry: &Registry,
    webhook: &AlchemyWebhook,
) -> WebhookSummary {
    info!(
        webhook_id = webhook.webhook_id.as_deref().unwrap_or(""),
        network = webhook.event.network.as_deref().unwrap_or(""),
        activity = webhook.event.activity.len(),
        "received alchemy webhook"
    );

    let mut inserted = Vec::new();
    for raw in &webhook.event.activity {
        let outcome = match AlchemyActivity::deserialize(raw) {
            Ok(activity) => draft_from_activity(registry, &activity),
            Err(e) => {
                debug!(error = %e, "undecodable webhook activity");
                ActivityOutcome::Malformed
            }
        };
        metrics::counter!("watcher_webhook_activities_total", "outcome" => outcome.label())
            .increment(1);
        match outcome {
            ActivityOutcome::Accepted(draft) => {
                let trade = store.insert(draft).await;
                info!(
                    trade_id = %trade.id,
                    wallet = %trade.wallet_name,
                    token = %trade.token,
                    value_usd = trade.value_usd,
                    conviction = %trade.conviction,
                    "live trade"
                );
                inserted.push(trade);
            }
            skipped => {
                debug!(
                    from = raw.get("fromAddress").and_then(serde_json::Value::as_str).unwrap_or(""),
                    category = raw.get("category").and_then(serde_json::Value::as_str).unwrap_or(""),
                    reason = skipped.label(),
                    "skipping webhook activity"
                );
            }
        }
    }

    WebhookSummary {
        activity: webhook.event.activity.len(),
        inserted,
    }
}

pub async fn ingest_payload(
    store: &TradeStore,
    registry: &Registry,
    payload: &Map<String, Value>,
) -> Trade {
    let draft = draft_from_payload(registry, payload, &mut rand::thread_rng());
    let trade = store.insert(draft).await;
    info!(
        trade_id = %trade.id,
        wallet = %trade.wallet_name,
        token = %trade.token,
        value_usd = trade.value_usd,
        "manual trade injected"
    );
    trade
}
