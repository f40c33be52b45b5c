use chrono::{Duration as ChronoDuration, Utc};
use common::types::{Conviction, Trade, TradeSource};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::conviction::SIMULATOR_POLICY;
use crate::ingestion::random_tx_hash;
use crate::registry::Registry;
use crate::store::{TradeDraft, TradeStore};

/// Whole-dollar trade sizes, upper bound exclusive.
const MIN_VALUE_USD: u32 = 3_000;
const MAX_VALUE_USD: u32 = 20_000;

/// Fabricate one plausible trade from a random tracked wallet and token.
/// Returns `None` only when the registry has no wallets or no tokens.
pub fn generate<R: Rng + ?Sized>(registry: &Registry, rng: &mut R) -> Option<TradeDraft> {
    let wallet = registry.wallets().choose(rng)?;
    let token = registry.tokens().choose(rng)?;
    let value_usd = f64::from(rng.gen_range(MIN_VALUE_USD..MAX_VALUE_USD));
    let assessment = SIMULATOR_POLICY.assess(value_usd, rng);

    Some(TradeDraft {
        wallet_address: wallet.address.clone(),
        wallet_name: wallet.name.clone(),
        token: token.symbol.to_string(),
        token_address: token.address.to_string(),
        value_usd,
        position_pct: assessment.position_pct,
        conviction: assessment.conviction,
        narrative: token.narrative.to_string(),
        tx_hash: random_tx_hash(rng),
        timestamp: Utc::now(),
        source: TradeSource::Simulated,
    })
}

/// The three demo trades every process starts with, newest first, ids 1 through 3.
pub fn seed_trades(registry: &Registry) -> Vec<Trade> {
    let seeds = [
        ("EIGEN", 12_400.0, 15.2, Conviction::High, 10, "0xabc123"),
        ("OLAS", 8_750.0, 8.5, Conviction::Medium, 25, "0xdef456"),
        ("RUNE", 5_200.0, 4.8, Conviction::Low, 45, "0x789abc"),
    ];
    let now = Utc::now();

    registry
        .wallets()
        .iter()
        .zip(seeds)
        .enumerate()
        .map(
            |(i, (wallet, (symbol, value_usd, position_pct, conviction, minutes_ago, tx_hash)))| {
                let token = registry.tokens().iter().find(|t| t.symbol == symbol);
                Trade {
                    id: (i + 1).to_string(),
                    wallet_address: wallet.address.clone(),
                    wallet_name: wallet.name.clone(),
                    token: symbol.to_string(),
                    token_address: token.map_or("", |t| t.address).to_string(),
                    value_usd,
                    position_pct,
                    conviction,
                    narrative: registry.narrative(symbol).to_string(),
                    tx_hash: tx_hash.to_string(),
                    timestamp: now - ChronoDuration::minutes(minutes_ago),
                    source: TradeSource::Simulated,
                }
            },
        )
        .collect()
}

/// Insert one synthetic trade every `interval` until `cancel` fires.
/// The first trade lands one full interval after start.
pub async fn run(
    store: Arc<TradeStore>,
    registry: Arc<Registry>,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut rng = StdRng::from_entropy();
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(interval_secs = interval.as_secs(), "trade simulator started");

    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                info!("trade simulator stopped");
                break;
            }
            _ = ticker.tick() => {
                let Some(draft) = generate(&registry, &mut rng) else {
                    continue;
                };
                let trade = store.insert(draft).await;
                info!(
                    trade_id = %trade.id,
                    wallet = %trade.wallet_name,
                    token = %trade.token,
                    value_usd = trade.value_usd,
                    conviction = %trade.conviction,
                    "simulated trade"
                );
            }
        }
    }
}

pub fn spawn(
    store: Arc<TradeStore>,
    registry: Arc<Registry>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(run(store, registry, interval, cancel))
}
