use chrono::{DateTime, Utc};
use common::types::{Conviction, Trade, TradeSource};
use std::collections::VecDeque;
use tokio::sync::RwLock;

/// Maximum number of trades kept in memory.
pub const CAPACITY: usize = 20;

/// A trade that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeDraft {
    pub wallet_address: String,
    pub wallet_name: String,
    pub token: String,
    pub token_address: String,
    pub value_usd: f64,
    pub position_pct: f64,
    pub conviction: Conviction,
    pub narrative: String,
    pub tx_hash: String,
    pub timestamp: DateTime<Utc>,
    pub source: TradeSource,
}

impl TradeDraft {
    fn into_trade(self, id: u64) -> Trade {
        Trade {
            id: id.to_string(),
            wallet_address: self.wallet_address,
            wallet_name: self.wallet_name,
            token: self.token,
            token_address: self.token_address,
            value_usd: self.value_usd,
            position_pct: self.position_pct,
            conviction: self.conviction,
            narrative: self.narrative,
            tx_hash: self.tx_hash,
            timestamp: self.timestamp,
            source: self.source,
        }
    }
}

struct Inner {
    /// Newest first.
    trades: VecDeque<Trade>,
    last_id: u64,
}

/// Bounded, newest-first trade buffer shared by the API handlers and the simulator.
///
/// Ids are issued under the same write lock that prepends the trade, so buffer order
/// and id order always agree.
pub struct TradeStore {
    inner: RwLock<Inner>,
}

impl Default for TradeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TradeStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                trades: VecDeque::with_capacity(CAPACITY + 1),
                last_id: 0,
            }),
        }
    }

    /// Start from already-numbered trades (front = newest). The id counter resumes
    /// after the highest numeric id present.
    pub fn with_trades(trades: Vec<Trade>) -> Self {
        let last_id = trades
            .iter()
            .filter_map(|t| t.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        let mut trades: VecDeque<Trade> = trades.into();
        trades.truncate(CAPACITY);
        metrics::gauge!("watcher_buffered_trades").set(trades.len() as f64);
        Self {
            inner: RwLock::new(Inner { trades, last_id }),
        }
    }

    /// Assign the next id, prepend, and drop anything past [`CAPACITY`].
    pub async fn insert(&self, draft: TradeDraft) -> Trade {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let trade = draft.into_trade(inner.last_id);
        inner.trades.push_front(trade.clone());
        inner.trades.truncate(CAPACITY);
        let len = inner.trades.len();
        drop(inner);

        metrics::counter!("watcher_trades_ingested_total", "source" => trade.source.as_str())
            .increment(1);
        metrics::gauge!("watcher_buffered_trades").set(len as f64);
        trade
    }

    /// Up to `n` most recent trades, newest first.
    pub async fn recent(&self, n: usize) -> Vec<Trade> {
        self.inner.read().await.trades.iter().take(n).cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.trades.len()
    }
}
