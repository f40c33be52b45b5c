use common::types::Wallet;

pub const UNKNOWN_SYMBOL: &str = "UNKNOWN";
pub const DEFAULT_NARRATIVE: &str = "General";
pub const DEFAULT_PRICE_USD: f64 = 1.0;

/// A token the watcher knows how to label and price.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenInfo {
    pub symbol: &'static str,
    pub address: &'static str,
    pub narrative: &'static str,
    /// Mock unit price in USD.
    pub price_usd: f64,
}

const TOKENS: [TokenInfo; 5] = [
    TokenInfo {
        symbol: "EIGEN",
        address: "0xec53bf9167f50cdeb3ae105f56099aaab9061f83",
        narrative: "Restaking",
        price_usd: 3.20,
    },
    TokenInfo {
        symbol: "OLAS",
        address: "0x0001a500a6b18995b03f44bb040a5ffc28e45cb0",
        narrative: "AI Agents",
        price_usd: 1.85,
    },
    TokenInfo {
        symbol: "RUNE",
        address: "0x3155ba85d5f96b2d030a4966af206230e46849cb",
        narrative: "Bitcoin L2",
        price_usd: 4.50,
    },
    TokenInfo {
        symbol: "LDO",
        address: "0x5a98fcbea516cf06857215779fd812ca3bef1b32",
        narrative: "Restaking",
        price_usd: 2.10,
    },
    TokenInfo {
        symbol: "FET",
        address: "0xaea46a60368a7bd060eec7df8cba43b7ef41ad85",
        narrative: "AI Agents",
        price_usd: 0.95,
    },
];

fn wallet(address: &str, name: &str, style: &str, win_rate: f64, avg_return: f64) -> Wallet {
    Wallet {
        address: address.to_string(),
        name: name.to_string(),
        style: style.to_string(),
        win_rate,
        avg_return,
    }
}

/// Read-only wallet and token tables. Built once at startup and shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Registry {
    wallets: Vec<Wallet>,
    tokens: Vec<TokenInfo>,
}

impl Registry {
    pub fn builtin() -> Self {
        Self {
            wallets: vec![
                wallet(
                    "0x7f3a152F09324f2aee916CE069D3908603449173",
                    "Whale_0x7f3a",
                    "Early Entry",
                    68.5,
                    245.0,
                ),
                wallet(
                    "0x28C6c06298d514Db089934071355E5743bf21d60",
                    "Binance14",
                    "Swing Trader",
                    72.3,
                    180.5,
                ),
                wallet(
                    "0x220866B1A2219f40e72f5c628B65D54268cA3A9D",
                    "Whale_0x2208",
                    "LP Provider",
                    61.2,
                    95.3,
                ),
            ],
            tokens: TOKENS.to_vec(),
        }
    }

    pub fn wallets(&self) -> &[Wallet] {
        &self.wallets
    }

    pub fn tokens(&self) -> &[TokenInfo] {
        &self.tokens
    }

    /// Exact, case-sensitive address match.
    pub fn wallet(&self, address: &str) -> Option<&Wallet> {
        self.wallets.iter().find(|w| w.address == address)
    }

    pub fn wallet_name(&self, address: &str) -> Option<&str> {
        self.wallet(address).map(|w| w.name.as_str())
    }

    /// The wallet manual injections are attributed to when they name no tracked address.
    pub fn default_wallet(&self) -> Option<&Wallet> {
        self.wallets.first()
    }

    pub fn token_symbol(&self, contract_address: &str) -> &'static str {
        self.tokens
            .iter()
            .find(|t| t.address == contract_address)
            .map_or(UNKNOWN_SYMBOL, |t| t.symbol)
    }

    pub fn narrative(&self, symbol: &str) -> &'static str {
        self.token_by_symbol(symbol)
            .map_or(DEFAULT_NARRATIVE, |t| t.narrative)
    }

    pub fn price(&self, symbol: &str) -> f64 {
        self.token_by_symbol(symbol)
            .map_or(DEFAULT_PRICE_USD, |t| t.price_usd)
    }

    fn token_by_symbol(&self, symbol: &str) -> Option<&TokenInfo> {
        self.tokens.iter().find(|t| t.symbol == symbol)
    }
}
