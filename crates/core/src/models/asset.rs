use serde::{Deserialize, Serialize};

/// One asset row from a market snapshot, immutable per fetch.
///
/// The provider replaces the entire snapshot vector atomically on each
/// successful fetch — individual entries are never patched in place.
/// All optional fields may legitimately be absent upstream (dead coins,
/// assets without enough history for a 7d window, etc.).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSnapshot {
    /// Provider-assigned unique id (e.g., "bitcoin"). The stable key
    /// that favorites and holdings reference.
    pub id: String,

    /// Human-readable name (e.g., "Bitcoin")
    pub name: String,

    /// Ticker symbol as the provider reports it (e.g., "btc")
    pub symbol: String,

    /// Latest price in the snapshot currency (USD)
    pub current_price: f64,

    /// Market capitalization; absent for assets without circulating-supply data
    pub market_cap: Option<f64>,

    /// Rank by market capitalization (1 = largest)
    pub market_cap_rank: Option<u32>,

    /// 1-hour price change, percent
    pub price_change_percentage_1h: Option<f64>,

    /// 24-hour price change, percent
    pub price_change_percentage_24h: Option<f64>,

    /// 7-day price change, percent
    pub price_change_percentage_7d: Option<f64>,

    /// 7-day price series for sparkline display, oldest first
    pub sparkline_7d: Option<Vec<f64>>,

    /// URL of the asset's logo image
    pub image_url: String,
}

impl AssetSnapshot {
    /// Case-insensitive substring match against name or symbol.
    /// Backs the dashboard search box.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.name.to_lowercase().contains(&q) || self.symbol.to_lowercase().contains(&q)
    }
}
