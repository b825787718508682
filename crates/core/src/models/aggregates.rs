use serde::{Deserialize, Serialize};

use super::holding::PortfolioHolding;

/// Aggregate figures across all portfolio holdings.
///
/// Pure function of (holdings, current snapshot) — recomputed on every
/// snapshot refresh, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioAggregate {
    /// Sum of amount × buy price across all holdings
    pub total_invested: f64,

    /// Sum of amount × current (or fallback) price across all holdings
    pub total_current_value: f64,

    /// total_current_value - total_invested
    pub total_profit: f64,

    /// 100 × total_profit / total_invested, or 0 when nothing is invested
    pub profit_percentage: f64,
}

/// A single holding valued against the current snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingPosition {
    /// The underlying holding
    pub holding: PortfolioHolding,

    /// Price used for valuation: live snapshot price, or the holding's
    /// entry price when the asset is missing from the snapshot
    pub current_price: f64,

    /// Whether `current_price` came from the live snapshot
    pub price_is_live: bool,

    /// amount × buy_price
    pub invested: f64,

    /// amount × current_price
    pub current_value: f64,

    /// current_value - invested
    pub profit: f64,

    /// 100 × profit / invested, or 0 when invested is 0
    pub profit_percentage: f64,
}

/// Summary statistics over an entire market snapshot.
///
/// Derived, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketAggregate {
    /// Sum of market caps; assets with no reported cap contribute 0
    pub total_market_cap: f64,

    /// Mean 24h change over ALL assets in the snapshot. Assets without a
    /// reported change stay in the denominator and contribute 0 to the
    /// numerator (upstream behavior, preserved as-is). 0 for an empty
    /// snapshot.
    pub average_change_24h: f64,

    /// Assets with 24h change strictly greater than zero
    pub gainer_count: usize,

    /// Assets with 24h change strictly less than zero
    pub loser_count: usize,
}
