use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A manually entered paper-portfolio position.
///
/// `asset_id` is a weak reference into the market snapshot: the referenced
/// asset may drop out of the top-100 listing (or never have been in it),
/// in which case valuation falls back to `snapshot_price_at_entry`.
/// Holdings are add/remove only — never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioHolding {
    /// Unique identifier, generated at creation
    pub id: Uuid,

    /// Snapshot id of the asset this position is in (e.g., "bitcoin")
    pub asset_id: String,

    /// Display name captured at creation (survives the asset dropping
    /// out of later snapshots)
    pub asset_name: String,

    /// Ticker symbol captured at creation
    pub asset_symbol: String,

    /// Units held (always positive)
    pub amount: f64,

    /// Price per unit paid at acquisition (always positive)
    pub buy_price: f64,

    /// Market price at the moment the holding was entered.
    /// Used as the valuation price whenever `asset_id` is missing
    /// from the current snapshot.
    pub snapshot_price_at_entry: f64,
}

impl PortfolioHolding {
    pub fn new(
        asset_id: impl Into<String>,
        asset_name: impl Into<String>,
        asset_symbol: impl Into<String>,
        amount: f64,
        buy_price: f64,
        snapshot_price_at_entry: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            asset_id: asset_id.into(),
            asset_name: asset_name.into(),
            asset_symbol: asset_symbol.into(),
            amount,
            buy_price,
            snapshot_price_at_entry,
        }
    }

    /// Cost basis of this position: amount × buy price.
    #[must_use]
    pub fn invested(&self) -> f64 {
        self.amount * self.buy_price
    }
}
