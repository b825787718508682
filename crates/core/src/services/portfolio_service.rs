use crate::errors::CoreError;
use crate::models::aggregates::{HoldingPosition, PortfolioAggregate};
use crate::models::asset::AssetSnapshot;
use crate::models::holding::PortfolioHolding;

/// Values the paper portfolio against a market snapshot.
///
/// Pure business logic — no I/O, no API calls. All calculations are
/// total: empty inputs and dangling asset references produce defined
/// results, never errors.
///
/// **Note on precision**: monetary values are `f64` throughout, matching
/// the upstream feed. Sums over a portfolio of this size stay well within
/// f64's ~15 significant digits.
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    /// Construct a validated holding.
    ///
    /// `amount` and `buy_price` must be strictly positive. The entry
    /// price is captured from the current snapshot; if the asset id is
    /// not present in it, `buy_price` doubles as the entry price so the
    /// position can still be valued later.
    pub fn create_holding(
        &self,
        assets: &[AssetSnapshot],
        asset_id: &str,
        amount: f64,
        buy_price: f64,
    ) -> Result<PortfolioHolding, CoreError> {
        if !(amount > 0.0) || !amount.is_finite() {
            return Err(CoreError::ValidationError(format!(
                "Holding amount must be positive, got {amount}"
            )));
        }
        if !(buy_price > 0.0) || !buy_price.is_finite() {
            return Err(CoreError::ValidationError(format!(
                "Holding buy price must be positive, got {buy_price}"
            )));
        }

        let asset = assets.iter().find(|a| a.id == asset_id);
        let (name, symbol, entry_price) = match asset {
            Some(a) => (a.name.clone(), a.symbol.clone(), a.current_price),
            // Asset not in the current snapshot: keep the id as the
            // display name and fall back to the buy price for valuation.
            None => (asset_id.to_string(), asset_id.to_string(), buy_price),
        };

        Ok(PortfolioHolding::new(
            asset_id,
            name,
            symbol,
            amount,
            buy_price,
            entry_price,
        ))
    }

    /// Aggregate invested / current / profit figures across all holdings.
    ///
    /// Per holding: the current price is resolved by looking up
    /// `asset_id` in the snapshot, falling back to the price captured at
    /// entry when the asset is absent. An empty holdings list yields an
    /// all-zero aggregate.
    #[must_use]
    pub fn compute_aggregate(
        &self,
        holdings: &[PortfolioHolding],
        assets: &[AssetSnapshot],
    ) -> PortfolioAggregate {
        let mut total_invested = 0.0;
        let mut total_current_value = 0.0;

        for holding in holdings {
            let current_price = Self::resolve_price(holding, assets).0;
            total_invested += holding.amount * holding.buy_price;
            total_current_value += holding.amount * current_price;
        }

        let total_profit = total_current_value - total_invested;
        let profit_percentage = if total_invested > 0.0 {
            (total_profit / total_invested) * 100.0
        } else {
            0.0
        };

        PortfolioAggregate {
            total_invested,
            total_current_value,
            total_profit,
            profit_percentage,
        }
    }

    /// Per-holding valuation rows for display, in holding order.
    #[must_use]
    pub fn positions(
        &self,
        holdings: &[PortfolioHolding],
        assets: &[AssetSnapshot],
    ) -> Vec<HoldingPosition> {
        holdings
            .iter()
            .map(|holding| {
                let (current_price, price_is_live) = Self::resolve_price(holding, assets);
                let invested = holding.amount * holding.buy_price;
                let current_value = holding.amount * current_price;
                let profit = current_value - invested;
                let profit_percentage = if invested > 0.0 {
                    (profit / invested) * 100.0
                } else {
                    0.0
                };

                HoldingPosition {
                    holding: holding.clone(),
                    current_price,
                    price_is_live,
                    invested,
                    current_value,
                    profit,
                    profit_percentage,
                }
            })
            .collect()
    }

    /// Resolve the valuation price for a holding. Returns the price and
    /// whether it came from the live snapshot.
    fn resolve_price(holding: &PortfolioHolding, assets: &[AssetSnapshot]) -> (f64, bool) {
        match assets.iter().find(|a| a.id == holding.asset_id) {
            Some(asset) => (asset.current_price, true),
            None => (holding.snapshot_price_at_entry, false),
        }
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}
