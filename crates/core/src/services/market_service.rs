use crate::models::aggregates::MarketAggregate;
use crate::models::asset::AssetSnapshot;
use crate::models::favorites::FavoriteSet;

/// Sort order for the asset listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Largest market cap first (the snapshot's natural order)
    MarketCapDesc,
    /// Highest price first
    PriceDesc,
    /// Best 24h performance first
    Change24hDesc,
}

/// Derives summary statistics and listing views from a market snapshot.
///
/// Pure business logic — no I/O. Every function is a deterministic
/// function of its inputs.
pub struct MarketService;

impl MarketService {
    pub fn new() -> Self {
        Self
    }

    /// Compute summary statistics over a snapshot.
    ///
    /// - `total_market_cap`: sum of caps, missing caps count as 0.
    /// - `average_change_24h`: mean over the FULL asset count. Assets
    ///   with no reported 24h change stay in the denominator and add 0
    ///   to the numerator — this mirrors the upstream dashboard's
    ///   arithmetic and is intentionally left uncorrected. An empty
    ///   snapshot yields 0 rather than NaN.
    /// - gainers/losers: strict comparison against zero; a zero or
    ///   absent change counts toward neither.
    #[must_use]
    pub fn compute_market_stats(&self, assets: &[AssetSnapshot]) -> MarketAggregate {
        let total_market_cap: f64 = assets.iter().map(|a| a.market_cap.unwrap_or(0.0)).sum();

        let change_sum: f64 = assets
            .iter()
            .map(|a| a.price_change_percentage_24h.unwrap_or(0.0))
            .sum();
        let average_change_24h = if assets.is_empty() {
            0.0
        } else {
            change_sum / assets.len() as f64
        };

        let gainer_count = assets
            .iter()
            .filter(|a| a.price_change_percentage_24h.is_some_and(|c| c > 0.0))
            .count();
        let loser_count = assets
            .iter()
            .filter(|a| a.price_change_percentage_24h.is_some_and(|c| c < 0.0))
            .count();

        MarketAggregate {
            total_market_cap,
            average_change_24h,
            gainer_count,
            loser_count,
        }
    }

    /// Filter assets by a case-insensitive substring match on name or
    /// symbol. An empty query matches everything.
    #[must_use]
    pub fn search<'a>(&self, assets: &'a [AssetSnapshot], query: &str) -> Vec<&'a AssetSnapshot> {
        assets.iter().filter(|a| a.matches_query(query)).collect()
    }

    /// Sorted view of the snapshot. Assets missing the sort key go last;
    /// ties keep snapshot order (stable sort).
    #[must_use]
    pub fn sort<'a>(&self, assets: &'a [AssetSnapshot], key: SortKey) -> Vec<&'a AssetSnapshot> {
        let mut sorted: Vec<&AssetSnapshot> = assets.iter().collect();
        match key {
            SortKey::MarketCapDesc => {
                sorted.sort_by(|a, b| {
                    cmp_desc(a.market_cap.unwrap_or(f64::NEG_INFINITY), b.market_cap.unwrap_or(f64::NEG_INFINITY))
                });
            }
            SortKey::PriceDesc => {
                sorted.sort_by(|a, b| cmp_desc(a.current_price, b.current_price));
            }
            SortKey::Change24hDesc => {
                sorted.sort_by(|a, b| {
                    cmp_desc(
                        a.price_change_percentage_24h.unwrap_or(f64::NEG_INFINITY),
                        b.price_change_percentage_24h.unwrap_or(f64::NEG_INFINITY),
                    )
                });
            }
        }
        sorted
    }

    /// The favorited subset of a snapshot, in snapshot order.
    #[must_use]
    pub fn favorites_of<'a>(
        &self,
        assets: &'a [AssetSnapshot],
        favorites: &FavoriteSet,
    ) -> Vec<&'a AssetSnapshot> {
        assets.iter().filter(|a| favorites.contains(&a.id)).collect()
    }
}

impl Default for MarketService {
    fn default() -> Self {
        Self::new()
    }
}

/// Descending partial-ord comparison that treats incomparable values as equal.
fn cmp_desc(a: f64, b: f64) -> std::cmp::Ordering {
    b.partial_cmp(&a).unwrap_or(std::cmp::Ordering::Equal)
}
