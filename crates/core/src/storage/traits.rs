use crate::errors::CoreError;
use crate::models::favorites::FavoriteSet;
use crate::models::holding::PortfolioHolding;

/// Storage key under which the favorite set is persisted.
pub const FAVORITES_KEY: &str = "favorites";

/// Storage key under which the holdings list is persisted.
pub const PORTFOLIO_KEY: &str = "portfolio";

/// Keyed, textual, best-effort persistence for user-controlled state.
///
/// Two independent values are stored: the favorite set and the holdings
/// list, each serialized as a flat JSON collection. Loading is
/// infallible by design — a missing or corrupt value degrades to an
/// empty collection rather than an error. Every mutation saves the full
/// collection; there is no diffing or batching.
///
/// The store is injected into the tracker facade rather than reached
/// through any ambient global.
pub trait StateStore: Send + Sync {
    /// Restore persisted state. Missing or unreadable values come back
    /// as empty collections.
    fn load(&self) -> (FavoriteSet, Vec<PortfolioHolding>);

    /// Persist the full favorite set.
    fn save_favorites(&self, favorites: &FavoriteSet) -> Result<(), CoreError>;

    /// Persist the full holdings list.
    fn save_portfolio(&self, holdings: &[PortfolioHolding]) -> Result<(), CoreError>;
}
