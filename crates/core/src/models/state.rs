use chrono::{DateTime, Utc};

use super::asset::AssetSnapshot;
use super::favorites::FavoriteSet;
use super::holding::PortfolioHolding;

/// In-memory session state owned by the tracker facade.
///
/// `assets` holds the most recently *completed* fetch and is replaced
/// wholesale; `favorites` and `holdings` survive across sessions through
/// the [`StateStore`](crate::storage::traits::StateStore). Derived
/// aggregates are never stored here — they are recomputed on demand.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Latest market snapshot, ordered by descending market cap
    pub assets: Vec<AssetSnapshot>,

    /// Favorited asset ids
    pub favorites: FavoriteSet,

    /// Paper-portfolio holdings, in insertion order
    pub holdings: Vec<PortfolioHolding>,

    /// When the current snapshot was applied; `None` until the first
    /// successful fetch
    pub last_updated: Option<DateTime<Utc>>,
}

impl SessionState {
    pub fn new(favorites: FavoriteSet, holdings: Vec<PortfolioHolding>) -> Self {
        Self {
            assets: Vec::new(),
            favorites,
            holdings,
            last_updated: None,
        }
    }

    /// Look up an asset in the current snapshot by its id.
    #[must_use]
    pub fn find_asset(&self, asset_id: &str) -> Option<&AssetSnapshot> {
        self.assets.iter().find(|a| a.id == asset_id)
    }
}
