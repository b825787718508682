use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::asset::AssetSnapshot;

/// Trait abstraction for market-data providers.
///
/// The tracker facade and the refresh scheduler only talk to this trait,
/// so the upstream API can be swapped (or mocked in tests) without
/// touching the rest of the codebase.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch a full market snapshot: top assets ordered by descending
    /// market cap, with 1h/24h/7d change windows and a 7-day sparkline
    /// per asset.
    ///
    /// Failures never mutate any state — the caller keeps displaying
    /// the previous snapshot and reports the error.
    async fn fetch_snapshot(&self) -> Result<Vec<AssetSnapshot>, CoreError>;
}
