pub mod errors;
pub mod formatting;
pub mod models;
pub mod providers;
pub mod scheduler;
pub mod services;
pub mod storage;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, warn};
use uuid::Uuid;

use errors::CoreError;
use models::{
    aggregates::{HoldingPosition, MarketAggregate, PortfolioAggregate},
    asset::AssetSnapshot,
    favorites::FavoriteSet,
    holding::PortfolioHolding,
    state::SessionState,
};
use providers::traits::MarketDataProvider;
use services::{
    market_service::{MarketService, SortKey},
    portfolio_service::PortfolioService,
};
use storage::traits::StateStore;

/// Ordering ticket for an in-flight snapshot fetch.
///
/// Tickets are issued monotonically; a response whose ticket is not newer
/// than the last applied one is discarded, so an older response can never
/// overwrite a newer snapshot when fetches overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// Main entry point for the Crypto Tracker core library.
///
/// Owns the session state (snapshot, favorites, holdings) and the
/// services that operate on it. The market-data provider and the state
/// store are injected, never reached through ambient globals. All
/// mutation happens through `&mut self`, so shared access (e.g., from
/// the refresh scheduler plus a manual-refresh caller) goes behind one
/// async mutex and needs no further locking.
#[must_use]
pub struct CryptoTracker {
    state: SessionState,
    provider: Arc<dyn MarketDataProvider>,
    store: Arc<dyn StateStore>,
    portfolio_service: PortfolioService,
    market_service: MarketService,
    /// Next fetch sequence number to hand out.
    next_fetch_seq: u64,
    /// Sequence number of the most recently applied snapshot (0 = none).
    applied_fetch_seq: u64,
    /// Whether the most recent fetch attempt failed. Cleared by the next
    /// applied snapshot; drives the user-visible "fetch failed" signal.
    last_fetch_failed: bool,
    /// Monotonic state revision, published to subscribers on every
    /// visible state change so the presentation layer knows to redraw.
    revision: u64,
    notifier: watch::Sender<u64>,
}

impl std::fmt::Debug for CryptoTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoTracker")
            .field("assets", &self.state.assets.len())
            .field("favorites", &self.state.favorites.len())
            .field("holdings", &self.state.holdings.len())
            .field("last_updated", &self.state.last_updated)
            .field("last_fetch_failed", &self.last_fetch_failed)
            .finish()
    }
}

impl CryptoTracker {
    /// Build a tracker, restoring favorites and holdings from the store.
    /// The snapshot starts empty until the first successful fetch.
    pub fn new(provider: Arc<dyn MarketDataProvider>, store: Arc<dyn StateStore>) -> Self {
        let (favorites, holdings) = store.load();
        let (notifier, _) = watch::channel(0);
        Self {
            state: SessionState::new(favorites, holdings),
            provider,
            store,
            portfolio_service: PortfolioService::new(),
            market_service: MarketService::new(),
            next_fetch_seq: 0,
            applied_fetch_seq: 0,
            last_fetch_failed: false,
            revision: 0,
            notifier,
        }
    }

    /// Subscribe to state-change notifications. The received value is a
    /// monotonic revision counter: any change (new snapshot, fetch
    /// failure, favorites or portfolio edit) bumps it, telling the
    /// presentation layer to re-read the views and redraw.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notifier.subscribe()
    }

    // ── Snapshot Refresh ────────────────────────────────────────────

    /// Fetch a fresh snapshot and apply it.
    ///
    /// On failure the previous snapshot and all derived figures remain
    /// untouched; the error is returned for user-visible indication and
    /// `last_fetch_failed()` flips until the next successful apply.
    pub async fn refresh(&mut self) -> Result<(), CoreError> {
        let ticket = self.issue_fetch_ticket();
        let provider = Arc::clone(&self.provider);
        match provider.fetch_snapshot().await {
            Ok(assets) => {
                self.apply_snapshot(ticket, assets);
                Ok(())
            }
            Err(e) => {
                self.record_fetch_failure(ticket);
                Err(e)
            }
        }
    }

    /// Reserve a sequence number for a fetch about to be issued.
    /// Callers that drive fetches themselves (the scheduler, a manual
    /// refresh racing it) take a ticket first, fetch without holding the
    /// tracker, then pass the ticket to [`apply_snapshot`](Self::apply_snapshot).
    pub fn issue_fetch_ticket(&mut self) -> FetchTicket {
        self.next_fetch_seq += 1;
        FetchTicket(self.next_fetch_seq)
    }

    /// Apply a completed fetch. Returns `false` (leaving all state
    /// unchanged) if a response with a newer ticket was already applied.
    pub fn apply_snapshot(&mut self, ticket: FetchTicket, assets: Vec<AssetSnapshot>) -> bool {
        if ticket.0 <= self.applied_fetch_seq {
            warn!(
                ticket = ticket.0,
                applied = self.applied_fetch_seq,
                "discarding stale snapshot response"
            );
            return false;
        }
        debug!(ticket = ticket.0, assets = assets.len(), "applying market snapshot");
        self.applied_fetch_seq = ticket.0;
        self.state.assets = assets;
        self.state.last_updated = Some(Utc::now());
        self.last_fetch_failed = false;
        self.bump_revision();
        true
    }

    /// Record a failed fetch. The snapshot is retained unchanged; only
    /// the failure flag moves, and only if no newer response landed in
    /// the meantime.
    pub fn record_fetch_failure(&mut self, ticket: FetchTicket) {
        if ticket.0 > self.applied_fetch_seq {
            self.last_fetch_failed = true;
            self.bump_revision();
        }
    }

    /// Whether the most recent fetch attempt failed.
    #[must_use]
    pub fn last_fetch_failed(&self) -> bool {
        self.last_fetch_failed
    }

    /// The provider handle, for callers that fetch outside the tracker
    /// lock (see [`scheduler::RefreshScheduler`]).
    #[must_use]
    pub fn provider(&self) -> Arc<dyn MarketDataProvider> {
        Arc::clone(&self.provider)
    }

    // ── Snapshot Views ──────────────────────────────────────────────

    /// The current snapshot, in upstream order (descending market cap).
    #[must_use]
    pub fn assets(&self) -> &[AssetSnapshot] {
        &self.state.assets
    }

    /// When the current snapshot was applied; `None` before the first
    /// successful fetch.
    #[must_use]
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.state.last_updated
    }

    /// Summary statistics over the current snapshot.
    #[must_use]
    pub fn market_stats(&self) -> MarketAggregate {
        self.market_service.compute_market_stats(&self.state.assets)
    }

    /// Assets matching a case-insensitive name/symbol substring query.
    #[must_use]
    pub fn search_assets(&self, query: &str) -> Vec<&AssetSnapshot> {
        self.market_service.search(&self.state.assets, query)
    }

    /// The snapshot sorted by the given key.
    #[must_use]
    pub fn sorted_assets(&self, key: SortKey) -> Vec<&AssetSnapshot> {
        self.market_service.sort(&self.state.assets, key)
    }

    // ── Favorites ───────────────────────────────────────────────────

    /// Flip an asset's favorite status and persist the full set.
    /// Returns `true` if the asset is a favorite after the call.
    pub fn toggle_favorite(&mut self, asset_id: &str) -> bool {
        let now_favorite = self.state.favorites.toggle(asset_id);
        self.persist_favorites();
        self.bump_revision();
        now_favorite
    }

    #[must_use]
    pub fn is_favorite(&self, asset_id: &str) -> bool {
        self.state.favorites.contains(asset_id)
    }

    #[must_use]
    pub fn favorites(&self) -> &FavoriteSet {
        &self.state.favorites
    }

    /// The favorited subset of the current snapshot, in snapshot order.
    #[must_use]
    pub fn favorite_assets(&self) -> Vec<&AssetSnapshot> {
        self.market_service
            .favorites_of(&self.state.assets, &self.state.favorites)
    }

    // ── Portfolio ───────────────────────────────────────────────────

    /// Add a holding and persist the full holdings list.
    ///
    /// `amount` and `buy_price` must be strictly positive. An asset id
    /// absent from the current snapshot is accepted — the position is
    /// then valued from its entry price until the asset (re)appears.
    pub fn add_holding(
        &mut self,
        asset_id: &str,
        amount: f64,
        buy_price: f64,
    ) -> Result<Uuid, CoreError> {
        let holding =
            self.portfolio_service
                .create_holding(&self.state.assets, asset_id, amount, buy_price)?;
        let id = holding.id;
        self.state.holdings.push(holding);
        self.persist_portfolio();
        self.bump_revision();
        Ok(id)
    }

    /// Remove a holding by id and persist the full holdings list.
    pub fn remove_holding(&mut self, holding_id: Uuid) -> Result<(), CoreError> {
        let idx = self
            .state
            .holdings
            .iter()
            .position(|h| h.id == holding_id)
            .ok_or_else(|| CoreError::HoldingNotFound(holding_id.to_string()))?;
        self.state.holdings.remove(idx);
        self.persist_portfolio();
        self.bump_revision();
        Ok(())
    }

    /// All holdings, in insertion order.
    #[must_use]
    pub fn holdings(&self) -> &[PortfolioHolding] {
        &self.state.holdings
    }

    #[must_use]
    pub fn holding_count(&self) -> usize {
        self.state.holdings.len()
    }

    /// Aggregate invested / current value / profit over all holdings,
    /// valued against the current snapshot.
    #[must_use]
    pub fn portfolio_aggregate(&self) -> PortfolioAggregate {
        self.portfolio_service
            .compute_aggregate(&self.state.holdings, &self.state.assets)
    }

    /// Per-holding valuation rows for display.
    #[must_use]
    pub fn positions(&self) -> Vec<HoldingPosition> {
        self.portfolio_service
            .positions(&self.state.holdings, &self.state.assets)
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Persistence is best-effort: a failed save is logged and the
    /// in-memory state stays authoritative for the session.
    fn persist_favorites(&self) {
        if let Err(e) = self.store.save_favorites(&self.state.favorites) {
            warn!(error = %e, "failed to persist favorites");
        }
    }

    fn persist_portfolio(&self) {
        if let Err(e) = self.store.save_portfolio(&self.state.holdings) {
            warn!(error = %e, "failed to persist portfolio");
        }
    }

    fn bump_revision(&mut self) {
        self.revision += 1;
        // No subscribers is fine; the send result is irrelevant.
        let _ = self.notifier.send(self.revision);
    }
}
