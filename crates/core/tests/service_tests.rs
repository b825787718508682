// ═══════════════════════════════════════════════════════════════════
// Service Tests — PortfolioService (aggregation & valuation) and
// MarketService (snapshot statistics, search, sort)
// ═══════════════════════════════════════════════════════════════════

use crypto_tracker_core::errors::CoreError;
use crypto_tracker_core::models::asset::AssetSnapshot;
use crypto_tracker_core::models::favorites::FavoriteSet;
use crypto_tracker_core::models::holding::PortfolioHolding;
use crypto_tracker_core::services::market_service::{MarketService, SortKey};
use crypto_tracker_core::services::portfolio_service::PortfolioService;

fn asset(id: &str, name: &str, symbol: &str, price: f64) -> AssetSnapshot {
    AssetSnapshot {
        id: id.to_string(),
        name: name.to_string(),
        symbol: symbol.to_string(),
        current_price: price,
        market_cap: None,
        market_cap_rank: None,
        price_change_percentage_1h: None,
        price_change_percentage_24h: None,
        price_change_percentage_7d: None,
        sparkline_7d: None,
        image_url: String::new(),
    }
}

fn with_change(mut a: AssetSnapshot, change_24h: f64) -> AssetSnapshot {
    a.price_change_percentage_24h = Some(change_24h);
    a
}

fn with_cap(mut a: AssetSnapshot, cap: f64) -> AssetSnapshot {
    a.market_cap = Some(cap);
    a
}

fn holding(asset_id: &str, amount: f64, buy_price: f64, entry_price: f64) -> PortfolioHolding {
    PortfolioHolding::new(asset_id, asset_id, asset_id, amount, buy_price, entry_price)
}

// ═══════════════════════════════════════════════════════════════════
//  PortfolioService — compute_aggregate
// ═══════════════════════════════════════════════════════════════════

mod portfolio_aggregate {
    use super::*;

    #[test]
    fn empty_holdings_all_zero() {
        let service = PortfolioService::new();
        let snapshot = vec![asset("bitcoin", "Bitcoin", "btc", 50_000.0)];
        let agg = service.compute_aggregate(&[], &snapshot);

        assert_eq!(agg.total_invested, 0.0);
        assert_eq!(agg.total_current_value, 0.0);
        assert_eq!(agg.total_profit, 0.0);
        assert_eq!(agg.profit_percentage, 0.0);
    }

    #[test]
    fn single_holding_gain() {
        // amount=2, buy=100, current=150 → invested=200, value=300, profit=100, 50%
        let service = PortfolioService::new();
        let snapshot = vec![asset("coin", "Coin", "cn", 150.0)];
        let holdings = vec![holding("coin", 2.0, 100.0, 100.0)];

        let agg = service.compute_aggregate(&holdings, &snapshot);
        assert_eq!(agg.total_invested, 200.0);
        assert_eq!(agg.total_current_value, 300.0);
        assert_eq!(agg.total_profit, 100.0);
        assert!((agg.profit_percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn loss_is_negative() {
        let service = PortfolioService::new();
        let snapshot = vec![asset("coin", "Coin", "cn", 50.0)];
        let holdings = vec![holding("coin", 1.0, 100.0, 100.0)];

        let agg = service.compute_aggregate(&holdings, &snapshot);
        assert_eq!(agg.total_profit, -50.0);
        assert!((agg.profit_percentage - -50.0).abs() < 1e-9);
    }

    #[test]
    fn dangling_asset_uses_entry_price() {
        // The referenced asset is absent from the snapshot: valuation
        // falls back to the price captured at entry, indefinitely.
        let service = PortfolioService::new();
        let snapshot = vec![asset("bitcoin", "Bitcoin", "btc", 50_000.0)];
        let holdings = vec![holding("vanished", 10.0, 2.0, 3.0)];

        let agg = service.compute_aggregate(&holdings, &snapshot);
        assert_eq!(agg.total_invested, 20.0);
        assert_eq!(agg.total_current_value, 30.0);
        assert_eq!(agg.total_profit, 10.0);
    }

    #[test]
    fn sums_across_multiple_holdings() {
        let service = PortfolioService::new();
        let snapshot = vec![
            asset("bitcoin", "Bitcoin", "btc", 60_000.0),
            asset("ethereum", "Ethereum", "eth", 3_000.0),
        ];
        let holdings = vec![
            holding("bitcoin", 0.5, 40_000.0, 40_000.0), // invested 20k, value 30k
            holding("ethereum", 10.0, 2_000.0, 2_000.0), // invested 20k, value 30k
        ];

        let agg = service.compute_aggregate(&holdings, &snapshot);
        assert_eq!(agg.total_invested, 40_000.0);
        assert_eq!(agg.total_current_value, 60_000.0);
        assert_eq!(agg.total_profit, 20_000.0);
        assert!((agg.profit_percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn empty_snapshot_values_from_entry_prices() {
        let service = PortfolioService::new();
        let holdings = vec![holding("bitcoin", 2.0, 100.0, 150.0)];

        let agg = service.compute_aggregate(&holdings, &[]);
        assert_eq!(agg.total_current_value, 300.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  PortfolioService — positions
// ═══════════════════════════════════════════════════════════════════

mod positions {
    use super::*;

    #[test]
    fn live_price_marked() {
        let service = PortfolioService::new();
        let snapshot = vec![asset("coin", "Coin", "cn", 150.0)];
        let holdings = vec![holding("coin", 2.0, 100.0, 100.0)];

        let rows = service.positions(&holdings, &snapshot);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].price_is_live);
        assert_eq!(rows[0].current_price, 150.0);
        assert_eq!(rows[0].invested, 200.0);
        assert_eq!(rows[0].current_value, 300.0);
        assert_eq!(rows[0].profit, 100.0);
        assert!((rows[0].profit_percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn fallback_price_marked() {
        let service = PortfolioService::new();
        let holdings = vec![holding("vanished", 1.0, 10.0, 12.0)];

        let rows = service.positions(&holdings, &[]);
        assert!(!rows[0].price_is_live);
        assert_eq!(rows[0].current_price, 12.0);
    }

    #[test]
    fn keeps_holding_order() {
        let service = PortfolioService::new();
        let holdings = vec![
            holding("b", 1.0, 1.0, 1.0),
            holding("a", 1.0, 1.0, 1.0),
        ];

        let rows = service.positions(&holdings, &[]);
        assert_eq!(rows[0].holding.asset_id, "b");
        assert_eq!(rows[1].holding.asset_id, "a");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  PortfolioService — create_holding
// ═══════════════════════════════════════════════════════════════════

mod create_holding {
    use super::*;

    #[test]
    fn captures_snapshot_price_at_entry() {
        let service = PortfolioService::new();
        let snapshot = vec![asset("bitcoin", "Bitcoin", "btc", 62_000.0)];

        let h = service
            .create_holding(&snapshot, "bitcoin", 0.1, 55_000.0)
            .unwrap();
        assert_eq!(h.asset_id, "bitcoin");
        assert_eq!(h.asset_name, "Bitcoin");
        assert_eq!(h.asset_symbol, "btc");
        assert_eq!(h.snapshot_price_at_entry, 62_000.0);
    }

    #[test]
    fn unknown_asset_does_not_error() {
        let service = PortfolioService::new();

        let h = service.create_holding(&[], "obscure-coin", 5.0, 2.0).unwrap();
        assert_eq!(h.asset_id, "obscure-coin");
        // Buy price doubles as the entry price when there is nothing to capture.
        assert_eq!(h.snapshot_price_at_entry, 2.0);
    }

    #[test]
    fn rejects_zero_amount() {
        let service = PortfolioService::new();
        let err = service.create_holding(&[], "bitcoin", 0.0, 10.0).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[test]
    fn rejects_negative_buy_price() {
        let service = PortfolioService::new();
        let err = service.create_holding(&[], "bitcoin", 1.0, -5.0).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[test]
    fn rejects_nan_amount() {
        let service = PortfolioService::new();
        let err = service
            .create_holding(&[], "bitcoin", f64::NAN, 10.0)
            .unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  MarketService — compute_market_stats
// ═══════════════════════════════════════════════════════════════════

mod market_stats {
    use super::*;

    #[test]
    fn empty_snapshot_yields_zeroes() {
        let service = MarketService::new();
        let stats = service.compute_market_stats(&[]);

        assert_eq!(stats.total_market_cap, 0.0);
        // Documented fallback: 0 instead of NaN for the empty mean.
        assert_eq!(stats.average_change_24h, 0.0);
        assert_eq!(stats.gainer_count, 0);
        assert_eq!(stats.loser_count, 0);
    }

    #[test]
    fn sums_market_caps_treating_absent_as_zero() {
        let service = MarketService::new();
        let snapshot = vec![
            with_cap(asset("a", "A", "a", 1.0), 1_000.0),
            asset("b", "B", "b", 1.0), // no market cap reported
            with_cap(asset("c", "C", "c", 1.0), 500.0),
        ];

        let stats = service.compute_market_stats(&snapshot);
        assert_eq!(stats.total_market_cap, 1_500.0);
    }

    #[test]
    fn average_divides_by_full_asset_count() {
        // Assets without a 24h change stay in the denominator and
        // contribute 0 — upstream behavior, preserved as documented.
        let service = MarketService::new();
        let snapshot = vec![
            with_change(asset("a", "A", "a", 1.0), 10.0),
            with_change(asset("b", "B", "b", 1.0), -4.0),
            asset("c", "C", "c", 1.0), // change absent
        ];

        let stats = service.compute_market_stats(&snapshot);
        assert!((stats.average_change_24h - 2.0).abs() < 1e-9); // (10 - 4 + 0) / 3
    }

    #[test]
    fn strict_gainer_loser_counts() {
        let service = MarketService::new();
        let snapshot = vec![
            with_change(asset("up", "Up", "up", 1.0), 3.2),
            with_change(asset("down", "Down", "dn", 1.0), -1.1),
            with_change(asset("flat", "Flat", "fl", 1.0), 0.0),
            asset("unknown", "Unknown", "uk", 1.0),
        ];

        let stats = service.compute_market_stats(&snapshot);
        assert_eq!(stats.gainer_count, 1);
        assert_eq!(stats.loser_count, 1);
        // Exactly-zero and absent changes count toward neither bucket.
        assert!(stats.gainer_count + stats.loser_count <= snapshot.len());
    }

    #[test]
    fn counts_cover_snapshot_when_all_changes_nonzero() {
        let service = MarketService::new();
        let snapshot = vec![
            with_change(asset("a", "A", "a", 1.0), 1.0),
            with_change(asset("b", "B", "b", 1.0), -1.0),
        ];

        let stats = service.compute_market_stats(&snapshot);
        assert_eq!(stats.gainer_count + stats.loser_count, snapshot.len());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  MarketService — search / sort / favorites
// ═══════════════════════════════════════════════════════════════════

mod listing {
    use super::*;

    fn snapshot() -> Vec<AssetSnapshot> {
        vec![
            with_change(
                with_cap(asset("bitcoin", "Bitcoin", "btc", 60_000.0), 1.2e12),
                1.5,
            ),
            with_change(
                with_cap(asset("ethereum", "Ethereum", "eth", 3_000.0), 4.0e11),
                -2.0,
            ),
            with_cap(asset("dogecoin", "Dogecoin", "doge", 0.2), 3.0e10),
        ]
    }

    #[test]
    fn search_matches_name_case_insensitive() {
        let service = MarketService::new();
        let assets = snapshot();
        let hits = service.search(&assets, "BIT");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "bitcoin");
    }

    #[test]
    fn search_matches_symbol_substring() {
        let service = MarketService::new();
        let assets = snapshot();
        let hits = service.search(&assets, "eth");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "ethereum");
    }

    #[test]
    fn empty_query_matches_all() {
        let service = MarketService::new();
        let assets = snapshot();
        assert_eq!(service.search(&assets, "").len(), assets.len());
    }

    #[test]
    fn sort_by_price_desc() {
        let service = MarketService::new();
        let assets = snapshot();
        let sorted = service.sort(&assets, SortKey::PriceDesc);
        let ids: Vec<&str> = sorted.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["bitcoin", "ethereum", "dogecoin"]);
    }

    #[test]
    fn sort_by_change_puts_missing_last() {
        let service = MarketService::new();
        let assets = snapshot();
        let sorted = service.sort(&assets, SortKey::Change24hDesc);
        let ids: Vec<&str> = sorted.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["bitcoin", "ethereum", "dogecoin"]);
    }

    #[test]
    fn sort_by_market_cap_desc() {
        let service = MarketService::new();
        let mut assets = snapshot();
        assets.reverse(); // scramble the natural order first
        let sorted = service.sort(&assets, SortKey::MarketCapDesc);
        let ids: Vec<&str> = sorted.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["bitcoin", "ethereum", "dogecoin"]);
    }

    #[test]
    fn favorites_subset_in_snapshot_order() {
        let service = MarketService::new();
        let assets = snapshot();
        let mut favorites = FavoriteSet::new();
        favorites.insert("dogecoin");
        favorites.insert("bitcoin");

        let favs = service.favorites_of(&assets, &favorites);
        let ids: Vec<&str> = favs.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["bitcoin", "dogecoin"]);
    }
}
