use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::traits::MarketDataProvider;
use crate::errors::CoreError;
use crate::models::asset::AssetSnapshot;

const BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// How many assets one snapshot fetch returns.
const PAGE_SIZE: u32 = 100;

/// CoinGecko market-data provider.
///
/// - **Free**: no API key required on the public endpoint.
/// - **Endpoint**: `/coins/markets` — one GET per snapshot, USD-quoted,
///   ordered by descending market cap, sparkline included, with
///   1h/24h/7d percentage-change windows.
///
/// Optional fields (market cap, change percentages, sparkline) are
/// routinely null upstream for thinly traded assets; every one of them
/// is tolerated per entry.
pub struct CoinGeckoProvider {
    client: Client,
}

impl CoinGeckoProvider {
    pub fn new() -> Self {
        let builder = Client::builder().timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
        }
    }

    /// Parse a raw `/coins/markets` response body into domain snapshots.
    ///
    /// Split out from the network call so payload handling is testable
    /// offline. A body that is not a JSON array of market entries is a
    /// [`CoreError::MalformedData`].
    pub fn parse_markets_payload(body: &str) -> Result<Vec<AssetSnapshot>, CoreError> {
        let entries: Vec<MarketEntry> = serde_json::from_str(body).map_err(|e| {
            CoreError::MalformedData(format!("unexpected /coins/markets payload shape: {e}"))
        })?;
        Ok(entries.into_iter().map(MarketEntry::into_snapshot).collect())
    }
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── CoinGecko API response types ────────────────────────────────────

#[derive(Deserialize)]
struct MarketEntry {
    id: String,
    name: String,
    symbol: String,
    /// Null upstream for delisted/dead coins
    current_price: Option<f64>,
    market_cap: Option<f64>,
    market_cap_rank: Option<u32>,
    #[serde(rename = "price_change_percentage_1h_in_currency")]
    price_change_percentage_1h: Option<f64>,
    price_change_percentage_24h: Option<f64>,
    #[serde(rename = "price_change_percentage_7d_in_currency")]
    price_change_percentage_7d: Option<f64>,
    sparkline_in_7d: Option<Sparkline>,
    image: Option<String>,
}

#[derive(Deserialize)]
struct Sparkline {
    price: Vec<f64>,
}

impl MarketEntry {
    fn into_snapshot(self) -> AssetSnapshot {
        AssetSnapshot {
            id: self.id,
            name: self.name,
            symbol: self.symbol,
            current_price: self.current_price.unwrap_or(0.0),
            market_cap: self.market_cap,
            market_cap_rank: self.market_cap_rank,
            price_change_percentage_1h: self.price_change_percentage_1h,
            price_change_percentage_24h: self.price_change_percentage_24h,
            price_change_percentage_7d: self.price_change_percentage_7d,
            sparkline_7d: self.sparkline_in_7d.map(|s| s.price),
            image_url: self.image.unwrap_or_default(),
        }
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    fn name(&self) -> &str {
        "CoinGecko"
    }

    async fn fetch_snapshot(&self) -> Result<Vec<AssetSnapshot>, CoreError> {
        let url = format!(
            "{BASE_URL}/coins/markets?vs_currency=usd&order=market_cap_desc\
             &per_page={PAGE_SIZE}&page=1&sparkline=true\
             &price_change_percentage=1h,24h,7d"
        );

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::Network(format!(
                "CoinGecko returned HTTP {status} for /coins/markets"
            )));
        }

        let body = response.text().await?;
        Self::parse_markets_payload(&body)
    }
}
