use std::collections::HashMap;
use std::sync::Mutex;

use tracing::warn;

use super::traits::{StateStore, FAVORITES_KEY, PORTFOLIO_KEY};
use crate::errors::CoreError;
use crate::models::favorites::FavoriteSet;
use crate::models::holding::PortfolioHolding;

/// In-memory [`StateStore`]: a keyed map of serialized JSON strings,
/// the closest native analog of browser key-value storage.
///
/// Used for tests and ephemeral sessions. Values go through the same
/// serialization path as the file store, so round-trip behavior is
/// identical.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a raw value under a key (e.g., to simulate corruption).
    pub fn set_raw(&self, key: &str, value: impl Into<String>) {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.into());
    }

    /// The raw serialized value under a key, if any.
    #[must_use]
    pub fn get_raw(&self, key: &str) -> Option<String> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.get(key).cloned()
    }

    fn read_value<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let text = self.get_raw(key)?;
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "persisted state is corrupt, starting empty");
                None
            }
        }
    }

    fn write_value<T: serde::Serialize>(&self, key: &str, value: &T) -> Result<(), CoreError> {
        let text = serde_json::to_string(value)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize {key}: {e}")))?;
        self.set_raw(key, text);
        Ok(())
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> (FavoriteSet, Vec<PortfolioHolding>) {
        let favorites = self.read_value(FAVORITES_KEY).unwrap_or_default();
        let holdings = self.read_value(PORTFOLIO_KEY).unwrap_or_default();
        (favorites, holdings)
    }

    fn save_favorites(&self, favorites: &FavoriteSet) -> Result<(), CoreError> {
        self.write_value(FAVORITES_KEY, favorites)
    }

    fn save_portfolio(&self, holdings: &[PortfolioHolding]) -> Result<(), CoreError> {
        self.write_value(PORTFOLIO_KEY, &holdings)
    }
}
