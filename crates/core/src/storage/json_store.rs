use std::path::{Path, PathBuf};

use tracing::warn;

use super::traits::{StateStore, FAVORITES_KEY, PORTFOLIO_KEY};
use crate::errors::CoreError;
use crate::models::favorites::FavoriteSet;
use crate::models::holding::PortfolioHolding;

/// File-backed [`StateStore`]: one JSON document per key inside a
/// directory (`favorites.json`, `portfolio.json`).
///
/// Corruption handling is deliberately forgiving — a file that fails to
/// parse is logged and treated as empty, so a damaged store never
/// prevents startup.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `dir`. The directory is created on the
    /// first save, not here.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Read and deserialize one keyed value; `None` on absence or any
    /// read/parse failure.
    fn read_value<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path_for(key);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(key, error = %e, "failed to read persisted state, starting empty");
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "persisted state is corrupt, starting empty");
                None
            }
        }
    }

    fn write_value<T: serde::Serialize>(&self, key: &str, value: &T) -> Result<(), CoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let text = serde_json::to_string(value)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize {key}: {e}")))?;
        write_atomic(&self.path_for(key), text.as_bytes())
    }
}

impl StateStore for JsonFileStore {
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

/// Write via a temp file + rename so a crash mid-write can't leave a
/// half-written document behind.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), CoreError> {
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
