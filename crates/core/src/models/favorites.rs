use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Deduplicated set of favorited asset ids.
///
/// Order is irrelevant for equality; persisted as a flat JSON array.
/// A `BTreeSet` keeps the serialized form deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteSet {
    ids: BTreeSet<String>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of an asset id. Returns `true` if the id is a
    /// favorite after the call.
    pub fn toggle(&mut self, asset_id: &str) -> bool {
        if self.ids.remove(asset_id) {
            false
        } else {
            self.ids.insert(asset_id.to_string());
            true
        }
    }

    #[must_use]
    pub fn contains(&self, asset_id: &str) -> bool {
        self.ids.contains(asset_id)
    }

    pub fn insert(&mut self, asset_id: impl Into<String>) -> bool {
        self.ids.insert(asset_id.into())
    }

    pub fn remove(&mut self, asset_id: &str) -> bool {
        self.ids.remove(asset_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl FromIterator<String> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
