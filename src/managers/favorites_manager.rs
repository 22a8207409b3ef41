//! Favorites Manager for Travelgo.
//!
//! Loads and persists the `FavoriteSet` under the `favorites` key. The local
//! set is what the cards reflect; the backend copy is mirrored separately by
//! `services::favorite_sync` and the two are never reconciled.

use tracing::warn;

use crate::managers::storage_manager::{keys, KeyValueStore, StorageArea};
use crate::types::errors::StorageError;
use crate::types::favorite::{FavoriteAction, FavoriteSet};

/// Trait defining favorite persistence operations.
pub trait FavoritesManagerTrait {
    fn load(&self) -> Result<FavoriteSet, StorageError>;
    fn persist(&self, favorites: &FavoriteSet) -> Result<(), StorageError>;
    /// Flips `id`, persists the result and returns it with the action taken.
    fn toggle(&self, id: &str) -> Result<(FavoriteSet, FavoriteAction), StorageError>;
}

/// Favorites persistence over any `KeyValueStore`.
pub struct FavoritesManager<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> FavoritesManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: KeyValueStore> FavoritesManagerTrait for FavoritesManager<S> {
    /// A missing key is an empty set. A malformed value is logged and also
    /// treated as empty, so one bad write cannot break every listing page.
    fn load(&self) -> Result<FavoriteSet, StorageError> {
        let raw = match self.store.get(StorageArea::Local, keys::FAVORITES)? {
            Some(raw) => raw,
            None => return Ok(FavoriteSet::new()),
        };

        match serde_json::from_str::<FavoriteSet>(&raw) {
            Ok(set) => Ok(set),
            Err(e) => {
                warn!(error = %e, "ignoring malformed favorites value");
                Ok(FavoriteSet::new())
            }
        }
    }

    fn persist(&self, favorites: &FavoriteSet) -> Result<(), StorageError> {
        let json = serde_json::to_string(favorites)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        self.store.set(StorageArea::Local, keys::FAVORITES, &json)
    }

    fn toggle(&self, id: &str) -> Result<(FavoriteSet, FavoriteAction), StorageError> {
        let (next, action) = self.load()?.toggled(id);
        self.persist(&next)?;
        Ok((next, action))
    }
}
