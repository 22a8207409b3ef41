use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Identifiers of the items the user liked, stored as strings.
///
/// Serialized as a plain JSON array, which is the format kept under the
/// `favorites` storage key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct FavoriteSet(BTreeSet<String>);

/// Which way a toggle went.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FavoriteAction {
    Add,
    Remove,
}

/// Remote mirroring status of a single favorite.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    Synced,
    Pending,
    Failed,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns a copy of the set containing `id`.
    pub fn with(&self, id: &str) -> Self {
        let mut next = self.0.clone();
        next.insert(id.to_string());
        Self(next)
    }

    /// Returns a copy of the set without `id`.
    pub fn without(&self, id: &str) -> Self {
        let mut next = self.0.clone();
        next.remove(id);
        Self(next)
    }

    /// Flips membership of `id` and reports which way it went.
    pub fn toggled(&self, id: &str) -> (Self, FavoriteAction) {
        if self.contains(id) {
            (self.without(id), FavoriteAction::Remove)
        } else {
            (self.with(id), FavoriteAction::Add)
        }
    }
}

impl<S: Into<String>> FromIterator<S> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
