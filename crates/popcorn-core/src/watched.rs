use popcorn_models::{UserRating, WatchedEntry, WatchedSummary};
use std::sync::Arc;
use tracing::info;

use crate::persist::PersistentList;
use crate::store::KeyValueStore;

pub const DEFAULT_WATCHED_KEY: &str = "watched";

/// Insert `entry`, replacing an existing entry with the same id in place.
pub fn upsert(entries: &[WatchedEntry], entry: WatchedEntry) -> Vec<WatchedEntry> {
    let mut next = entries.to_vec();
    match next.iter_mut().find(|existing| existing.imdb_id == entry.imdb_id) {
        Some(existing) => *existing = entry,
        None => next.push(entry),
    }
    next
}

/// Drop the entry with `imdb_id`; unknown ids leave the list unchanged.
pub fn remove(entries: &[WatchedEntry], imdb_id: &str) -> Vec<WatchedEntry> {
    entries
        .iter()
        .filter(|entry| entry.imdb_id != imdb_id)
        .cloned()
        .collect()
}

/// The user's watched movies, persisted under one store key.
pub struct WatchedList {
    list: PersistentList<WatchedEntry>,
}

impl WatchedList {
    pub fn load(store: Arc<dyn KeyValueStore>, key: &str) -> Self {
        Self {
            list: PersistentList::load(store, key, Vec::new()),
        }
    }

    pub fn entries(&self) -> &[WatchedEntry] {
        self.list.items()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn get(&self, imdb_id: &str) -> Option<&WatchedEntry> {
        self.entries().iter().find(|entry| entry.imdb_id == imdb_id)
    }

    pub fn is_watched(&self, imdb_id: &str) -> bool {
        self.get(imdb_id).is_some()
    }

    pub fn user_rating_for(&self, imdb_id: &str) -> Option<UserRating> {
        self.get(imdb_id).map(|entry| entry.user_rating)
    }

    pub fn add(&mut self, entry: WatchedEntry) {
        info!("Adding {} ({}) rated {}", entry.title, entry.imdb_id, entry.user_rating);
        self.list.mutate(|current| upsert(current, entry));
    }

    /// Returns whether an entry was removed.
    pub fn remove(&mut self, imdb_id: &str) -> bool {
        let before = self.len();
        self.list.mutate(|current| remove(current, imdb_id));
        before != self.len()
    }

    pub fn clear(&mut self) {
        self.list.mutate(|_| Vec::new());
    }

    pub fn summary(&self) -> WatchedSummary {
        WatchedSummary::from_entries(self.entries())
    }
}
