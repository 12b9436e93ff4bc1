use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::store::KeyValueStore;

/// An in-memory list mirrored to a [`KeyValueStore`] under one key.
///
/// The list is read once by [`PersistentList::load`] and every
/// [`PersistentList::mutate`] rewrites the whole serialized value before
/// returning. Reads never fail (a missing or unreadable record yields the
/// default) and write failures are logged rather than returned.
pub struct PersistentList<T> {
    store: Arc<dyn KeyValueStore>,
    key: String,
    items: Vec<T>,
}

impl<T> PersistentList<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn load(store: Arc<dyn KeyValueStore>, key: impl Into<String>, default: Vec<T>) -> Self {
        let key = key.into();
        let items = match store.get(&key) {
            Ok(Some(content)) => match serde_json::from_str::<Vec<T>>(&content) {
                Ok(items) => {
                    info!("Loaded '{}' ({} items)", key, items.len());
                    items
                }
                Err(e) => {
                    warn!("Stored value for '{}' is corrupted: {}. Using default.", key, e);
                    default
                }
            },
            Ok(None) => {
                debug!("Nothing stored under '{}', using default", key);
                default
            }
            Err(e) => {
                warn!("Failed to read '{}': {}. Using default.", key, e);
                default
            }
        };

        Self { store, key, items }
    }

    /// Replace the list with `transform(current)` and persist the result.
    pub fn mutate<F>(&mut self, transform: F) -> &[T]
    where
        F: FnOnce(&[T]) -> Vec<T>,
    {
        self.items = transform(&self.items);
        self.persist();
        &self.items
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.items) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize '{}': {}", self.key, e);
                return;
            }
        };

        match self.store.set(&self.key, &json) {
            Ok(()) => debug!("Saved '{}' ({} items)", self.key, self.items.len()),
            Err(e) => warn!("Failed to write '{}': {}", self.key, e),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
