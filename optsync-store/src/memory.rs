//! In-process configuration store.
//!
//! Holds user values and schema defaults in ordered maps and notifies
//! watchers synchronously, after the internal lock is released, so a watcher
//! may read the store from inside its callback.

use crate::{
    key_is_under, ConfigStore, StoreEntry, StoreError, StoreNotification, StoreResult, StoreValue,
    WatchCallback, WatchId,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace};

type SharedCallback = Arc<dyn Fn(StoreNotification) + Send + Sync>;

struct Watcher {
    id: WatchId,
    prefix: String,
    callback: SharedCallback,
}

#[derive(Default)]
struct Inner {
    values: BTreeMap<String, StoreValue>,
    defaults: BTreeMap<String, StoreValue>,
    read_only: BTreeSet<String>,
    watchers: Vec<Watcher>,
    next_watch: u64,
    writes: Vec<(String, StoreValue)>,
    unavailable: bool,
}

impl Inner {
    fn entry(&self, key: &str) -> StoreEntry {
        let (value, is_default) = match self.values.get(key) {
            Some(v) => (Some(v.clone()), false),
            None => (self.defaults.get(key).cloned(), self.defaults.contains_key(key)),
        };
        StoreEntry {
            value,
            is_default,
            is_writable: !self.read_only.contains(key),
        }
    }

    fn watchers_for(&self, key: &str) -> Vec<SharedCallback> {
        self.watchers
            .iter()
            .filter(|w| key_is_under(key, &w.prefix))
            .map(|w| Arc::clone(&w.callback))
            .collect()
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable {
            return Err(StoreError::Unavailable("store marked offline".to_string()));
        }
        Ok(())
    }
}

/// Serialized form of a [`MemoryStore`].
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    values: BTreeMap<String, StoreValue>,
    #[serde(default)]
    defaults: BTreeMap<String, StoreValue>,
    #[serde(default)]
    read_only: BTreeSet<String>,
}

/// Thread-safe in-memory [`ConfigStore`].
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Installs a schema default for a key.
    pub fn set_default(&self, key: &str, value: StoreValue) -> StoreResult<()> {
        validate_key(key)?;
        self.lock().defaults.insert(key.to_string(), value);
        Ok(())
    }

    /// Locks or unlocks a key against writes.
    pub fn set_writable(&self, key: &str, writable: bool) {
        let mut inner = self.lock();
        if writable {
            inner.read_only.remove(key);
        } else {
            inner.read_only.insert(key.to_string());
        }
    }

    /// Simulates losing (or regaining) the connection to the store.
    pub fn set_available(&self, available: bool) {
        self.lock().unavailable = !available;
    }

    /// Removes the user value of a key, falling back to its default.
    pub fn unset(&self, key: &str) -> StoreResult<()> {
        let (notification, callbacks) = {
            let mut inner = self.lock();
            inner.check_available()?;
            if inner.values.remove(key).is_none() {
                return Ok(());
            }
            let entry = inner.entry(key);
            (
                StoreNotification {
                    key: key.to_string(),
                    entry,
                },
                inner.watchers_for(key),
            )
        };
        notify(callbacks, notification);
        Ok(())
    }

    /// Every successful `set` so far, in order.
    pub fn writes(&self) -> Vec<(String, StoreValue)> {
        self.lock().writes.clone()
    }

    pub fn write_count(&self) -> usize {
        self.lock().writes.len()
    }

    /// Forgets the write journal.
    pub fn clear_writes(&self) {
        self.lock().writes.clear();
    }

    pub fn watcher_count(&self) -> usize {
        self.lock().watchers.len()
    }

    /// Keys holding a user value.
    pub fn keys(&self) -> Vec<String> {
        self.lock().values.keys().cloned().collect()
    }

    /// Writes values, defaults and read-only keys to a JSON file.
    pub fn save_snapshot(&self, path: &Path) -> StoreResult<()> {
        let snapshot = {
            let inner = self.lock();
            Snapshot {
                values: inner.values.clone(),
                defaults: inner.defaults.clone(),
                read_only: inner.read_only.clone(),
            }
        };
        let json = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(path, json)?;
        debug!(path = %path.display(), keys = snapshot.values.len(), "Saved store snapshot");
        Ok(())
    }

    /// Creates a store from a JSON snapshot. No watchers are carried over.
    pub fn load_snapshot(path: &Path) -> StoreResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&contents)?;
        debug!(path = %path.display(), keys = snapshot.values.len(), "Loaded store snapshot");
        Ok(Self {
            inner: Mutex::new(Inner {
                values: snapshot.values,
                defaults: snapshot.defaults,
                read_only: snapshot.read_only,
                ..Inner::default()
            }),
        })
    }
}

fn notify(callbacks: Vec<SharedCallback>, notification: StoreNotification) {
    trace!(key = %notification.key, watchers = callbacks.len(), "Notifying watchers");
    for callback in callbacks {
        callback(notification.clone());
    }
}

fn validate_key(key: &str) -> StoreResult<()> {
    let well_formed = key.starts_with('/')
        && key.len() > 1
        && !key.ends_with('/')
        && !key.contains("//");
    if well_formed {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

impl ConfigStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<StoreValue>> {
        let inner = self.lock();
        inner.check_available()?;
        Ok(inner.entry(key).value)
    }

    fn get_entry(&self, key: &str) -> StoreResult<StoreEntry> {
        let inner = self.lock();
        inner.check_available()?;
        Ok(inner.entry(key))
    }

    fn set(&self, key: &str, value: StoreValue) -> StoreResult<()> {
        validate_key(key)?;
        let (notification, callbacks) = {
            let mut inner = self.lock();
            inner.check_available()?;
            if inner.read_only.contains(key) {
                return Err(StoreError::ReadOnly(key.to_string()));
            }
            inner.values.insert(key.to_string(), value.clone());
            inner.writes.push((key.to_string(), value));
            let entry = inner.entry(key);
            (
                StoreNotification {
                    key: key.to_string(),
                    entry,
                },
                inner.watchers_for(key),
            )
        };
        notify(callbacks, notification);
        Ok(())
    }

    fn watch(&self, prefix: &str, callback: WatchCallback) -> StoreResult<WatchId> {
        let mut inner = self.lock();
        inner.check_available()?;
        inner.next_watch += 1;
        let id = WatchId::new(inner.next_watch);
        inner.watchers.push(Watcher {
            id,
            prefix: prefix.to_string(),
            callback: Arc::from(callback),
        });
        debug!(%id, prefix, "Added watch");
        Ok(id)
    }

    fn unwatch(&self, id: WatchId) -> StoreResult<()> {
        let mut inner = self.lock();
        let before = inner.watchers.len();
        inner.watchers.retain(|w| w.id != id);
        if inner.watchers.len() == before {
            return Err(StoreError::UnknownWatch(id));
        }
        debug!(%id, "Removed watch");
        Ok(())
    }

    fn clear_cache(&self) {
        trace!("clear_cache is a no-op for the in-memory store");
    }
}
