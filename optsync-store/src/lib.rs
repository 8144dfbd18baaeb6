//! Configuration store capability for optsync.
//!
//! The store is a hierarchical key/value service keyed by `/`-delimited paths,
//! holding untyped variant values and delivering change notifications for
//! watched prefixes. The synchronization engine only ever talks to it through
//! the [`ConfigStore`] trait.
//!
//! # Architecture
//!
//! - [`StoreValue`] is the variant representation (bool, int, float, string,
//!   homogeneous list) with deep equality
//! - [`StoreEntry`] adds the metadata returned by entry lookups
//! - [`MemoryStore`] is an in-process implementation with schema defaults,
//!   read-only keys, synchronous watchers and JSON snapshots

mod error;
mod memory;
mod value;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use value::{StoreValue, StoreValueKind};

use std::fmt;

/// Identifier of a live watch subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WatchId(u64);

impl WatchId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for WatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "watch-{}", self.0)
    }
}

/// A stored value plus its metadata.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StoreEntry {
    /// The value, or `None` if the key is unset and has no default.
    pub value: Option<StoreValue>,
    /// Whether `value` comes from a schema default rather than a user write.
    pub is_default: bool,
    /// Whether writes to the key are permitted.
    pub is_writable: bool,
}

/// A change delivered to watchers.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreNotification {
    pub key: String,
    pub entry: StoreEntry,
}

/// Callback invoked for every change under a watched prefix.
pub type WatchCallback = Box<dyn Fn(StoreNotification) + Send + Sync>;

/// Capability set of an external configuration store.
///
/// Implementations decide their own durability and locking; no method retries.
pub trait ConfigStore: Send + Sync {
    /// Returns the effective value (user value or schema default) of a key.
    fn get(&self, key: &str) -> StoreResult<Option<StoreValue>>;

    /// Returns the value of a key together with its metadata.
    fn get_entry(&self, key: &str) -> StoreResult<StoreEntry>;

    /// Writes a value. Watchers of the key are notified.
    fn set(&self, key: &str, value: StoreValue) -> StoreResult<()>;

    /// Subscribes to changes of every key equal to or below `prefix`.
    fn watch(&self, prefix: &str, callback: WatchCallback) -> StoreResult<WatchId>;

    /// Removes a subscription.
    fn unwatch(&self, id: WatchId) -> StoreResult<()>;

    /// Drops any client-side cache.
    fn clear_cache(&self);
}

/// Returns true if `key` is `prefix` or lies below it.
pub fn key_is_under(key: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    match key.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || prefix.is_empty(),
        None => false,
    }
}
