//! The cache operation set.
//!
//! `Cache` is the layer every client binding talks to. It owns the entry
//! store, the version allocator, and the statistics handle for one named
//! cache, and implements the remote operation semantics on top of the store
//! primitives: conditional and versioned writes, the force-return-value
//! policy, bulk retrieval, and counter updates.
//!
//! Mutating operations report the previous value only when the caller sets
//! `force_return`; otherwise they report absent no matter what was stored.
//! Fetching and shipping the old value costs bandwidth, so clients opt in
//! per call.

use bytes::Bytes;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

use crate::config::CacheConfig;
use crate::events::{CacheEvent, Notifier};
use crate::stats::{CacheStats, StatsSnapshot};
use crate::storage::entry::{now_millis, EntryMetadata, Expiration, VersionedValue};
use crate::storage::{EntryStore, VersionSource};

/// A single named cache: the authoritative store plus its operation surface.
///
/// All methods take `&self` and are safe to call from any number of threads;
/// single-key operations are linearizable per key. Keys and values are
/// opaque byte sequences that the cache never interprets.
#[derive(Debug)]
pub struct Cache {
    name: String,
    store: EntryStore,
    versions: VersionSource,
    stats: Arc<CacheStats>,
    notifier: Arc<Notifier>,
    defaults: Expiration,
    touch_on_contains: bool,
}

impl Cache {
    /// Creates an empty cache.
    pub fn new(name: impl Into<String>, config: CacheConfig) -> Self {
        let name = name.into();
        let stats = Arc::new(CacheStats::new());
        let notifier = Arc::new(Notifier::new());
        let store = EntryStore::new(Arc::clone(&stats), Arc::clone(&notifier));
        debug!(cache = %name, "cache created");
        Self {
            name,
            store,
            versions: VersionSource::new(),
            stats,
            notifier,
            defaults: Expiration::from_bounds(config.default_lifespan, config.default_max_idle),
            touch_on_contains: config.touch_on_contains,
        }
    }

    /// The cache's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fills unset expiration axes from the cache defaults.
    fn resolve(&self, expiration: Expiration) -> Expiration {
        expiration.or_defaults(&self.defaults)
    }

    /// Returns the value under `key`, or `None`.
    ///
    /// Counts a retrieval plus a hit or miss, and resets the idle clock on a
    /// hit.
    pub fn get(&self, key: &[u8]) -> Option<Bytes> {
        match self.store.get(key, now_millis(), true) {
            Some(entry) => {
                self.stats.record_hit();
                Some(entry.value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Like [`get`](Self::get), but pairs the value with its version stamp
    /// so the caller can seed a conditional operation.
    pub fn get_with_version(&self, key: &[u8]) -> Option<VersionedValue> {
        match self.store.get(key, now_millis(), true) {
            Some(entry) => {
                self.stats.record_hit();
                Some(entry.versioned())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Like [`get`](Self::get), but returns the full entry metadata.
    pub fn get_with_metadata(&self, key: &[u8]) -> Option<EntryMetadata> {
        match self.store.get(key, now_millis(), true) {
            Some(entry) => {
                self.stats.record_hit();
                Some(entry.metadata())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Unconditional upsert with a freshly allocated version.
    ///
    /// Returns the previous value only under `force_return`.
    pub fn put(
        &self,
        key: Bytes,
        value: Bytes,
        expiration: Expiration,
        force_return: bool,
    ) -> Option<Bytes> {
        let now = now_millis();
        let expiration = self.resolve(expiration);
        let version = self.versions.next_version();
        let previous = self.store.insert(key, value, version, expiration, now);
        self.stats.record_store();
        if force_return {
            previous.map(|entry| entry.value)
        } else {
            None
        }
    }

    /// Inserts only when `key` is absent after the expiry check.
    ///
    /// On conflict the store is untouched and the current value is returned
    /// under `force_return`. Without `force_return` the result is absent
    /// whether or not the insert applied.
    pub fn put_if_absent(
        &self,
        key: Bytes,
        value: Bytes,
        expiration: Expiration,
        force_return: bool,
    ) -> Option<Bytes> {
        let now = now_millis();
        let expiration = self.resolve(expiration);
        let version = self.versions.next_version();
        match self.store.insert_absent(key, value, version, expiration, now) {
            None => {
                self.stats.record_store();
                None
            }
            Some(existing) => {
                if force_return {
                    Some(existing.value)
                } else {
                    None
                }
            }
        }
    }

    /// Overwrites only when `key` holds a live entry.
    ///
    /// Returns the previous value under `force_return`; absent when the key
    /// was missing (in which case nothing was written).
    pub fn replace(
        &self,
        key: Bytes,
        value: Bytes,
        expiration: Expiration,
        force_return: bool,
    ) -> Option<Bytes> {
        let now = now_millis();
        let expiration = self.resolve(expiration);
        let version = self.versions.next_version();
        match self.store.replace_existing(key, value, version, expiration, now) {
            Some(previous) => {
                self.stats.record_store();
                if force_return {
                    Some(previous.value)
                } else {
                    None
                }
            }
            None => None,
        }
    }

    /// Replaces the entry only if its current version equals `expected`.
    ///
    /// Returns whether the swap applied. On mismatch or absence nothing
    /// changes and nothing is counted.
    pub fn replace_with_version(
        &self,
        key: Bytes,
        expected: u64,
        value: Bytes,
        expiration: Expiration,
    ) -> bool {
        let now = now_millis();
        let expiration = self.resolve(expiration);
        let version = self.versions.next_version();
        let applied = self
            .store
            .replace_versioned(key, expected, value, version, expiration, now);
        if applied {
            self.stats.record_store();
        }
        applied
    }

    /// Unconditional delete.
    ///
    /// Counts `removeHits` when a live entry was deleted, `removeMisses`
    /// otherwise. Returns the previous value under `force_return`.
    pub fn remove(&self, key: &[u8], force_return: bool) -> Option<Bytes> {
        match self.store.remove(key, now_millis()) {
            Some(previous) => {
                self.stats.record_remove_hit();
                if force_return {
                    Some(previous.value)
                } else {
                    None
                }
            }
            None => {
                self.stats.record_remove_miss();
                None
            }
        }
    }

    /// Deletes the entry only if its current version equals `expected`.
    ///
    /// Returns whether the delete applied; a failed attempt counts nothing.
    pub fn remove_with_version(&self, key: &[u8], expected: u64) -> bool {
        let applied = self.store.remove_versioned(key, expected, now_millis());
        if applied {
            self.stats.record_remove_hit();
        }
        applied
    }

    /// Post-expiry existence test.
    ///
    /// Never touches the hit/miss counters. Resets the idle clock only when
    /// the cache was configured with `touch_on_contains`.
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.store
            .contains(key, now_millis(), self.touch_on_contains)
    }

    /// Retrieves up to `count` live entries in one call.
    ///
    /// `0` means all live entries; a negative count yields an empty result.
    /// A bounded request returns an arbitrary subset of exactly `count`
    /// entries (or everything, when fewer are live). Returned entries have
    /// their idle clocks reset; hit/miss counters are untouched.
    pub fn get_bulk(&self, count: i64) -> Vec<(Bytes, Bytes)> {
        if count < 0 {
            return Vec::new();
        }
        let limit = (count > 0).then_some(count as usize);
        self.store.collect(limit, now_millis())
    }

    /// Number of live entries, lazily evicting expired ones along the way.
    pub fn size(&self) -> usize {
        self.store.live_len(now_millis())
    }

    /// Whether the cache holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Removes every entry. Cumulative statistics survive; only the live
    /// entry count resets.
    pub fn clear(&self) {
        self.store.clear();
        debug!(cache = %self.name, "cache cleared");
    }

    /// Point-in-time statistics snapshot.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Single counter by its published name, as a string.
    pub fn stat(&self, name: &str) -> Option<String> {
        self.stats.snapshot().get(name)
    }

    /// Subscribes to entry lifecycle events (fire-and-forget delivery).
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.notifier.subscribe()
    }

    /// Evicts every expired entry right now. Returns the eviction count.
    ///
    /// Called by the background sweeper; harmless to call directly.
    pub fn purge_expired(&self) -> u64 {
        self.store.purge_expired(now_millis())
    }
}
