//! Sharded entry store.
//!
//! The store distributes keys across a fixed number of shards, each guarded
//! by its own `RwLock`. Single-key operations run entirely under one shard
//! lock, which makes them linearizable per key while leaving other shards
//! free; whole-store operations (size, bulk collection, purge, clear) walk
//! the shards one at a time and are snapshot-consistent per shard.
//!
//! Expiry is lazy: every operation resolves the staleness of the keys it
//! touches against the caller-supplied timestamp before acting, so an expired
//! entry is never observed even if the background sweeper is not running.
//! Whichever operation first finds an entry stale removes it under the shard
//! write lock, adjusts the live counter once, and publishes a single
//! `Expired` event.
//!
//! All timestamps are Unix milliseconds supplied by the caller. An operation
//! evaluates every key it touches against one timestamp, taken when the
//! operation started.

use bytes::Bytes;
use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::{Arc, RwLock};
use tracing::trace;

use crate::events::Notifier;
use crate::stats::CacheStats;
use crate::storage::entry::{CacheEntry, Expiration};

/// Number of shards. More shards mean less lock contention at the price of
/// some memory overhead; 64 is a good balance for most workloads.
const NUM_SHARDS: usize = 64;

/// A single shard holding a portion of the key space.
#[derive(Debug)]
struct Shard {
    data: RwLock<HashMap<Bytes, CacheEntry>>,
}

impl Shard {
    fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }
}

/// The entry store backing one cache.
///
/// Owns the entries exclusively; the operation layer mutates them only
/// through the methods here. Lifecycle accounting (live count, created
/// count, lifecycle events) happens at the point of map mutation so that
/// each event is counted exactly once no matter which operation triggered it.
#[derive(Debug)]
pub struct EntryStore {
    shards: Vec<Shard>,
    stats: Arc<CacheStats>,
    notifier: Arc<Notifier>,
}

impl EntryStore {
    /// Creates an empty store reporting to `stats` and `notifier`.
    pub fn new(stats: Arc<CacheStats>, notifier: Arc<Notifier>) -> Self {
        let shards = (0..NUM_SHARDS).map(|_| Shard::new()).collect();
        Self {
            shards,
            stats,
            notifier,
        }
    }

    #[inline]
    fn shard_index(&self, key: &[u8]) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % NUM_SHARDS
    }

    #[inline]
    fn shard(&self, key: &[u8]) -> &Shard {
        &self.shards[self.shard_index(key)]
    }

    /// Removes `key` if its entry is past the deadline at `now`.
    ///
    /// Must be called under the shard write lock. Returns `true` when an
    /// eviction happened, in which case the key is accounted and announced
    /// here and nowhere else.
    fn expire_key_locked(
        &self,
        data: &mut HashMap<Bytes, CacheEntry>,
        key: &[u8],
        now: u64,
    ) -> bool {
        let stale = data.get(key).is_some_and(|entry| entry.is_expired(now));
        if !stale {
            return false;
        }
        if let Some((key, _)) = data.remove_entry(key) {
            trace!(?key, "evicting expired entry");
            self.stats.entry_removed();
            self.notifier.expired(key);
        }
        true
    }

    /// Evicts every expired entry in one shard. Returns the eviction count.
    fn evict_expired_locked(&self, data: &mut HashMap<Bytes, CacheEntry>, now: u64) -> u64 {
        let stale: Vec<Bytes> = data
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();
        let count = stale.len() as u64;
        for key in stale {
            if let Some((key, _)) = data.remove_entry(&key) {
                self.stats.entry_removed();
                self.notifier.expired(key);
            }
        }
        count
    }

    /// Returns a copy of the live entry under `key`, or `None`.
    ///
    /// With `touch` set the read resets the entry's idle clock. Reads of
    /// entries that track no idle time take only the shard read lock; an
    /// expired or idle-tracked entry is resolved under the write lock.
    pub fn get(&self, key: &[u8], now: u64, touch: bool) -> Option<CacheEntry> {
        let shard = self.shard(key);

        // Fast path: live entry that does not need a write.
        {
            let data = shard.data.read().unwrap();
            match data.get(key) {
                None => return None,
                Some(entry)
                    if !entry.is_expired(now) && !(touch && entry.expiration.tracks_idle()) =>
                {
                    return Some(entry.clone());
                }
                _ => {}
            }
        }

        let mut data = shard.data.write().unwrap();
        if self.expire_key_locked(&mut data, key, now) {
            return None;
        }
        match data.get_mut(key) {
            Some(entry) => {
                if touch {
                    entry.touch(now);
                }
                Some(entry.clone())
            }
            None => None,
        }
    }

    /// Post-expiry existence test, optionally resetting the idle clock.
    pub fn contains(&self, key: &[u8], now: u64, touch: bool) -> bool {
        self.get(key, now, touch).is_some()
    }

    /// Unconditional upsert. Returns the previous live entry, if any.
    pub fn insert(
        &self,
        key: Bytes,
        value: Bytes,
        version: u64,
        expiration: Expiration,
        now: u64,
    ) -> Option<CacheEntry> {
        let shard = self.shard(&key);
        let mut data = shard.data.write().unwrap();
        // An expired previous entry must never surface as the prior value.
        self.expire_key_locked(&mut data, &key, now);
        let previous = data.insert(key.clone(), CacheEntry::new(value, version, expiration, now));
        match previous {
            Some(previous) => {
                self.notifier.modified(key);
                Some(previous)
            }
            None => {
                self.stats.entry_created();
                self.notifier.created(key);
                None
            }
        }
    }

    /// Inserts only when the key is absent. Returns `None` when the insert
    /// applied, or the current live entry when it did not.
    pub fn insert_absent(
        &self,
        key: Bytes,
        value: Bytes,
        version: u64,
        expiration: Expiration,
        now: u64,
    ) -> Option<CacheEntry> {
        let shard = self.shard(&key);
        let mut data = shard.data.write().unwrap();
        self.expire_key_locked(&mut data, &key, now);
        if let Some(existing) = data.get(&key) {
            return Some(existing.clone());
        }
        data.insert(key.clone(), CacheEntry::new(value, version, expiration, now));
        self.stats.entry_created();
        self.notifier.created(key);
        None
    }

    /// Overwrites only when the key holds a live entry. Returns the previous
    /// entry when it applied.
    pub fn replace_existing(
        &self,
        key: Bytes,
        value: Bytes,
        version: u64,
        expiration: Expiration,
        now: u64,
    ) -> Option<CacheEntry> {
        let shard = self.shard(&key);
        let mut data = shard.data.write().unwrap();
        self.expire_key_locked(&mut data, &key, now);
        if !data.contains_key(&key) {
            return None;
        }
        let previous = data.insert(key.clone(), CacheEntry::new(value, version, expiration, now));
        self.notifier.modified(key);
        previous
    }

    /// Overwrites only when the live entry's version equals `expected`.
    ///
    /// An expired entry cannot satisfy the comparison even if its stored
    /// version matches; it is evicted and the swap reports not-applied.
    pub fn replace_versioned(
        &self,
        key: Bytes,
        expected: u64,
        value: Bytes,
        version: u64,
        expiration: Expiration,
        now: u64,
    ) -> bool {
        let shard = self.shard(&key);
        let mut data = shard.data.write().unwrap();
        self.expire_key_locked(&mut data, &key, now);
        let matches = data
            .get(&key)
            .is_some_and(|entry| entry.version == expected);
        if !matches {
            return false;
        }
        data.insert(key.clone(), CacheEntry::new(value, version, expiration, now));
        self.notifier.modified(key);
        true
    }

    /// Unconditional delete. Returns the previous live entry, if any.
    pub fn remove(&self, key: &[u8], now: u64) -> Option<CacheEntry> {
        let shard = self.shard(key);
        let mut data = shard.data.write().unwrap();
        if self.expire_key_locked(&mut data, key, now) {
            return None;
        }
        match data.remove_entry(key) {
            Some((key, entry)) => {
                self.stats.entry_removed();
                self.notifier.removed(key);
                Some(entry)
            }
            None => None,
        }
    }

    /// Deletes only when the live entry's version equals `expected`.
    pub fn remove_versioned(&self, key: &[u8], expected: u64, now: u64) -> bool {
        let shard = self.shard(key);
        let mut data = shard.data.write().unwrap();
        if self.expire_key_locked(&mut data, key, now) {
            return false;
        }
        let matches = data
            .get(key)
            .is_some_and(|entry| entry.version == expected);
        if !matches {
            return false;
        }
        if let Some((key, _)) = data.remove_entry(key) {
            self.stats.entry_removed();
            self.notifier.removed(key);
        }
        true
    }

    /// Number of live entries, evicting every expired entry encountered.
    pub fn live_len(&self, now: u64) -> usize {
        let mut live = 0;
        for shard in &self.shards {
            let mut data = shard.data.write().unwrap();
            self.evict_expired_locked(&mut data, now);
            live += data.len();
        }
        live
    }

    /// Collects up to `limit` live key/value pairs (all of them when `limit`
    /// is `None`), resetting the idle clock of each returned entry.
    ///
    /// Shards are walked in order; within a shard the selection is whatever
    /// the map yields, so a bounded collection is an arbitrary subset.
    pub fn collect(&self, limit: Option<usize>, now: u64) -> Vec<(Bytes, Bytes)> {
        if limit == Some(0) {
            return Vec::new();
        }
        let mut out = Vec::new();
        for shard in &self.shards {
            let mut data = shard.data.write().unwrap();
            self.evict_expired_locked(&mut data, now);
            for (key, entry) in data.iter_mut() {
                entry.touch(now);
                out.push((key.clone(), entry.value.clone()));
                if limit.is_some_and(|n| out.len() >= n) {
                    return out;
                }
            }
        }
        out
    }

    /// Evicts every expired entry in the store. Returns the eviction count.
    pub fn purge_expired(&self, now: u64) -> u64 {
        let mut purged = 0;
        for shard in &self.shards {
            let mut data = shard.data.write().unwrap();
            purged += self.evict_expired_locked(&mut data, now);
        }
        purged
    }

    /// Drops every entry. Only the live counter is adjusted; cumulative
    /// counters and per-entry events are untouched.
    pub fn clear(&self) {
        for shard in &self.shards {
            let mut data = shard.data.write().unwrap();
            let wiped = data.len() as u64;
            data.clear();
            self.stats.entries_cleared(wiped);
        }
    }
}
