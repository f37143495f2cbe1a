//! Per-cache statistics counters.
//!
//! Every cache owns one `CacheStats` set, created with the cache and shared
//! (via `Arc`) between the entry store and the operation layer. Counters are
//! plain atomics with relaxed ordering; they are monotonic except for the
//! live-entry count, so no cross-counter atomicity is needed when reading.
//!
//! The string names accepted by [`StatsSnapshot::get`] match the stats map
//! exposed to remote clients, so a stats query keyed by counter name can be
//! answered directly from a snapshot.

use std::sync::atomic::{AtomicU64, Ordering};

/// Name of the live entry count counter.
pub const CURRENT_NUMBER_OF_ENTRIES: &str = "currentNumberOfEntries";
/// Name of the cumulative created-entries counter.
pub const TOTAL_NUMBER_OF_ENTRIES: &str = "totalNumberOfEntries";
/// Name of the successful-write counter.
pub const STORES: &str = "stores";
/// Name of the read-hit counter.
pub const HITS: &str = "hits";
/// Name of the read-miss counter.
pub const MISSES: &str = "misses";
/// Name of the total-reads counter.
pub const RETRIEVALS: &str = "retrievals";
/// Name of the successful-remove counter.
pub const REMOVE_HITS: &str = "removeHits";
/// Name of the missed-remove counter.
pub const REMOVE_MISSES: &str = "removeMisses";

/// All counter names, in the order they are reported.
pub const STAT_NAMES: [&str; 8] = [
    CURRENT_NUMBER_OF_ENTRIES,
    TOTAL_NUMBER_OF_ENTRIES,
    STORES,
    HITS,
    MISSES,
    RETRIEVALS,
    REMOVE_HITS,
    REMOVE_MISSES,
];

/// Live statistics for a single cache.
#[derive(Debug, Default)]
pub struct CacheStats {
    current_entries: AtomicU64,
    total_entries: AtomicU64,
    stores: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    retrievals: AtomicU64,
    remove_hits: AtomicU64,
    remove_misses: AtomicU64,
}

impl CacheStats {
    /// Creates a new counter set with everything at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful write (put, replace, applied CAS).
    pub fn record_store(&self) {
        self.stores.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a read that found a live entry.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        self.retrievals.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a read that found nothing.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        self.retrievals.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a remove that deleted a live entry.
    pub fn record_remove_hit(&self) {
        self.remove_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Records an unconditional remove that found nothing.
    pub fn record_remove_miss(&self) {
        self.remove_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Accounts for a newly created entry.
    pub fn entry_created(&self) {
        self.total_entries.fetch_add(1, Ordering::Relaxed);
        self.current_entries.fetch_add(1, Ordering::Relaxed);
    }

    /// Accounts for an entry leaving the store (remove or expiry).
    pub fn entry_removed(&self) {
        self.current_entries.fetch_sub(1, Ordering::Relaxed);
    }

    /// Accounts for `count` entries wiped by a clear.
    pub fn entries_cleared(&self, count: u64) {
        self.current_entries.fetch_sub(count, Ordering::Relaxed);
    }

    /// Takes a point-in-time snapshot of all counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            current_entries: self.current_entries.load(Ordering::Relaxed),
            total_entries: self.total_entries.load(Ordering::Relaxed),
            stores: self.stores.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            retrievals: self.retrievals.load(Ordering::Relaxed),
            remove_hits: self.remove_hits.load(Ordering::Relaxed),
            remove_misses: self.remove_misses.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of a cache's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Number of live entries right now.
    pub current_entries: u64,
    /// Entries ever created in this cache.
    pub total_entries: u64,
    /// Successful writes.
    pub stores: u64,
    /// Reads that found a live entry.
    pub hits: u64,
    /// Reads that found nothing.
    pub misses: u64,
    /// Total reads (hits plus misses).
    pub retrievals: u64,
    /// Removes that deleted an entry.
    pub remove_hits: u64,
    /// Unconditional removes that found nothing.
    pub remove_misses: u64,
}

impl StatsSnapshot {
    /// Looks up a counter by its published name, rendered as a string.
    ///
    /// Returns `None` for unknown names.
    pub fn get(&self, name: &str) -> Option<String> {
        let value = match name {
            CURRENT_NUMBER_OF_ENTRIES => self.current_entries,
            TOTAL_NUMBER_OF_ENTRIES => self.total_entries,
            STORES => self.stores,
            HITS => self.hits,
            MISSES => self.misses,
            RETRIEVALS => self.retrievals,
            REMOVE_HITS => self.remove_hits,
            REMOVE_MISSES => self.remove_misses,
            _ => return None,
        };
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_start_at_zero() {
        let stats = CacheStats::new();
        let snap = stats.snapshot();
        for name in STAT_NAMES {
            assert_eq!(snap.get(name).as_deref(), Some("0"), "{name}");
        }
    }

    #[test]
    fn test_hit_and_miss_both_count_retrievals() {
        let stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();

        let snap = stats.snapshot();
        assert_eq!(snap.hits, 2);
        assert_eq!(snap.misses, 1);
        assert_eq!(snap.retrievals, 3);
    }

    #[test]
    fn test_entry_lifecycle_counters() {
        let stats = CacheStats::new();
        stats.entry_created();
        stats.entry_created();
        stats.entry_removed();

        let snap = stats.snapshot();
        assert_eq!(snap.current_entries, 1);
        assert_eq!(snap.total_entries, 2);
    }

    #[test]
    fn test_clear_only_resets_live_count() {
        let stats = CacheStats::new();
        stats.entry_created();
        stats.entry_created();
        stats.record_store();
        stats.record_store();
        stats.entries_cleared(2);

        let snap = stats.snapshot();
        assert_eq!(snap.current_entries, 0);
        assert_eq!(snap.total_entries, 2);
        assert_eq!(snap.stores, 2);
    }

    #[test]
    fn test_snapshot_get_unknown_name() {
        let stats = CacheStats::new();
        assert_eq!(stats.snapshot().get("evictions"), None);
    }
}
