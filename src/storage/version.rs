//! Version stamp allocation.
//!
//! Every cache owns one `VersionSource`. Each successful mutation installs a
//! freshly allocated stamp, so version comparison is enough to detect any
//! intervening write. Stamps are unique and strictly increasing within a
//! cache instance; they are not required to be contiguous (a conditional
//! write that fails simply discards the stamp it drew).

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic allocator for entry version stamps.
#[derive(Debug)]
pub struct VersionSource {
    next: AtomicU64,
}

impl VersionSource {
    /// Creates a source whose first allocated version is `1`.
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Allocates the next version stamp.
    pub fn next_version(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for VersionSource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_versions_start_at_one_and_increase() {
        let source = VersionSource::new();
        assert_eq!(source.next_version(), 1);
        assert_eq!(source.next_version(), 2);
        assert_eq!(source.next_version(), 3);
    }

    #[test]
    fn test_concurrent_allocation_never_repeats() {
        let source = Arc::new(VersionSource::new());
        let mut handles = vec![];

        for _ in 0..8 {
            let source = Arc::clone(&source);
            handles.push(thread::spawn(move || {
                (0..1000).map(|_| source.next_version()).collect::<Vec<_>>()
            }));
        }

        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        let total = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), total);
    }
}
