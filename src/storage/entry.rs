//! Cache entry model and expiration math.
//!
//! Entries carry their value together with a version stamp and two optional
//! expiration axes. Timestamps are wall-clock Unix milliseconds; expiration
//! bounds are given in whole seconds, matching the protocol surface.

use bytes::Bytes;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{CacheError, Result};

/// Expiration bounds for an entry.
///
/// Each axis is independent: `lifespan` limits total age since creation,
/// `max_idle` limits time since the last access. `None` on an axis means no
/// bound. When both are set the entry expires at whichever deadline comes
/// first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Expiration {
    lifespan: Option<u64>,
    max_idle: Option<u64>,
}

impl Expiration {
    /// Builds an expiration from protocol-level second counts.
    ///
    /// `0` and `-1` both leave the axis unset, which callers later resolve
    /// against the cache defaults. Anything below `-1` is rejected before it
    /// can reach the store.
    pub fn new(lifespan_secs: i64, max_idle_secs: i64) -> Result<Self> {
        if lifespan_secs < -1 || max_idle_secs < -1 {
            return Err(CacheError::InvalidExpiration {
                lifespan: lifespan_secs,
                max_idle: max_idle_secs,
            });
        }
        Ok(Self {
            lifespan: (lifespan_secs > 0).then_some(lifespan_secs as u64),
            max_idle: (max_idle_secs > 0).then_some(max_idle_secs as u64),
        })
    }

    /// An expiration with no bound on either axis.
    pub fn immortal() -> Self {
        Self::default()
    }

    /// Builds an expiration directly from resolved bounds.
    pub fn from_bounds(lifespan: Option<u64>, max_idle: Option<u64>) -> Self {
        Self { lifespan, max_idle }
    }

    /// Lifespan bound in seconds, if any.
    pub fn lifespan(&self) -> Option<u64> {
        self.lifespan
    }

    /// Max-idle bound in seconds, if any.
    pub fn max_idle(&self) -> Option<u64> {
        self.max_idle
    }

    /// Whether this expiration tracks accesses at all.
    pub fn tracks_idle(&self) -> bool {
        self.max_idle.is_some()
    }

    /// Fills unset axes from another expiration (the cache defaults).
    pub fn or_defaults(self, defaults: &Expiration) -> Self {
        Self {
            lifespan: self.lifespan.or(defaults.lifespan),
            max_idle: self.max_idle.or(defaults.max_idle),
        }
    }
}

/// A single stored entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// The stored value. Opaque to the core.
    pub value: Bytes,
    /// Version stamp installed by the write that produced this entry.
    pub version: u64,
    /// Creation time in Unix milliseconds.
    pub created_at: u64,
    /// Last successful access in Unix milliseconds.
    pub last_accessed: u64,
    /// Expiration bounds.
    pub expiration: Expiration,
}

impl CacheEntry {
    /// Creates an entry stamped with `version` at time `now`.
    pub fn new(value: Bytes, version: u64, expiration: Expiration, now: u64) -> Self {
        Self {
            value,
            version,
            created_at: now,
            last_accessed: now,
            expiration,
        }
    }

    /// Absolute expiry deadline in Unix milliseconds, or `None` for an
    /// immortal entry. With both axes set the earlier deadline wins.
    pub fn expires_at(&self) -> Option<u64> {
        let by_lifespan = self
            .expiration
            .lifespan()
            .map(|secs| self.created_at.saturating_add(secs.saturating_mul(1000)));
        let by_idle = self
            .expiration
            .max_idle()
            .map(|secs| self.last_accessed.saturating_add(secs.saturating_mul(1000)));
        match (by_lifespan, by_idle) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Whether the entry is past its deadline at time `now`.
    ///
    /// The boundary itself counts as expired: once the full lifespan or idle
    /// window has elapsed the entry is unobservable.
    pub fn is_expired(&self, now: u64) -> bool {
        self.expires_at().is_some_and(|deadline| now >= deadline)
    }

    /// Resets the idle clock to `now`.
    pub fn touch(&mut self, now: u64) {
        self.last_accessed = now;
    }

    /// Value plus version stamp, for seeding conditional operations.
    pub fn versioned(&self) -> VersionedValue {
        VersionedValue {
            value: self.value.clone(),
            version: self.version,
        }
    }

    /// Full metadata view of the entry.
    ///
    /// Sentinels follow the remote protocol: `-1` for an unbounded axis, and
    /// `-1` for `created`/`last_used` when the corresponding bound is absent
    /// (the server does not report timestamps it does not need to track).
    pub fn metadata(&self) -> EntryMetadata {
        let lifespan = self.expiration.lifespan();
        let max_idle = self.expiration.max_idle();
        EntryMetadata {
            value: self.value.clone(),
            version: self.version,
            lifespan: lifespan.map_or(-1, |s| s as i64),
            max_idle: max_idle.map_or(-1, |s| s as i64),
            created: if lifespan.is_some() {
                self.created_at as i64
            } else {
                -1
            },
            last_used: if max_idle.is_some() {
                self.last_accessed as i64
            } else {
                -1
            },
        }
    }
}

/// A value paired with its version stamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedValue {
    /// The stored value.
    pub value: Bytes,
    /// Version stamp of the entry the value was read from.
    pub version: u64,
}

/// Value plus the full entry metadata, as reported to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryMetadata {
    /// The stored value.
    pub value: Bytes,
    /// Version stamp.
    pub version: u64,
    /// Lifespan in seconds, `-1` when unbounded.
    pub lifespan: i64,
    /// Max-idle in seconds, `-1` when unbounded.
    pub max_idle: i64,
    /// Creation time in Unix milliseconds, `-1` when no lifespan is set.
    pub created: i64,
    /// Last access in Unix milliseconds, `-1` when no max-idle is set.
    pub last_used: i64,
}

/// Current wall-clock time in Unix milliseconds.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before Unix epoch")
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_at(version: u64, expiration: Expiration, now: u64) -> CacheEntry {
        CacheEntry::new(Bytes::from("v"), version, expiration, now)
    }

    #[test]
    fn test_expiration_sentinels_mean_unset() {
        for secs in [-1, 0] {
            let exp = Expiration::new(secs, secs).unwrap();
            assert_eq!(exp.lifespan(), None);
            assert_eq!(exp.max_idle(), None);
        }
    }

    #[test]
    fn test_expiration_rejects_below_minus_one() {
        assert!(Expiration::new(-2, -1).is_err());
        assert!(Expiration::new(-1, -2).is_err());
        assert!(Expiration::new(10, i64::MIN).is_err());
    }

    #[test]
    fn test_expiration_positive_seconds_kept() {
        let exp = Expiration::new(60, 5).unwrap();
        assert_eq!(exp.lifespan(), Some(60));
        assert_eq!(exp.max_idle(), Some(5));
        assert!(exp.tracks_idle());
    }

    #[test]
    fn test_or_defaults_fills_only_unset_axes() {
        let defaults = Expiration::from_bounds(Some(300), Some(30));
        let exp = Expiration::new(10, 0).unwrap().or_defaults(&defaults);
        assert_eq!(exp.lifespan(), Some(10));
        assert_eq!(exp.max_idle(), Some(30));
    }

    #[test]
    fn test_immortal_entry_never_expires() {
        let entry = entry_at(1, Expiration::immortal(), 1_000);
        assert_eq!(entry.expires_at(), None);
        assert!(!entry.is_expired(u64::MAX));
    }

    #[test]
    fn test_lifespan_boundary_is_expired() {
        let entry = entry_at(1, Expiration::new(2, -1).unwrap(), 1_000);
        assert!(!entry.is_expired(2_999));
        assert!(entry.is_expired(3_000));
        assert!(entry.is_expired(10_000));
    }

    #[test]
    fn test_idle_deadline_moves_with_touch() {
        let mut entry = entry_at(1, Expiration::new(-1, 2).unwrap(), 1_000);
        assert_eq!(entry.expires_at(), Some(3_000));

        entry.touch(2_500);
        assert_eq!(entry.expires_at(), Some(4_500));
        assert!(!entry.is_expired(4_499));
        assert!(entry.is_expired(4_500));
    }

    #[test]
    fn test_both_axes_take_earlier_deadline() {
        // Lifespan deadline at 11s, idle deadline at 3s.
        let entry = entry_at(1, Expiration::new(10, 2).unwrap(), 1_000);
        assert_eq!(entry.expires_at(), Some(3_000));

        // Touching cannot push past the lifespan deadline.
        let mut entry = entry;
        entry.touch(10_500);
        assert_eq!(entry.expires_at(), Some(11_000));
    }

    #[test]
    fn test_metadata_sentinels_for_immortal_entry() {
        let entry = entry_at(7, Expiration::immortal(), 1_000);
        let meta = entry.metadata();
        assert_eq!(meta.version, 7);
        assert_eq!(meta.lifespan, -1);
        assert_eq!(meta.max_idle, -1);
        assert_eq!(meta.created, -1);
        assert_eq!(meta.last_used, -1);
    }

    #[test]
    fn test_metadata_reports_tracked_axes() {
        let mut entry = entry_at(3, Expiration::new(60, 5).unwrap(), 1_000);
        entry.touch(2_000);
        let meta = entry.metadata();
        assert_eq!(meta.lifespan, 60);
        assert_eq!(meta.max_idle, 5);
        assert_eq!(meta.created, 1_000);
        assert_eq!(meta.last_used, 2_000);
    }

    #[test]
    fn test_huge_lifespan_saturates_instead_of_overflowing() {
        let entry = entry_at(1, Expiration::new(i64::MAX, -1).unwrap(), now_millis());
        assert!(!entry.is_expired(u64::MAX - 1));
    }
}
