//! Named cache registry.
//!
//! A container hands out `Arc<Cache>` handles by name. Each name is a fully
//! isolated key space with its own statistics, version counter, and event
//! channel; the only thing caches from one container share is the
//! configuration they were created with. Client bindings for the same name
//! all end up on the same `Cache` instance, which is what keeps their
//! semantics identical.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::info;

use crate::cache::Cache;
use crate::config::CacheConfig;

/// Registry of named caches sharing one configuration.
#[derive(Debug)]
pub struct CacheContainer {
    config: CacheConfig,
    caches: RwLock<HashMap<String, Arc<Cache>>>,
}

impl CacheContainer {
    /// Creates an empty container.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            caches: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cache named `name`, creating it on first use.
    pub fn cache(&self, name: &str) -> Arc<Cache> {
        if let Some(cache) = self.caches.read().unwrap().get(name) {
            return Arc::clone(cache);
        }

        let mut caches = self.caches.write().unwrap();
        // A racing caller may have created it between the two locks.
        if let Some(cache) = caches.get(name) {
            return Arc::clone(cache);
        }
        let cache = Arc::new(Cache::new(name, self.config.clone()));
        caches.insert(name.to_string(), Arc::clone(&cache));
        info!(cache = name, "named cache created");
        cache
    }

    /// Returns the cache named `name` only if it already exists.
    pub fn get_cache(&self, name: &str) -> Option<Arc<Cache>> {
        self.caches.read().unwrap().get(name).map(Arc::clone)
    }

    /// Names of all caches created so far, in no particular order.
    pub fn cache_names(&self) -> Vec<String> {
        self.caches.read().unwrap().keys().cloned().collect()
    }
}

impl Default for CacheContainer {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::entry::Expiration;
    use bytes::Bytes;

    #[test]
    fn test_cache_is_created_once() {
        let container = CacheContainer::default();

        let first = container.cache("sessions");
        let second = container.cache("sessions");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(container.cache_names(), vec!["sessions".to_string()]);
    }

    #[test]
    fn test_get_cache_does_not_create() {
        let container = CacheContainer::default();

        assert!(container.get_cache("missing").is_none());
        container.cache("present");
        assert!(container.get_cache("present").is_some());
    }

    #[test]
    fn test_named_caches_are_isolated() {
        let container = CacheContainer::default();
        let left = container.cache("left");
        let right = container.cache("right");

        left.put(
            Bytes::from("k"),
            Bytes::from("left-value"),
            Expiration::immortal(),
            false,
        );
        right.put(
            Bytes::from("k"),
            Bytes::from("right-value"),
            Expiration::immortal(),
            false,
        );
        right.get(b"k");

        assert_eq!(left.get(b"k"), Some(Bytes::from("left-value")));
        assert_eq!(right.get(b"k"), Some(Bytes::from("right-value")));

        // Stats and version counters are independent per name.
        assert_eq!(left.stats().hits, 1);
        assert_eq!(right.stats().hits, 2);
        assert_eq!(left.get_with_version(b"k").unwrap().version, 1);
        assert_eq!(right.get_with_version(b"k").unwrap().version, 1);
    }

    #[test]
    fn test_clear_affects_one_cache_only() {
        let container = CacheContainer::default();
        let a = container.cache("a");
        let other = container.cache("b");

        a.put(Bytes::from("k"), Bytes::from("v"), Expiration::immortal(), false);
        other.put(Bytes::from("k"), Bytes::from("v"), Expiration::immortal(), false);

        a.clear();
        assert!(a.is_empty());
        assert_eq!(other.size(), 1);
    }

    #[test]
    fn test_concurrent_create_yields_one_instance() {
        use std::thread;

        let container = Arc::new(CacheContainer::default());
        let mut handles = vec![];
        for _ in 0..8 {
            let container = Arc::clone(&container);
            handles.push(thread::spawn(move || container.cache("shared")));
        }

        let caches: Vec<Arc<Cache>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for cache in &caches[1..] {
            assert!(Arc::ptr_eq(&caches[0], cache));
        }
    }
}
