//! Cache configuration.
//!
//! A `CacheConfig` is handed to the container (or directly to a `Cache`) at
//! construction time. Every named cache created from one container shares the
//! same configuration but nothing else.

/// Construction-time settings for a cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Default lifespan in seconds applied when a write does not specify one.
    /// `None` means entries live forever unless told otherwise.
    pub default_lifespan: Option<u64>,
    /// Default max-idle in seconds applied when a write does not specify one.
    pub default_max_idle: Option<u64>,
    /// When `true`, `contains_key` resets the idle timer like a read does.
    /// Off by default so a pure existence probe cannot keep an entry alive.
    pub touch_on_contains: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_lifespan: None,
            default_max_idle: None,
            touch_on_contains: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.default_lifespan, None);
        assert_eq!(config.default_max_idle, None);
        assert!(!config.touch_on_contains);
    }
}
