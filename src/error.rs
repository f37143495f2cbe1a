//! Error types for the cache core.
//!
//! The error surface is deliberately small. Absent keys and version mismatches
//! are normal negative results and are modeled as `Option`/`bool` return
//! values, never as errors. The only thing the core rejects outright is a
//! malformed expiration, and it does so before touching any state.

use thiserror::Error;

/// Unified error type for the cache core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Lifespan or max-idle below the `-1` sentinel.
    #[error("invalid expiration: lifespan={lifespan}s max_idle={max_idle}s (use -1 or 0 for no bound, positive seconds otherwise)")]
    InvalidExpiration {
        /// Requested lifespan in seconds.
        lifespan: i64,
        /// Requested max-idle in seconds.
        max_idle: i64,
    },
}

/// Convenience Result type for the cache core.
pub type Result<T> = std::result::Result<T, CacheError>;
