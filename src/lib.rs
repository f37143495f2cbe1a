//! # gridkv - A Versioned In-Memory Cache Core
//!
//! gridkv is the server-side core of a remote key-value cache: the state
//! machine that governs entry lifecycle, optimistic concurrency, expiration,
//! and statistics. Transports, protocol adapters, and client bindings are
//! translation layers on top of it; because there is exactly one
//! authoritative store per named cache, every binding observes identical
//! semantics.
//!
//! ## Features
//!
//! - **Versioned writes**: every successful mutation installs a fresh,
//!   strictly increasing version stamp, enabling compare-and-swap style
//!   replace and remove without locks on the client side
//! - **Two-axis expiration**: per-entry lifespan (age since creation) and
//!   max-idle (time since last access), evaluated lazily on every access
//!   with an optional adaptive background sweeper
//! - **Live statistics**: per-cache atomic counters (stores, hits, misses,
//!   retrievals, remove hits/misses, live and cumulative entry counts),
//!   queryable as a typed snapshot or by counter name
//! - **Lifecycle events**: fire-and-forget created/modified/removed/expired
//!   notifications for replication collaborators
//! - **Sharded storage**: 64 lock-striped shards, linearizable per key,
//!   parallel across keys
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          CacheContainer                          │
//! │                     (named, isolated caches)                     │
//! │                                                                  │
//! │   ┌──────────────────────── Cache ────────────────────────────┐  │
//! │   │                                                           │  │
//! │   │  ┌──────────────┐   ┌───────────────┐   ┌──────────────┐  │  │
//! │   │  │ VersionSource│   │  CacheStats   │   │   Notifier   │  │  │
//! │   │  │  (AtomicU64) │   │  (atomics)    │   │ (broadcast)  │  │  │
//! │   │  └──────┬───────┘   └───────▲───────┘   └──────▲───────┘  │  │
//! │   │         │                   │                  │          │  │
//! │   │         ▼                   │                  │          │  │
//! │   │  ┌─────────────────────────────────────────────────────┐  │  │
//! │   │  │                     EntryStore                      │  │  │
//! │   │  │  ┌────────┐ ┌────────┐ ┌────────┐ ┌────────┐        │  │  │
//! │   │  │  │Shard 0 │ │Shard 1 │ │Shard 2 │ │ ...64  │        │  │  │
//! │   │  │  │RwLock  │ │RwLock  │ │RwLock  │ │ shards │        │  │  │
//! │   │  │  └────────┘ └────────┘ └────────┘ └────────┘        │  │  │
//! │   │  └─────────────────────────▲───────────────────────────┘  │  │
//! │   │                            │                              │  │
//! │   │              ┌─────────────┴──────────────┐               │  │
//! │   │              │        ExpirySweeper       │               │  │
//! │   │              │  (background tokio task)   │               │  │
//! │   │              └────────────────────────────┘               │  │
//! │   └───────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use gridkv::{CacheContainer, Expiration};
//! use bytes::Bytes;
//!
//! let container = CacheContainer::default();
//! let cache = container.cache("sessions");
//!
//! // Plain writes and reads.
//! cache.put(
//!     Bytes::from("user:1"),
//!     Bytes::from("alice"),
//!     Expiration::immortal(),
//!     false,
//! );
//! assert_eq!(cache.get(b"user:1"), Some(Bytes::from("alice")));
//!
//! // Optimistic concurrency with version stamps.
//! let current = cache.get_with_version(b"user:1").unwrap();
//! let applied = cache.replace_with_version(
//!     Bytes::from("user:1"),
//!     current.version,
//!     Bytes::from("bob"),
//!     Expiration::immortal(),
//! );
//! assert!(applied);
//!
//! // Entries can expire by age or by idleness.
//! cache.put(
//!     Bytes::from("token"),
//!     Bytes::from("xyz"),
//!     Expiration::new(60, 5).unwrap(),
//!     false,
//! );
//!
//! assert_eq!(cache.stat("stores").as_deref(), Some("3"));
//! ```
//!
//! ## Module Overview
//!
//! - [`cache`]: the operation set every client binding talks to
//! - [`container`]: named cache registry
//! - [`storage`]: sharded entry store, expiration, version allocation
//! - [`stats`]: per-cache statistics counters
//! - [`events`]: entry lifecycle notifications
//! - [`config`]: construction-time cache settings
//! - [`error`]: the (small) error surface
//!
//! ## Design Highlights
//!
//! ### Per-Key Linearizability
//!
//! Single-key operations, including the versioned conditional ones, run
//! entirely under one shard write lock, so each behaves as if it held an
//! exclusive per-key lock for its whole read-modify-write. Operations on
//! different shards never contend.
//!
//! ### Lazy + Active Expiry
//!
//! Every operation checks the keys it touches against its own start
//! timestamp, so an expired entry can never be read, counted, or used to
//! satisfy a version check. The background sweeper only reclaims memory
//! held by entries nothing looks at; correctness never depends on it.

pub mod cache;
pub mod config;
pub mod container;
pub mod error;
pub mod events;
pub mod stats;
pub mod storage;

// Re-export the types most callers need.
pub use cache::Cache;
pub use config::CacheConfig;
pub use container::CacheContainer;
pub use error::{CacheError, Result};
pub use events::{CacheEvent, Notifier};
pub use stats::{CacheStats, StatsSnapshot};
pub use storage::{
    start_expiry_sweeper, CacheEntry, EntryMetadata, Expiration, ExpirySweeper, SweeperConfig,
    VersionedValue,
};

/// Version of gridkv.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
