//! Storage layer.
//!
//! Everything under this module deals with entries at rest: the sharded
//! store, the entry model with its two expiration axes, version stamp
//! allocation, and the optional background sweeper.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       EntryStore                            │
//! │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐           │
//! │  │ Shard 0 │ │ Shard 1 │ │ Shard 2 │ │ ...64   │           │
//! │  │ RwLock  │ │ RwLock  │ │ RwLock  │ │ shards  │           │
//! │  └─────────┘ └─────────┘ └─────────┘ └─────────┘           │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                            │
//!              ┌─────────────┴─────────────┐
//!              │       ExpirySweeper       │
//!              │  (background tokio task)  │
//!              └───────────────────────────┘
//! ```
//!
//! Expiry is lazy first: every store operation checks the keys it touches
//! against the operation timestamp. The sweeper only reclaims memory held by
//! entries nothing looks at anymore.

pub mod engine;
pub mod entry;
pub mod expiry;
pub mod version;

pub use engine::EntryStore;
pub use entry::{now_millis, CacheEntry, EntryMetadata, Expiration, VersionedValue};
pub use expiry::{start_expiry_sweeper, ExpirySweeper, SweeperConfig};
pub use version::VersionSource;
