//! Cache operation layer.
//!
//! This module implements the operation semantics every client binding
//! observes: conditional and versioned writes, the force-return-value
//! policy, bulk retrieval, and statistics updates.
//!
//! ```text
//! Client binding (native / standard / REST / memcached)
//!       │
//!       ▼
//! ┌─────────────────┐
//! │     Cache       │  (this module)
//! │                 │
//! │  - validate     │
//! │  - version      │
//! │  - count        │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   EntryStore    │  (storage module)
//! └─────────────────┘
//! ```

pub mod processor;


pub use processor::Cache;
