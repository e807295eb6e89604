//! Hierarchical cache simulator library.
//!
//! This crate replays memory access traces through a chain of set-associative,
//! write-back, write-allocate caches with the following:
//! 1. **Addressing:** Decomposition of 32-bit addresses into tag, index, and offset.
//! 2. **Cache levels:** Per-set LRU replacement, dirty tracking, eviction and refill.
//! 3. **Hierarchy:** Levels chained in front of main memory, with misses cascading downward.
//! 4. **Prefetch:** A pluggable prefetcher consulted by the top level.
//! 5. **Simulation:** Trace parsing, configuration, and statistics collection.

/// Cache levels, geometry, and replacement policies.
pub mod cache;
/// Common types (addresses, access types, errors).
pub mod common;
/// Simulator configuration (defaults, per-level structures, validation).
pub mod config;
/// Chain of cache levels in front of main memory.
pub mod hierarchy;
/// Prefetcher interface.
pub mod prefetch;
/// Simulation statistics collection and reporting.
pub mod stats;
/// Trace file parsing.
pub mod trace;

/// Single cache level; construct with `CacheLevel::new` from a `Geometry`.
pub use crate::cache::{CacheLevel, Geometry, NextLevel};
/// Access kinds and error types.
pub use crate::common::{AccessType, ConfigError, SimError, TraceError};
/// Root configuration type; use `Config::from_params` or deserialize from JSON.
pub use crate::config::Config;
/// Top-level simulator; construct with `CacheHierarchy::new`.
pub use crate::hierarchy::CacheHierarchy;
/// Counters snapshot types.
pub use crate::stats::{HierarchyStats, LevelStats};
/// Trace records and their reader.
pub use crate::trace::{TraceReader, TraceRecord};
