//! Cache Replacement Policies.
//!
//! Implements the algorithm that selects a victim way when a set must make room
//! for a refill.
//!
//! # Policies
//!
//! - `Lru`: Least Recently Used, tracked with per-way recency ranks.

/// Least Recently Used replacement policy.
pub mod lru;

use std::fmt::Debug;

pub use lru::LruPolicy;

/// Trait for cache replacement policies.
///
/// Defines the interface for updating usage state and selecting victim ways.
/// A policy is called on every hit (the hit way) and on every refill (the newly
/// filled way), never on a miss before eviction.
pub trait ReplacementPolicy: Debug + Send + Sync {
    /// Marks `way` in `set` as the most recently used.
    fn touch(&mut self, set: usize, way: usize);

    /// Selects the way to evict from `set`.
    ///
    /// # Panics
    ///
    /// Implementations panic if their per-set state no longer identifies a
    /// unique victim; that indicates a broken internal invariant.
    fn victim(&self, set: usize) -> usize;

    /// Returns the ways of `set` ordered from most to least recently used.
    fn order(&self, set: usize) -> Vec<usize>;
}
