//! Prefetcher interface.
//!
//! A cache level consults its prefetcher after every demand access. The
//! prefetcher returns block addresses it would like fetched ahead of demand;
//! the level forwards each one that it does not already hold to the next level
//! (or to memory) as a read and counts it as a prefetch.
//!
//! Only the no-op prefetcher is modeled. A stream-buffer configuration
//! (`PREF_N` buffers of `PREF_M` blocks) is accepted so that configurations
//! carrying it still run, but its allocation and replacement rules are not
//! simulated.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// Trait for cache prefetcher implementations.
pub trait Prefetcher: Debug + Send + Sync {
    /// Observes a demand access and returns block addresses to prefetch.
    ///
    /// # Arguments
    ///
    /// * `block_addr` - Block-aligned address of the demand access.
    /// * `hit` - Whether the demand access hit in the level.
    fn observe(&mut self, block_addr: u32, hit: bool) -> Vec<u32>;
}

/// Prefetcher that never prefetches.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPrefetcher;

impl Prefetcher for NoPrefetcher {
    fn observe(&mut self, _block_addr: u32, _hit: bool) -> Vec<u32> {
        Vec::new()
    }
}

/// Prefetch policy selected by the configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrefetchPolicy {
    /// No prefetching.
    #[default]
    None,
    /// `buffers` stream buffers, each holding `blocks` consecutive blocks.
    StreamBuffer {
        /// Number of stream buffers (`PREF_N`).
        buffers: u32,
        /// Blocks per stream buffer (`PREF_M`).
        blocks: u32,
    },
}

impl PrefetchPolicy {
    /// Selects a policy from the `PREF_N`/`PREF_M` pair. Zero in either disables prefetching.
    pub fn from_params(buffers: u32, blocks: u32) -> Self {
        if buffers == 0 || blocks == 0 {
            Self::None
        } else {
            Self::StreamBuffer { buffers, blocks }
        }
    }

    /// Builds the prefetcher attached to the top cache level.
    pub fn build(self) -> Box<dyn Prefetcher + Send + Sync> {
        match self {
            Self::None => Box::new(NoPrefetcher),
            Self::StreamBuffer { buffers, blocks } => {
                tracing::warn!(
                    buffers,
                    blocks,
                    "stream-buffer prefetching is not modeled; running without prefetch"
                );
                Box::new(NoPrefetcher)
            }
        }
    }
}
