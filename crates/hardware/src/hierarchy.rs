//! Cache hierarchy.
//!
//! Levels are stored top (L1) first. The level below level `i` is level `i + 1`;
//! the last level sits on main memory. A request enters at L1 and cascades
//! downward only through misses: a refill becomes a read one level down and a
//! dirty eviction becomes a write one level down.

use tracing::debug;

use crate::cache::{CacheLevel, NextLevel};
use crate::common::{AccessType, ConfigError, TraceError};
use crate::config::Config;
use crate::stats::HierarchyStats;
use crate::trace::TraceRecord;

/// An ordered chain of cache levels in front of main memory.
#[derive(Debug)]
pub struct CacheHierarchy {
    levels: Vec<CacheLevel>,
}

impl CacheHierarchy {
    /// Builds a hierarchy from a configuration.
    ///
    /// The configured prefetch policy is attached to L1.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found by [`Config::validate`].
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let mut levels: Vec<CacheLevel> = config
            .validate()?
            .into_iter()
            .enumerate()
            .map(|(i, geometry)| {
                debug!(
                    level = i + 1,
                    sets = geometry.num_sets(),
                    assoc = geometry.assoc(),
                    block_size = geometry.block_size(),
                    tag_bits = geometry.layout().tag_bits(),
                    index_bits = geometry.layout().index_bits(),
                    offset_bits = geometry.layout().offset_bits(),
                    "configured cache level"
                );
                CacheLevel::new(format!("L{}", i + 1), geometry)
            })
            .collect();
        if let Some(top) = levels.first_mut() {
            top.set_prefetcher(config.prefetch.policy().build());
        }
        Ok(Self { levels })
    }

    /// Builds a hierarchy from prepared levels, top first.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoLevels`] if `levels` is empty.
    pub fn from_levels(levels: Vec<CacheLevel>) -> Result<Self, ConfigError> {
        if levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        Ok(Self { levels })
    }

    /// Number of levels.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// All levels, top first.
    pub fn levels(&self) -> &[CacheLevel] {
        &self.levels
    }

    /// Level `n` (1-based, as in `L1`).
    pub fn level(&self, n: usize) -> Option<&CacheLevel> {
        n.checked_sub(1).and_then(|i| self.levels.get(i))
    }

    /// Issues a read at the top level.
    pub fn read(&mut self, addr: u32) {
        self.access(AccessType::Read, addr);
    }

    /// Issues a write at the top level.
    pub fn write(&mut self, addr: u32) {
        self.access(AccessType::Write, addr);
    }

    /// Issues one request at the top level and runs it to completion.
    pub fn access(&mut self, op: AccessType, addr: u32) {
        dispatch(&mut self.levels, op, addr);
    }

    /// Replays trace records in order. Returns the number of records applied.
    ///
    /// # Errors
    ///
    /// Stops at the first failed record and returns its error. Records before
    /// it have already been applied.
    pub fn replay<I>(&mut self, records: I) -> Result<u64, TraceError>
    where
        I: IntoIterator<Item = Result<TraceRecord, TraceError>>,
    {
        let mut applied = 0;
        for record in records {
            let TraceRecord { op, addr } = record?;
            self.access(op, addr);
            applied += 1;
        }
        debug!(records = applied, "trace replay complete");
        Ok(applied)
    }

    /// Snapshot of every level's counters.
    pub fn stats(&self) -> HierarchyStats {
        HierarchyStats {
            levels: self.levels.iter().map(CacheLevel::stats).collect(),
        }
    }
}

/// Runs one request at the first of `levels`, with the rest as its next level.
fn dispatch(levels: &mut [CacheLevel], op: AccessType, addr: u32) {
    let Some((level, rest)) = levels.split_first_mut() else {
        return;
    };
    if rest.is_empty() {
        level.access(op, addr, None);
    } else {
        let mut chain = Chain(rest);
        let next: &mut dyn NextLevel = &mut chain;
        level.access(op, addr, Some(next));
    }
}

/// The levels below some level, viewed as its next level.
struct Chain<'a>(&'a mut [CacheLevel]);

impl NextLevel for Chain<'_> {
    fn read(&mut self, addr: u32) {
        dispatch(self.0, AccessType::Read, addr);
    }

    fn write(&mut self, addr: u32) {
        dispatch(self.0, AccessType::Write, addr);
    }
}
