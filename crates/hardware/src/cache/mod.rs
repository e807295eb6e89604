//! Set-Associative Cache Level.
//!
//! This module implements one level of a write-back, write-allocate cache.
//! Each request runs the same protocol:
//!
//! ```text
//! Lookup ─┬─ Hit  ─> touch way ─> (write: set dirty) ─> done
//!         └─ Miss ─> pick LRU victim ─> evict (write back if dirty)
//!                    ─> refill (read from below) ─> (write: set dirty) ─> done
//! ```
//!
//! A level never owns the level below it. Evictions and refills are handed to a
//! [`NextLevel`] supplied per request, which runs the very same protocol one
//! level down. When no next level is supplied the level sits directly on main
//! memory and counts memory traffic itself.

/// Cache replacement policy implementations.
pub mod policies;

use tracing::trace;

use self::policies::{LruPolicy, ReplacementPolicy};
use crate::common::{AccessType, AddressLayout, ConfigError};
use crate::prefetch::{NoPrefetcher, Prefetcher};
use crate::stats::LevelStats;

/// The level below a cache, as seen by the cache above it.
///
/// Refills arrive as reads and write-backs as writes, both with block-aligned
/// addresses.
pub trait NextLevel {
    /// Services a refill of the block at `addr`.
    fn read(&mut self, addr: u32);

    /// Accepts a written-back block at `addr`.
    fn write(&mut self, addr: u32);
}

/// Fixed shape of a cache level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    num_sets: u32,
    assoc: u32,
    block_size: u32,
    layout: AddressLayout,
}

impl Geometry {
    /// Creates a geometry from an explicit set count.
    ///
    /// # Arguments
    ///
    /// * `level` - 1-based level number, used in error messages.
    /// * `num_sets` - Number of sets; must be a power of two.
    /// * `assoc` - Ways per set; must be non-zero.
    /// * `block_size` - Bytes per block; must be a power of two.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first rule the shape breaks.
    pub fn new(
        level: usize,
        num_sets: u32,
        assoc: u32,
        block_size: u32,
    ) -> Result<Self, ConfigError> {
        if !block_size.is_power_of_two() {
            return Err(ConfigError::BlockSize(block_size));
        }
        if assoc == 0 {
            return Err(ConfigError::ZeroAssociativity { level });
        }
        if !num_sets.is_power_of_two() {
            return Err(ConfigError::SetCount {
                level,
                sets: u64::from(num_sets),
            });
        }
        let layout = AddressLayout::for_geometry(block_size, num_sets).ok_or(
            ConfigError::AddressWidth {
                level,
                index_bits: num_sets.trailing_zeros(),
                offset_bits: block_size.trailing_zeros(),
            },
        )?;
        Ok(Self {
            num_sets,
            assoc,
            block_size,
            layout,
        })
    }

    /// Derives the set count from a total size: `size / (block_size * assoc)`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the block size or associativity is invalid,
    /// if `size` is not a positive whole number of sets, or if the resulting
    /// set count is not a power of two.
    pub fn from_size(
        level: usize,
        size: u32,
        block_size: u32,
        assoc: u32,
    ) -> Result<Self, ConfigError> {
        if !block_size.is_power_of_two() {
            return Err(ConfigError::BlockSize(block_size));
        }
        if assoc == 0 {
            return Err(ConfigError::ZeroAssociativity { level });
        }
        let set_bytes = u64::from(block_size) * u64::from(assoc);
        let size64 = u64::from(size);
        if size == 0 || size64 % set_bytes != 0 {
            return Err(ConfigError::IndivisibleSize {
                level,
                size,
                block_size,
                assoc,
            });
        }
        let sets = size64 / set_bytes;
        if !sets.is_power_of_two() {
            return Err(ConfigError::SetCount { level, sets });
        }
        Self::new(level, sets as u32, assoc, block_size)
    }

    /// Number of sets.
    pub fn num_sets(&self) -> u32 {
        self.num_sets
    }

    /// Ways per set.
    pub fn assoc(&self) -> u32 {
        self.assoc
    }

    /// Bytes per block.
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Total capacity in bytes.
    pub fn size(&self) -> u64 {
        u64::from(self.num_sets) * u64::from(self.assoc) * u64::from(self.block_size)
    }

    /// Address decomposition for this geometry.
    pub fn layout(&self) -> &AddressLayout {
        &self.layout
    }
}

/// One way of one set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheLine {
    /// Stored tag; meaningful only when `valid`.
    pub tag: u32,
    /// The way holds a block.
    pub valid: bool,
    /// The block differs from the copy below and must be written back before reuse.
    pub dirty: bool,
}

/// A single set-associative, write-back cache level.
#[derive(Debug)]
pub struct CacheLevel {
    name: String,
    geometry: Geometry,
    lines: Vec<CacheLine>,
    policy: Box<dyn ReplacementPolicy + Send + Sync>,
    prefetcher: Box<dyn Prefetcher + Send + Sync>,
    stats: LevelStats,
}

impl CacheLevel {
    /// Creates an empty level: every way invalid and clean, LRU replacement,
    /// no prefetching.
    pub fn new(name: impl Into<String>, geometry: Geometry) -> Self {
        let sets = geometry.num_sets as usize;
        let ways = geometry.assoc as usize;
        Self {
            name: name.into(),
            geometry,
            lines: vec![CacheLine::default(); sets * ways],
            policy: Box::new(LruPolicy::new(sets, ways)),
            prefetcher: Box::new(NoPrefetcher),
            stats: LevelStats::default(),
        }
    }

    /// Replaces the prefetcher consulted after each demand access.
    pub fn set_prefetcher(&mut self, prefetcher: Box<dyn Prefetcher + Send + Sync>) {
        self.prefetcher = prefetcher;
    }

    /// Level name, e.g. `L1`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shape of this level.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Snapshot of this level's counters.
    pub fn stats(&self) -> LevelStats {
        self.stats
    }

    /// Services a read of `addr`.
    pub fn read(&mut self, addr: u32, next: Option<&mut dyn NextLevel>) {
        self.access(AccessType::Read, addr, next);
    }

    /// Services a write of `addr`.
    pub fn write(&mut self, addr: u32, next: Option<&mut dyn NextLevel>) {
        self.access(AccessType::Write, addr, next);
    }

    /// Services one request, cascading any eviction, refill, or prefetch to
    /// `next` (or to memory when `next` is `None`).
    ///
    /// All of this level's state changes happen before anything is forwarded.
    /// Forwarded requests go out in protocol order: write-back, then refill,
    /// then prefetches.
    pub fn access(&mut self, op: AccessType, addr: u32, next: Option<&mut dyn NextLevel>) {
        let layout = self.geometry.layout;
        let set = layout.index(addr) as usize;
        let tag = layout.tag(addr);
        let mut downstream: Vec<(AccessType, u32)> = Vec::new();

        let hit = match self.lookup(set, tag) {
            Some(way) => {
                self.count(op, true);
                self.policy.touch(set, way);
                if op == AccessType::Write {
                    let slot = self.slot(set, way);
                    self.lines[slot].dirty = true;
                }
                true
            }
            None => {
                self.count(op, false);
                let way = self.policy.victim(set);
                trace!(level = %self.name, %op, addr = format_args!("{addr:#010x}"), set, way, "miss");
                if let Some(victim) = self.evict(set, way) {
                    downstream.push((AccessType::Write, victim));
                }
                downstream.push((AccessType::Read, self.refill(set, way, tag)));
                if op == AccessType::Write {
                    let slot = self.slot(set, way);
                    self.lines[slot].dirty = true;
                }
                false
            }
        };

        for target in self.prefetcher.observe(layout.block_align(addr), hit) {
            let target = layout.block_align(target);
            let queued = downstream.contains(&(AccessType::Read, target));
            if !queued && !self.contains(target) {
                self.stats.prefetches += 1;
                downstream.push((AccessType::Read, target));
            }
        }

        self.forward(&downstream, next);
    }

    /// Returns `true` if the block containing `addr` is resident.
    pub fn contains(&self, addr: u32) -> bool {
        let layout = self.geometry.layout;
        self.lookup(layout.index(addr) as usize, layout.tag(addr))
            .is_some()
    }

    /// State of one way, or `None` if `set`/`way` is out of range.
    pub fn line(&self, set: usize, way: usize) -> Option<CacheLine> {
        if set >= self.geometry.num_sets as usize || way >= self.geometry.assoc as usize {
            return None;
        }
        Some(self.lines[self.slot(set, way)])
    }

    /// Ways of `set` from most to least recently used.
    pub fn recency_order(&self, set: usize) -> Vec<usize> {
        self.policy.order(set)
    }

    /// Valid lines of every set, each set ordered from most to least recently used.
    pub fn contents(&self) -> Vec<Vec<CacheLine>> {
        (0..self.geometry.num_sets as usize)
            .map(|set| {
                self.policy
                    .order(set)
                    .into_iter()
                    .map(|way| self.lines[self.slot(set, way)])
                    .filter(|line| line.valid)
                    .collect()
            })
            .collect()
    }

    #[inline(always)]
    fn slot(&self, set: usize, way: usize) -> usize {
        set * self.geometry.assoc as usize + way
    }

    /// Finds the way holding `tag` in `set`.
    ///
    /// # Panics
    ///
    /// Panics if two valid ways hold the same tag.
    fn lookup(&self, set: usize, tag: u32) -> Option<usize> {
        let base = self.slot(set, 0);
        let ways = &self.lines[base..base + self.geometry.assoc as usize];
        let mut found = None;
        for (way, line) in ways.iter().enumerate() {
            if line.valid && line.tag == tag {
                assert!(
                    found.is_none(),
                    "{}: set {set} holds tag {tag:#x} in more than one way",
                    self.name
                );
                found = Some(way);
            }
        }
        found
    }

    fn count(&mut self, op: AccessType, hit: bool) {
        let s = &mut self.stats;
        match (op, hit) {
            (AccessType::Read, true) => {
                s.reads += 1;
                s.read_hits += 1;
            }
            (AccessType::Read, false) => {
                s.reads += 1;
                s.read_misses += 1;
            }
            (AccessType::Write, true) => {
                s.writes += 1;
                s.write_hits += 1;
            }
            (AccessType::Write, false) => {
                s.writes += 1;
                s.write_misses += 1;
            }
        }
    }

    /// Releases the victim way. Returns the block address to write back if the
    /// victim was valid and dirty.
    fn evict(&mut self, set: usize, way: usize) -> Option<u32> {
        let line = self.lines[self.slot(set, way)];
        if !(line.valid && line.dirty) {
            return None;
        }
        self.stats.write_backs += 1;
        let addr = self.geometry.layout.block_address(line.tag, set as u32);
        trace!(level = %self.name, addr = format_args!("{addr:#010x}"), "write-back");
        Some(addr)
    }

    /// Installs `tag` in the victim way as a clean, most recently used block.
    /// Returns the block address to fetch from below.
    fn refill(&mut self, set: usize, way: usize, tag: u32) -> u32 {
        let slot = self.slot(set, way);
        self.lines[slot] = CacheLine {
            tag,
            valid: true,
            dirty: false,
        };
        self.policy.touch(set, way);
        let addr = self.geometry.layout.block_address(tag, set as u32);
        trace!(level = %self.name, addr = format_args!("{addr:#010x}"), set, way, "refill");
        addr
    }

    fn forward(&mut self, requests: &[(AccessType, u32)], next: Option<&mut dyn NextLevel>) {
        match next {
            Some(next) => {
                for &(op, addr) in requests {
                    match op {
                        AccessType::Read => next.read(addr),
                        AccessType::Write => next.write(addr),
                    }
                }
            }
            None => self.stats.memory_traffic += requests.len() as u64,
        }
    }
}
