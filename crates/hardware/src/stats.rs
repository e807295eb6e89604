//! Simulation statistics collection and reporting.
//!
//! This module tracks the counters of every cache level. It provides:
//! 1. **Per-level counters:** Reads, writes, their hits and misses, write-backs, prefetches.
//! 2. **Memory traffic:** Blocks moved to or from main memory, counted at the last level.
//! 3. **Reporting:** A read-only snapshot of the whole hierarchy, printable or serializable.

use std::fmt;

use serde::Serialize;

/// Counters owned by one cache level.
///
/// All counters are monotonically non-decreasing and are only mutated by the
/// owning level while it services a request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LevelStats {
    /// Read requests received (from the trace, or from an upper level's refills and prefetches).
    pub reads: u64,
    /// Reads that found their block resident.
    pub read_hits: u64,
    /// Reads that had to refill.
    pub read_misses: u64,
    /// Write requests received (from the trace or from an upper level's write-backs).
    pub writes: u64,
    /// Writes that found their block resident.
    pub write_hits: u64,
    /// Writes that had to refill.
    pub write_misses: u64,
    /// Dirty victims written back, whether to the next level or to memory.
    pub write_backs: u64,
    /// Blocks transferred to or from main memory. Non-zero only at the last level.
    pub memory_traffic: u64,
    /// Prefetch reads issued below this level.
    pub prefetches: u64,
}

impl LevelStats {
    /// Total demand accesses.
    pub fn accesses(&self) -> u64 {
        self.reads + self.writes
    }

    /// Total demand misses.
    pub fn misses(&self) -> u64 {
        self.read_misses + self.write_misses
    }

    /// Fraction of all demand accesses that missed; `0.0` with no accesses.
    pub fn miss_rate(&self) -> f64 {
        ratio(self.misses(), self.accesses())
    }

    /// Fraction of reads that missed; `0.0` with no reads.
    pub fn read_miss_rate(&self) -> f64 {
        ratio(self.read_misses, self.reads)
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Snapshot of every level's counters, top level first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HierarchyStats {
    /// Counters per level; index 0 is L1.
    pub levels: Vec<LevelStats>,
}

impl HierarchyStats {
    /// Counters of level `n` (1-based, as in `L1`).
    pub fn level(&self, n: usize) -> Option<&LevelStats> {
        n.checked_sub(1).and_then(|i| self.levels.get(i))
    }

    /// Blocks moved to or from main memory across the hierarchy.
    pub fn total_memory_traffic(&self) -> u64 {
        self.levels.iter().map(|l| l.memory_traffic).sum()
    }

    /// Serializes the snapshot as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error; the snapshot holds only integers, so this
    /// does not happen in practice.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Prints the measurements report to stdout.
    pub fn print(&self) {
        print!("{self}");
    }
}

impl fmt::Display for HierarchyStats {
    /// L1 reports its overall miss rate. Lower levels only see refills,
    /// prefetches and write-backs, so they report the read miss rate.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===== Measurements =====")?;
        for (i, s) in self.levels.iter().enumerate() {
            let name = format!("L{}", i + 1);
            let miss_rate = if i == 0 {
                s.miss_rate()
            } else {
                s.read_miss_rate()
            };
            writeln!(f, "{:<30}{}", format!("{name} reads:"), s.reads)?;
            writeln!(f, "{:<30}{}", format!("{name} read misses:"), s.read_misses)?;
            writeln!(f, "{:<30}{}", format!("{name} writes:"), s.writes)?;
            writeln!(f, "{:<30}{}", format!("{name} write misses:"), s.write_misses)?;
            writeln!(f, "{:<30}{:.4}", format!("{name} miss rate:"), miss_rate)?;
            writeln!(f, "{:<30}{}", format!("{name} writebacks:"), s.write_backs)?;
            writeln!(f, "{:<30}{}", format!("{name} prefetches:"), s.prefetches)?;
        }
        writeln!(
            f,
            "{:<30}{}",
            "memory traffic:",
            self.total_memory_traffic()
        )
    }
}
