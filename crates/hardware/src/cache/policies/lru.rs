//! Least Recently Used (LRU) Replacement Policy.
//!
//! This policy evicts the way that has not been accessed for the longest time.
//! Each way carries a recency rank: `0` is the most recently used way and
//! `ways - 1` the least recently used. Within a set the ranks always form a
//! permutation of `0..ways`.
//!
//! Touching a way promotes it to rank `0` and ages only the ways that were more
//! recent than it, so the relative order of everything else is preserved.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `touch()`: O(W) where W is the number of ways (associativity)
//!   - `victim()`: O(W)
//! - **Space Complexity:** O(S × W) where S is the number of sets
//! - **Best Case:** Working sets that fit within a set's associativity
//! - **Worst Case:** Cyclic scans one block larger than the set (every access misses)

use super::ReplacementPolicy;

/// LRU Policy state.
#[derive(Clone, Debug)]
pub struct LruPolicy {
    /// Recency rank of every way, row-major by set.
    recency: Vec<u32>,
    ways: usize,
}

impl LruPolicy {
    /// Creates a new LRU policy instance.
    ///
    /// Way `w` starts with rank `w`. Any starting permutation is acceptable
    /// because all ways start invalid; this one makes the highest-numbered way
    /// the first victim.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets in the cache.
    /// * `ways` - The associativity (number of ways) of the cache.
    pub fn new(sets: usize, ways: usize) -> Self {
        let mut recency = Vec::with_capacity(sets * ways);
        for _ in 0..sets {
            recency.extend((0..ways).map(|w| w as u32));
        }
        Self { recency, ways }
    }

    /// Recency ranks of every way in `set`, indexed by way.
    pub fn recency(&self, set: usize) -> &[u32] {
        let base = set * self.ways;
        &self.recency[base..base + self.ways]
    }

    fn ranks_mut(&mut self, set: usize) -> &mut [u32] {
        let base = set * self.ways;
        &mut self.recency[base..base + self.ways]
    }
}

impl ReplacementPolicy for LruPolicy {
    /// Promotes `way` to most recently used.
    ///
    /// Every way strictly more recent than `way` ages by one; the others keep
    /// their rank.
    fn touch(&mut self, set: usize, way: usize) {
        let ranks = self.ranks_mut(set);
        let old = ranks[way];
        for rank in ranks.iter_mut() {
            if *rank < old {
                *rank += 1;
            }
        }
        ranks[way] = 0;
    }

    /// Returns the unique way holding rank `ways - 1`.
    fn victim(&self, set: usize) -> usize {
        let lru = (self.ways - 1) as u32;
        match self.recency(set).iter().position(|&rank| rank == lru) {
            Some(way) => way,
            None => panic!(
                "LRU state of set {set} is not a permutation: {:?}",
                self.recency(set)
            ),
        }
    }

    fn order(&self, set: usize) -> Vec<usize> {
        let ranks = self.recency(set);
        let mut ways: Vec<usize> = (0..self.ways).collect();
        ways.sort_by_key(|&w| ranks[w]);
        ways
    }
}
