//! Memory Access Types.
//!
//! This module defines the classification of requests flowing through the cache
//! hierarchy. The same type is used for:
//! 1. **Trace Records:** Each line of a trace is either a read or a write.
//! 2. **Inter-level Traffic:** Refills travel downward as reads, write-backs as writes.
//! 3. **Statistics Tracking:** Counters are split by access type at every level.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Type of memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessType {
    /// Data read access.
    ///
    /// Issued by the trace for loads and by an upper level when it refills a block.
    Read,

    /// Data write access.
    ///
    /// Issued by the trace for stores and by an upper level when it writes back
    /// a dirty victim.
    Write,
}

impl AccessType {
    /// Returns the single-character trace mnemonic (`r` or `w`).
    pub fn mnemonic(self) -> char {
        match self {
            Self::Read => 'r',
            Self::Write => 'w',
        }
    }

    /// Parses a trace mnemonic. Both cases are accepted.
    pub fn from_mnemonic(c: char) -> Option<Self> {
        match c {
            'r' | 'R' => Some(Self::Read),
            'w' | 'W' => Some(Self::Write),
            _ => None,
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("read"),
            Self::Write => f.write_str("write"),
        }
    }
}
