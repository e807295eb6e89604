//! Error definitions.
//!
//! Every error here is terminal for a run: the simulator is a deterministic
//! offline replay and nothing is retried.
//! 1. **Configuration:** Bad geometry or an unreadable config file. Raised before
//!    any level is built.
//! 2. **Trace:** An unreadable, unparseable, or unknown record. Raised at the
//!    offending line.
//! 3. **Simulation:** The union of the two, returned by top-level drivers.
//!
//! Broken internal invariants (no LRU victim, two ways matching one tag) are not
//! represented here; they panic.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Invalid cache configuration.
///
/// Levels are numbered from 1 (`L1` is closest to the requester).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The hierarchy has no levels.
    #[error("at least one cache level must be configured")]
    NoLevels,

    /// Block size is zero or not a power of two.
    #[error("block size must be a non-zero power of two, got {0}")]
    BlockSize(u32),

    /// A level has zero ways.
    #[error("L{level}: associativity must be at least 1")]
    ZeroAssociativity {
        /// Offending level.
        level: usize,
    },

    /// Size is zero or not a whole number of sets.
    #[error("L{level}: size {size} is not a positive multiple of block size {block_size} x associativity {assoc}")]
    IndivisibleSize {
        /// Offending level.
        level: usize,
        /// Configured size in bytes.
        size: u32,
        /// Block size in bytes.
        block_size: u32,
        /// Configured associativity.
        assoc: u32,
    },

    /// Derived set count is not a power of two.
    #[error("L{level}: number of sets ({sets}) must be a power of two")]
    SetCount {
        /// Offending level.
        level: usize,
        /// Derived set count.
        sets: u64,
    },

    /// Index and offset fields do not fit in a 32-bit address.
    #[error("L{level}: {index_bits} index bits + {offset_bits} offset bits exceed a 32-bit address")]
    AddressWidth {
        /// Offending level.
        level: usize,
        /// Set-index width.
        index_bits: u32,
        /// Block-offset width.
        offset_bits: u32,
    },

    /// The configuration file could not be read.
    #[error("failed to read configuration {}: {source}", path.display())]
    Io {
        /// File that failed to open or read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration JSON is malformed.
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Invalid or unreadable trace input.
///
/// Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The trace could not be opened or read.
    #[error("failed to read trace: {0}")]
    Io(#[from] io::Error),

    /// A record does not have the `<op> <address>` shape.
    #[error("line {line}: malformed trace record {text:?}")]
    Malformed {
        /// Offending line.
        line: usize,
        /// Raw line contents.
        text: String,
    },

    /// The operation is neither `r` nor `w`.
    #[error("line {line}: unknown request type {op:?}")]
    UnknownOp {
        /// Offending line.
        line: usize,
        /// The operation token as written.
        op: String,
    },

    /// The address is not a 32-bit hexadecimal number.
    #[error("line {line}: invalid address {text:?}")]
    BadAddress {
        /// Offending line.
        line: usize,
        /// The address token as written.
        text: String,
    },
}

impl TraceError {
    /// Line number of the offending record, if the error is tied to one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Io(_) => None,
            Self::Malformed { line, .. }
            | Self::UnknownOp { line, .. }
            | Self::BadAddress { line, .. } => Some(*line),
        }
    }
}

/// Any error that ends a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    /// Configuration rejected before the run started.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Replay stopped at a bad trace record.
    #[error(transparent)]
    Trace(#[from] TraceError),

    /// Statistics could not be serialized.
    #[error("failed to serialize statistics: {0}")]
    Report(#[source] serde_json::Error),
}
