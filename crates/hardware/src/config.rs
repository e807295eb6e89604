//! Configuration system for the cache simulator.
//!
//! This module defines the structures used to parameterize a cache hierarchy.
//! It provides:
//! 1. **Defaults:** Baseline block size and level shape.
//! 2. **Structures:** Block size, an ordered list of levels (L1 first), and prefetch parameters.
//! 3. **Validation:** Conversion of every level into a checked [`Geometry`].
//!
//! Configuration comes either from the classic positional parameters
//! (`BLOCKSIZE L1_SIZE L1_ASSOC L2_SIZE L2_ASSOC PREF_N PREF_M`) through
//! [`Config::from_params`], or from JSON describing any number of levels.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cache::Geometry;
use crate::common::ConfigError;
use crate::prefetch::PrefetchPolicy;

/// Default configuration constants.
mod defaults {
    /// Default block size in bytes.
    pub const BLOCK_SIZE: u32 = 32;

    /// Default level size in bytes (1 KiB).
    pub const CACHE_SIZE: u32 = 1024;

    /// Default associativity (1 way = direct-mapped).
    pub const CACHE_ASSOC: u32 = 1;
}

/// Root configuration structure.
///
/// # Examples
///
/// Deserializing a three-level hierarchy from JSON:
///
/// ```
/// use cachesim_core::config::Config;
///
/// let json = r#"{
///     "block_size": 64,
///     "levels": [
///         { "size_bytes": 32768, "assoc": 8 },
///         { "size_bytes": 262144, "assoc": 8 },
///         { "size_bytes": 2097152, "assoc": 16 }
///     ]
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.levels.len(), 3);
/// assert_eq!(config.prefetch.buffers, 0);
///
/// let geometries = config.validate().unwrap();
/// assert_eq!(geometries[0].num_sets(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Block size in bytes, shared by every level.
    #[serde(default = "Config::default_block_size")]
    pub block_size: u32,

    /// Levels ordered from the requester toward memory.
    #[serde(default = "Config::default_levels")]
    pub levels: Vec<CacheConfig>,

    /// Prefetch parameters.
    #[serde(default)]
    pub prefetch: PrefetchConfig,
}

impl Config {
    fn default_block_size() -> u32 {
        defaults::BLOCK_SIZE
    }

    fn default_levels() -> Vec<CacheConfig> {
        vec![CacheConfig::default()]
    }

    /// Builds the classic one- or two-level configuration.
    ///
    /// An `l2_size` of zero means no L2.
    pub fn from_params(
        block_size: u32,
        l1_size: u32,
        l1_assoc: u32,
        l2_size: u32,
        l2_assoc: u32,
        pref_n: u32,
        pref_m: u32,
    ) -> Self {
        let mut levels = vec![CacheConfig {
            size_bytes: l1_size,
            assoc: l1_assoc,
        }];
        if l2_size != 0 {
            levels.push(CacheConfig {
                size_bytes: l2_size,
                assoc: l2_assoc,
            });
        }
        Self {
            block_size,
            levels,
            prefetch: PrefetchConfig {
                buffers: pref_n,
                blocks: pref_m,
            },
        }
    }

    /// Parses a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the text is not a valid configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Json`] if it cannot be parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Checks every level and returns their geometries, L1 first.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found, checking the block size before
    /// any level and levels in order.
    pub fn validate(&self) -> Result<Vec<Geometry>, ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        if !self.block_size.is_power_of_two() {
            return Err(ConfigError::BlockSize(self.block_size));
        }
        self.levels
            .iter()
            .enumerate()
            .map(|(i, level)| {
                Geometry::from_size(i + 1, level.size_bytes, self.block_size, level.assoc)
            })
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            block_size: defaults::BLOCK_SIZE,
            levels: Self::default_levels(),
            prefetch: PrefetchConfig::default(),
        }
    }
}

impl fmt::Display for Config {
    /// Prints the simulator configuration banner.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===== Simulator configuration =====")?;
        writeln!(f, "{:<12}{}", "BLOCKSIZE:", self.block_size)?;
        for (i, level) in self.levels.iter().enumerate() {
            let n = i + 1;
            writeln!(f, "{:<12}{}", format!("L{n}_SIZE:"), level.size_bytes)?;
            writeln!(f, "{:<12}{}", format!("L{n}_ASSOC:"), level.assoc)?;
        }
        writeln!(f, "{:<12}{}", "PREF_N:", self.prefetch.buffers)?;
        writeln!(f, "{:<12}{}", "PREF_M:", self.prefetch.blocks)
    }
}

/// Individual cache level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Total size in bytes.
    #[serde(default = "CacheConfig::default_size")]
    pub size_bytes: u32,

    /// Associativity (ways per set).
    #[serde(default = "CacheConfig::default_assoc")]
    pub assoc: u32,
}

impl CacheConfig {
    fn default_size() -> u32 {
        defaults::CACHE_SIZE
    }

    fn default_assoc() -> u32 {
        defaults::CACHE_ASSOC
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            size_bytes: defaults::CACHE_SIZE,
            assoc: defaults::CACHE_ASSOC,
        }
    }
}

/// Prefetch parameters for the top level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefetchConfig {
    /// Number of stream buffers (`PREF_N`); zero disables prefetching.
    #[serde(default)]
    pub buffers: u32,

    /// Blocks per stream buffer (`PREF_M`).
    #[serde(default)]
    pub blocks: u32,
}

impl PrefetchConfig {
    /// Prefetch policy these parameters select.
    pub fn policy(&self) -> PrefetchPolicy {
        PrefetchPolicy::from_params(self.buffers, self.blocks)
    }
}
