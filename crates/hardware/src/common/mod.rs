//! Common types shared across the simulator.
//!
//! 1. **Address Layout:** Tag/index/offset decomposition and block address rebuild.
//! 2. **Memory Access:** The read/write classification used by traces and levels.
//! 3. **Error Handling:** Configuration, trace, and run-level error types.

/// Address decomposition (tag, index, offset).
pub mod addr;

/// Memory access type definitions.
pub mod data;

/// Error types.
pub mod error;

pub use addr::{ADDRESS_WIDTH, AddressLayout};
pub use data::AccessType;
pub use error::{ConfigError, SimError, TraceError};
