//! Ring buffer and registry error types
//!
//! All failures are returned to the caller; nothing here retries or recovers.

use crate::config::SizeRule;
use thiserror::Error;

/// Instance registry errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Every slot holds a live instance
    #[error("Instance registry full: all {capacity} slots in use")]
    RegistryFull {
        /// Number of slots in the table
        capacity: usize,
    },

    /// Slot index outside the table
    #[error("Unknown registry slot: {index}")]
    UnknownSlot {
        /// Offending slot index
        index: usize,
    },

    /// Slot was released (and possibly reused) since the token was issued
    #[error("Stale registry slot: {index} (generation {generation})")]
    StaleSlot {
        /// Slot index carried by the token
        index: usize,
        /// Generation carried by the token
        generation: u32,
    },
}

/// Ring buffer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RingError {
    /// Record size rejected at bind time
    #[error("Invalid record size: {record_size} (rule: {rule})")]
    InvalidSize {
        /// Requested record size in bytes
        record_size: usize,
        /// Rule the size was checked against
        rule: SizeRule,
    },

    /// Backing memory shorter than `record_size * capacity`
    #[error("Backing memory too small: need {required} bytes, got {actual}")]
    MemoryTooSmall {
        /// Bytes needed for the configured capacity
        required: usize,
        /// Bytes supplied by the caller
        actual: usize,
    },

    /// Insert on a saturated buffer
    #[error("Ring buffer full")]
    Full,

    /// Remove or peek on an empty buffer
    #[error("Ring buffer empty")]
    Empty,

    /// Record or output slice does not match the record size
    #[error("Record length mismatch: expected {expected} bytes, got {actual}")]
    RecordLength {
        /// Configured record size
        expected: usize,
        /// Length of the slice passed in
        actual: usize,
    },

    /// Registry refused to register or look up the instance
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Result type for ring buffer operations
pub type RingResult<T> = Result<T, RingError>;
