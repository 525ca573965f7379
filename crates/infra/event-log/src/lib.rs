//! Event log queued in a fixed-capacity ring buffer
//!
//! Events are 16-byte records with a severity level, an event code, a
//! sequence number, a millisecond timestamp and a 32-bit payload. A level
//! mask drops unwanted severities before they take up a slot.

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]
#![deny(missing_docs)]
#![forbid(unsafe_code)]

pub mod level;
pub mod log;
pub mod record;

pub use level::{Level, LevelMask};
pub use log::EventLog;
pub use record::{EVENT_RECORD_SIZE, EventRecord};

use ringbuf::RingError;
use thiserror::Error;

/// Event log errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EventError {
    /// Underlying ring buffer rejected the operation
    #[error(transparent)]
    Ring(#[from] RingError),

    /// Level byte does not name a single known level
    #[error("Unknown event level bits: {bits:#04x}")]
    UnknownLevel {
        /// Raw level byte
        bits: u8,
    },

    /// Encoded record has the wrong length
    #[error("Event record length {actual}, expected {expected}")]
    RecordLength {
        /// Required length
        expected: usize,
        /// Length supplied
        actual: usize,
    },
}

/// Result type for event log operations
pub type EventResult<T> = Result<T, EventError>;
