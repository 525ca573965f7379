//! Fixed-size event record encoding
//!
//! Layout (little-endian, 16 bytes):
//!
//! | Offset | Size | Field          |
//! |--------|------|----------------|
//! | 0      | 1    | level bit      |
//! | 1      | 1    | reserved (0)   |
//! | 2      | 2    | code           |
//! | 4      | 4    | sequence       |
//! | 8      | 4    | timestamp (ms) |
//! | 12     | 4    | payload        |

use crate::level::Level;
use crate::{EventError, EventResult};
use byteorder::{ByteOrder, LittleEndian};

/// Encoded size of one event
pub const EVENT_RECORD_SIZE: usize = 16;

/// One logged event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRecord {
    /// Severity
    pub level: Level,
    /// Application-defined event code
    pub code: u16,
    /// Position in the log, assigned when the event is stored
    pub sequence: u32,
    /// Milliseconds since an application-defined epoch
    pub timestamp_ms: u32,
    /// Application-defined value
    pub payload: u32,
}

impl EventRecord {
    /// Event with sequence 0
    #[must_use]
    pub const fn new(level: Level, code: u16, timestamp_ms: u32, payload: u32) -> Self {
        Self {
            level,
            code,
            sequence: 0,
            timestamp_ms,
            payload,
        }
    }

    /// Encode into the fixed wire layout
    #[must_use]
    pub fn encode(&self) -> [u8; EVENT_RECORD_SIZE] {
        let mut buf = [0u8; EVENT_RECORD_SIZE];
        buf[0] = self.level.bit();
        LittleEndian::write_u16(&mut buf[2..4], self.code);
        LittleEndian::write_u32(&mut buf[4..8], self.sequence);
        LittleEndian::write_u32(&mut buf[8..12], self.timestamp_ms);
        LittleEndian::write_u32(&mut buf[12..16], self.payload);
        buf
    }

    /// Decode from the fixed wire layout
    ///
    /// # Errors
    ///
    /// - `EventError::RecordLength` if `buf` is not 16 bytes
    /// - `EventError::UnknownLevel` if the level byte is not a single known bit
    pub fn decode(buf: &[u8]) -> EventResult<Self> {
        if buf.len() != EVENT_RECORD_SIZE {
            return Err(EventError::RecordLength {
                expected: EVENT_RECORD_SIZE,
                actual: buf.len(),
            });
        }

        let level = Level::from_bit(buf[0]).ok_or(EventError::UnknownLevel { bits: buf[0] })?;
        Ok(Self {
            level,
            code: LittleEndian::read_u16(&buf[2..4]),
            sequence: LittleEndian::read_u32(&buf[4..8]),
            timestamp_ms: LittleEndian::read_u32(&buf[8..12]),
            payload: LittleEndian::read_u32(&buf[12..16]),
        })
    }
}
