//! Event severity levels and level masks

use std::fmt;

/// Event severity, one bit each so levels combine into a mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Level {
    /// Normal operation
    Info = 0x01,
    /// Unexpected but recoverable
    Warn = 0x02,
    /// Unrecoverable
    Fatal = 0x04,
    /// Developer detail
    Debug = 0x08,
    /// Fine-grained tracing
    Trace = 0x10,
}

impl Level {
    /// All levels, lowest bit first
    pub const ALL: [Self; 5] = [Self::Info, Self::Warn, Self::Fatal, Self::Debug, Self::Trace];

    /// Bit assigned to this level
    #[must_use]
    pub const fn bit(self) -> u8 {
        self as u8
    }

    /// Level for a single bit, `None` for anything else
    #[must_use]
    pub const fn from_bit(bits: u8) -> Option<Self> {
        match bits {
            0x01 => Some(Self::Info),
            0x02 => Some(Self::Warn),
            0x04 => Some(Self::Fatal),
            0x08 => Some(Self::Debug),
            0x10 => Some(Self::Trace),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Fatal => "FATAL",
            Self::Debug => "DEBUG",
            Self::Trace => "TRACE",
        };
        f.write_str(name)
    }
}

/// Set of accepted levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LevelMask(u8);

impl LevelMask {
    /// Accept nothing
    pub const NONE: Self = Self(0);

    /// Accept every level
    pub const ALL: Self = Self(0x1F);

    /// Mask from raw bits; unknown bits are dropped
    #[must_use]
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Raw bits
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// `true` if `level` passes the mask
    #[must_use]
    pub const fn contains(self, level: Level) -> bool {
        self.0 & level.bit() != 0
    }

    /// Mask with `level` added
    #[must_use]
    pub const fn with(self, level: Level) -> Self {
        Self(self.0 | level.bit())
    }

    /// Mask with `level` removed
    #[must_use]
    pub const fn without(self, level: Level) -> Self {
        Self(self.0 & !level.bit())
    }
}

impl Default for LevelMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl From<Level> for LevelMask {
    fn from(level: Level) -> Self {
        Self(level.bit())
    }
}
