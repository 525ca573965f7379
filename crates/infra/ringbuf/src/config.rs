//! Ring buffer configuration
//!
//! Capacity is fixed at compile time; record size, instance id and the
//! size-validation rule are chosen per buffer at bind time.

use crate::error::{RingError, RingResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Capacity of the default profile
pub const SMALL_CAPACITY: usize = 64;

/// Capacity of the `big-mem` profile
pub const BIG_CAPACITY: usize = 1024;

/// Records per buffer unless a capacity is given explicitly
#[cfg(feature = "big-mem")]
pub const DEFAULT_CAPACITY: usize = BIG_CAPACITY;

/// Records per buffer unless a capacity is given explicitly
#[cfg(not(feature = "big-mem"))]
pub const DEFAULT_CAPACITY: usize = SMALL_CAPACITY;

/// Record size used by `RingConfig::default()`
pub const DEFAULT_RECORD_SIZE: usize = 32;

/// Name every ring buffer registers under
pub const RING_MODULE_NAME: &str = "RING_BUFFER";

/// Which record sizes `bind` accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeRule {
    /// Non-zero powers of two only
    #[default]
    PowerOfTwo,
    /// Any non-zero size
    Any,
}

impl SizeRule {
    /// Check a record size against this rule
    #[must_use]
    pub const fn accepts(self, record_size: usize) -> bool {
        match self {
            Self::PowerOfTwo => record_size.is_power_of_two(),
            Self::Any => record_size > 0,
        }
    }
}

impl fmt::Display for SizeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PowerOfTwo => write!(f, "power of two"),
            Self::Any => write!(f, "non-zero"),
        }
    }
}

/// Per-buffer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    /// Bytes per record, fixed for the buffer's lifetime
    pub record_size: usize,

    /// Diagnostic id reported next to the module name
    pub instance_id: u8,

    /// Record size validation
    pub size_rule: SizeRule,
}

impl RingConfig {
    /// Configuration with the default size rule
    #[must_use]
    pub const fn new(record_size: usize, instance_id: u8) -> Self {
        Self {
            record_size,
            instance_id,
            size_rule: SizeRule::PowerOfTwo,
        }
    }

    /// Replace the size rule
    #[must_use]
    pub const fn with_size_rule(mut self, size_rule: SizeRule) -> Self {
        self.size_rule = size_rule;
        self
    }

    /// Check the record size against the configured rule
    ///
    /// # Errors
    ///
    /// Returns `RingError::InvalidSize` if the rule rejects `record_size`.
    pub const fn validate(&self) -> RingResult<()> {
        if self.size_rule.accepts(self.record_size) {
            Ok(())
        } else {
            Err(RingError::InvalidSize {
                record_size: self.record_size,
                rule: self.size_rule,
            })
        }
    }

    /// Backing memory needed for `capacity` records, `None` on overflow
    #[must_use]
    pub const fn bytes_required(&self, capacity: usize) -> Option<usize> {
        self.record_size.checked_mul(capacity)
    }
}

impl Default for RingConfig {
    fn default() -> Self {
        Self::new(DEFAULT_RECORD_SIZE, 0)
    }
}
