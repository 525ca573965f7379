//! Diagnostic snapshot of a ring buffer
//!
//! The text layout is for humans only: one line per field, one line of hex
//! per stored record, oldest first.

use crate::ring::Records;
use std::fmt;

/// Point-in-time view of a buffer's identity, cursors and contents
#[derive(Debug, Clone)]
pub struct RingDump<'r> {
    /// Registered module name
    pub name: &'static str,
    /// Registered instance id
    pub id: u8,
    /// Next write offset
    pub head: usize,
    /// Next read offset
    pub tail: usize,
    /// Stored record count
    pub count: usize,
    /// Stored records, oldest first
    pub records: Records<'r>,
}

impl fmt::Display for RingDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "+++ Dumping data of {} with ID {} +++", self.name, self.id)?;
        writeln!(f, "Head    -> {}", self.head)?;
        writeln!(f, "Tail    -> {}", self.tail)?;
        writeln!(f, "Entries -> {}", self.count)?;

        for (i, record) in self.records.clone().enumerate() {
            write!(f, "Data {i:>3} ->")?;
            for byte in record {
                write!(f, " {byte:02x}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
