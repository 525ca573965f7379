//! Ring buffer over caller-owned memory
//!
//! Properties:
//! - Zero allocations; the backing slice is borrowed for the buffer's lifetime
//! - Fixed-size records, FIFO order (oldest record is removed first)
//! - Byte cursors wrap at `record_size * CAPACITY`
//! - Count saturates at `CAPACITY`; inserting into a full buffer fails
//!   instead of overwriting
//!
//! Mutation needs `&mut self`, so one execution context owns the buffer at a
//! time. Sharing across threads means wrapping it in a lock.

use crate::config::{DEFAULT_CAPACITY, RING_MODULE_NAME, RingConfig};
use crate::dump::RingDump;
use crate::error::{RingError, RingResult};
use crate::registry::{self, InstanceRegistry, Slot};
use common::saturating;
use std::iter::FusedIterator;
use tracing::{debug, trace, warn};

/// Fixed-capacity ring buffer of `record_size`-byte records
///
/// Bound to its backing memory and to one registry slot. The slot is
/// released exactly once: by [`RingBuffer::release`], [`RingBuffer::into_memory`]
/// or on drop.
#[derive(Debug)]
pub struct RingBuffer<'a, const CAPACITY: usize = DEFAULT_CAPACITY> {
    /// Caller-owned storage, at least `span` bytes long
    memory: &'a mut [u8],
    record_size: usize,
    /// Bytes in use: `record_size * CAPACITY`
    span: usize,
    /// Next write offset
    head: usize,
    /// Next read offset
    tail: usize,
    count: usize,
    registry: &'a InstanceRegistry,
    slot: Slot,
    registered: bool,
}

impl<'a, const CAPACITY: usize> RingBuffer<'a, CAPACITY> {
    /// Bind a buffer to `memory` using the global registry
    ///
    /// Record sizes must be a power of two; use [`RingBuffer::bind_with`] with
    /// `SizeRule::Any` to accept other sizes.
    ///
    /// # Errors
    ///
    /// See [`RingBuffer::bind_with`].
    pub fn bind(memory: &'a mut [u8], record_size: usize, instance_id: u8) -> RingResult<Self> {
        Self::bind_with(
            memory,
            &RingConfig::new(record_size, instance_id),
            registry::global(),
        )
    }

    /// Bind a buffer to `memory` and register it in `registry`
    ///
    /// Zero-fills the first `record_size * CAPACITY` bytes of `memory`. On
    /// error the memory is untouched and nothing is registered.
    ///
    /// # Errors
    ///
    /// - `RingError::InvalidSize` if the size rule rejects the record size
    /// - `RingError::MemoryTooSmall` if `memory` cannot hold `CAPACITY` records
    /// - `RingError::Registry` if the registry has no free slot
    pub fn bind_with(
        memory: &'a mut [u8],
        config: &RingConfig,
        registry: &'a InstanceRegistry,
    ) -> RingResult<Self> {
        const { assert!(CAPACITY > 0, "ring buffer capacity must be non-zero") };

        config.validate()?;
        let span = config
            .bytes_required(CAPACITY)
            .ok_or(RingError::InvalidSize {
                record_size: config.record_size,
                rule: config.size_rule,
            })?;

        if memory.len() < span {
            return Err(RingError::MemoryTooSmall {
                required: span,
                actual: memory.len(),
            });
        }

        let slot = registry.register(RING_MODULE_NAME, config.instance_id)?;
        memory[..span].fill(0);

        debug!(
            "Bound ring buffer id {} in slot {}: {} x {} bytes",
            config.instance_id,
            slot.index(),
            CAPACITY,
            config.record_size
        );

        Ok(Self {
            memory,
            record_size: config.record_size,
            span,
            head: 0,
            tail: 0,
            count: 0,
            registry,
            slot,
            registered: true,
        })
    }

    /// Append a record at the head
    ///
    /// # Errors
    ///
    /// - `RingError::RecordLength` if `record` is not `record_size` bytes
    /// - `RingError::Full` if the buffer holds `CAPACITY` records; nothing is
    ///   overwritten and the state is unchanged
    pub fn insert(&mut self, record: &[u8]) -> RingResult<()> {
        self.check_len(record.len())?;
        if self.is_full() {
            trace!("Insert rejected, slot {} is full", self.slot.index());
            return Err(RingError::Full);
        }

        let at = self.head;
        self.memory[at..at + self.record_size].copy_from_slice(record);
        self.head = self.advance(at);
        saturating::incr(&mut self.count, Some(CAPACITY));

        trace!("Inserted record at offset {} ({} stored)", at, self.count);
        Ok(())
    }

    /// Copy the oldest record into `out` and drop it from the buffer
    ///
    /// # Errors
    ///
    /// - `RingError::RecordLength` if `out` is not `record_size` bytes
    /// - `RingError::Empty` if there is nothing to remove; state is unchanged
    pub fn remove_oldest(&mut self, out: &mut [u8]) -> RingResult<()> {
        self.check_len(out.len())?;
        if self.is_empty() {
            return Err(RingError::Empty);
        }

        let at = self.tail;
        out.copy_from_slice(self.record_at(at));
        self.tail = self.advance(at);
        saturating::decr(&mut self.count, None);

        trace!("Removed record at offset {} ({} stored)", at, self.count);
        Ok(())
    }

    /// Copy the oldest record into `out` without removing it
    ///
    /// # Errors
    ///
    /// - `RingError::RecordLength` if `out` is not `record_size` bytes
    /// - `RingError::Empty` if the buffer is empty
    pub fn peek_oldest(&self, out: &mut [u8]) -> RingResult<()> {
        self.check_len(out.len())?;
        if self.is_empty() {
            return Err(RingError::Empty);
        }
        out.copy_from_slice(self.record_at(self.tail));
        Ok(())
    }

    /// Copy the most recently inserted record into `out` without removing it
    ///
    /// # Errors
    ///
    /// - `RingError::RecordLength` if `out` is not `record_size` bytes
    /// - `RingError::Empty` if the buffer is empty
    pub fn peek_newest(&self, out: &mut [u8]) -> RingResult<()> {
        self.check_len(out.len())?;
        if self.is_empty() {
            return Err(RingError::Empty);
        }
        let newest = if self.head == 0 {
            self.span - self.record_size
        } else {
            self.head - self.record_size
        };
        out.copy_from_slice(self.record_at(newest));
        Ok(())
    }

    /// Write `record` into the slot the next `insert` would use
    ///
    /// Cursors and count are untouched. On a full buffer the head slot is the
    /// oldest record, which gets replaced.
    ///
    /// # Errors
    ///
    /// Returns `RingError::RecordLength` if `record` is not `record_size` bytes.
    pub fn overwrite_head(&mut self, record: &[u8]) -> RingResult<()> {
        self.check_len(record.len())?;
        let at = self.head;
        self.memory[at..at + self.record_size].copy_from_slice(record);
        Ok(())
    }

    /// Forget all records
    ///
    /// Cursors and count go back to zero; the memory is not cleared and the
    /// registry slot is kept.
    pub fn reset(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.count = 0;
        debug!("Reset ring buffer in slot {}", self.slot.index());
    }

    /// Number of stored records
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Maximum number of records
    #[must_use]
    pub const fn capacity(&self) -> usize {
        CAPACITY
    }

    /// Bytes per record
    #[must_use]
    pub const fn record_size(&self) -> usize {
        self.record_size
    }

    /// Byte offset of the next write
    #[must_use]
    pub const fn head_offset(&self) -> usize {
        self.head
    }

    /// Byte offset of the next read
    #[must_use]
    pub const fn tail_offset(&self) -> usize {
        self.tail
    }

    /// `true` if no records are stored
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// `true` if `CAPACITY` records are stored
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.count == CAPACITY
    }

    /// Registry slot held by this buffer
    #[must_use]
    pub const fn slot(&self) -> Slot {
        self.slot
    }

    /// Registered name and instance id
    ///
    /// # Errors
    ///
    /// Returns `RingError::Registry` if the registry no longer knows the slot.
    pub fn identity(&self) -> RingResult<(&'static str, u8)> {
        Ok(self.registry.lookup(self.slot)?)
    }

    /// Stored records, oldest first
    #[must_use]
    pub fn records(&self) -> Records<'_> {
        Records {
            memory: &self.memory[..self.span],
            record_size: self.record_size,
            offset: self.tail,
            remaining: self.count,
        }
    }

    /// Snapshot for diagnostics
    ///
    /// # Errors
    ///
    /// Returns `RingError::Registry` if the registry no longer knows the slot.
    pub fn dump(&self) -> RingResult<RingDump<'_>> {
        let (name, id) = self.identity()?;
        Ok(RingDump {
            name,
            id,
            head: self.head,
            tail: self.tail,
            count: self.count,
            records: self.records(),
        })
    }

    /// Emit the dump through `tracing` at debug level, one event per line
    ///
    /// # Errors
    ///
    /// See [`RingBuffer::dump`].
    pub fn log_dump(&self) -> RingResult<()> {
        let dump = self.dump()?;
        for line in dump.to_string().lines() {
            debug!("{}", line);
        }
        Ok(())
    }

    /// Release the registry slot and invalidate the handle
    ///
    /// # Errors
    ///
    /// Returns `RingError::Registry` if the registry rejected the release.
    pub fn release(mut self) -> RingResult<()> {
        self.registered = false;
        self.registry.release(self.slot)?;
        debug!("Released ring buffer in slot {}", self.slot.index());
        Ok(())
    }

    /// Release the registry slot and hand the backing memory back
    #[must_use]
    pub fn into_memory(mut self) -> &'a mut [u8] {
        // Drop releases the slot
        std::mem::take(&mut self.memory)
    }

    const fn advance(&self, offset: usize) -> usize {
        let next = offset + self.record_size;
        if next >= self.span { 0 } else { next }
    }

    fn record_at(&self, offset: usize) -> &[u8] {
        &self.memory[offset..offset + self.record_size]
    }

    const fn check_len(&self, actual: usize) -> RingResult<()> {
        if actual == self.record_size {
            Ok(())
        } else {
            Err(RingError::RecordLength {
                expected: self.record_size,
                actual,
            })
        }
    }
}

impl<const CAPACITY: usize> Drop for RingBuffer<'_, CAPACITY> {
    fn drop(&mut self) {
        if !self.registered {
            return;
        }
        self.registered = false;
        if let Err(e) = self.registry.release(self.slot) {
            warn!("Ring buffer slot {} release failed: {}", self.slot.index(), e);
        }
    }
}

/// Iterator over stored records, oldest first
#[derive(Debug, Clone)]
pub struct Records<'r> {
    memory: &'r [u8],
    record_size: usize,
    offset: usize,
    remaining: usize,
}

impl<'r> Iterator for Records<'r> {
    type Item = &'r [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let record = &self.memory[self.offset..self.offset + self.record_size];
        self.offset += self.record_size;
        if self.offset >= self.memory.len() {
            self.offset = 0;
        }
        self.remaining -= 1;
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Records<'_> {}

impl FusedIterator for Records<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SizeRule;
    use crate::error::RegistryError;

    #[test]
    fn test_ring_buffer_basic() -> RingResult<()> {
        let registry = InstanceRegistry::new();
        let mut memory = [0u8; 16];
        let mut ring =
            RingBuffer::<4>::bind_with(&mut memory, &RingConfig::new(4, 1), &registry)?;

        assert!(ring.is_empty());
        assert_eq!(ring.capacity(), 4);

        for value in 1..=4u8 {
            ring.insert(&[value; 4])?;
        }
        assert!(ring.is_full());
        assert_eq!(ring.insert(&[5; 4]), Err(RingError::Full));

        let mut out = [0u8; 4];
        for value in 1..=4u8 {
            ring.remove_oldest(&mut out)?;
            assert_eq!(out, [value; 4]);
        }
        assert_eq!(ring.remove_oldest(&mut out), Err(RingError::Empty));
        assert!(ring.is_empty());
        Ok(())
    }

    #[test]
    fn test_ring_buffer_wrap() -> RingResult<()> {
        let registry = InstanceRegistry::new();
        let mut memory = [0u8; 8];
        let mut ring =
            RingBuffer::<4>::bind_with(&mut memory, &RingConfig::new(2, 1), &registry)?;

        let mut out = [0u8; 2];
        for round in 0..10u8 {
            for i in 0..3u8 {
                ring.insert(&[round, i])?;
            }
            for i in 0..3u8 {
                ring.remove_oldest(&mut out)?;
                assert_eq!(out, [round, i]);
            }
        }
        assert!(ring.head_offset() < 8);
        assert_eq!(ring.head_offset(), ring.tail_offset());
        Ok(())
    }

    #[test]
    fn test_bind_zero_fills_used_span_only() -> RingResult<()> {
        let registry = InstanceRegistry::new();
        let mut memory = [0xEEu8; 20];
        {
            let ring =
                RingBuffer::<4>::bind_with(&mut memory, &RingConfig::new(4, 1), &registry)?;
            assert_eq!(ring.count(), 0);
        }
        assert!(memory[..16].iter().all(|&b| b == 0));
        assert!(memory[16..].iter().all(|&b| b == 0xEE));
        Ok(())
    }

    #[test]
    fn test_failed_bind_leaves_memory_and_registry_alone() {
        let registry = InstanceRegistry::new();
        let mut memory = [0xEEu8; 8];
        let result = RingBuffer::<4>::bind_with(&mut memory, &RingConfig::new(4, 1), &registry);
        assert!(matches!(
            result,
            Err(RingError::MemoryTooSmall {
                required: 16,
                actual: 8
            })
        ));
        drop(result);
        assert!(registry.is_empty());
        assert!(memory.iter().all(|&b| b == 0xEE));
    }

    #[test]
    fn test_non_power_of_two_needs_any_rule() -> RingResult<()> {
        let registry = InstanceRegistry::new();
        let mut memory = [0u8; 30 * 4];
        let strict = RingBuffer::<4>::bind_with(&mut memory, &RingConfig::new(30, 2), &registry);
        assert!(matches!(strict, Err(RingError::InvalidSize { record_size: 30, .. })));
        drop(strict);

        let config = RingConfig::new(30, 2).with_size_rule(SizeRule::Any);
        let ring = RingBuffer::<4>::bind_with(&mut memory, &config, &registry)?;
        assert_eq!(ring.record_size(), 30);
        Ok(())
    }

    #[test]
    fn test_drop_releases_slot() -> RingResult<()> {
        let registry = InstanceRegistry::new();
        let mut memory = [0u8; 16];
        let slot = {
            let ring =
                RingBuffer::<4>::bind_with(&mut memory, &RingConfig::new(4, 1), &registry)?;
            assert_eq!(registry.len(), 1);
            ring.slot()
        };
        assert!(registry.is_empty());
        assert!(matches!(
            registry.lookup(slot),
            Err(RegistryError::StaleSlot { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_into_memory_returns_slice() -> RingResult<()> {
        let registry = InstanceRegistry::new();
        let mut memory = [0u8; 16];
        let mut ring =
            RingBuffer::<4>::bind_with(&mut memory, &RingConfig::new(4, 1), &registry)?;
        ring.insert(&[0x11; 4])?;

        let raw = ring.into_memory();
        assert_eq!(raw.len(), 16);
        assert_eq!(&raw[..4], &[0x11; 4]);
        assert!(registry.is_empty());
        Ok(())
    }

    #[test]
    fn test_records_iterator_wraps() -> RingResult<()> {
        let registry = InstanceRegistry::new();
        let mut memory = [0u8; 3];
        let mut ring =
            RingBuffer::<3>::bind_with(&mut memory, &RingConfig::new(1, 1), &registry)?;
        let mut out = [0u8; 1];

        ring.insert(&[1])?;
        ring.insert(&[2])?;
        ring.remove_oldest(&mut out)?;
        ring.insert(&[3])?;
        ring.insert(&[4])?; // wraps to offset 0

        let stored: Vec<u8> = ring.records().map(|r| r[0]).collect();
        assert_eq!(stored, vec![2, 3, 4]);
        assert_eq!(ring.records().len(), 3);
        Ok(())
    }
}
