//! Event log over a ring buffer

use crate::level::{Level, LevelMask};
use crate::record::{EVENT_RECORD_SIZE, EventRecord};
use crate::EventResult;
use common::saturating;
use ringbuf::{DEFAULT_CAPACITY, InstanceRegistry, RingBuffer, RingConfig, RingError};
use tracing::{debug, error, info, trace, warn};

/// Level-filtered FIFO of events in caller-owned memory
///
/// Needs `EVENT_RECORD_SIZE * CAPACITY` bytes of backing memory. A full log
/// rejects new events and counts them as overruns; the oldest events are
/// never discarded implicitly.
#[derive(Debug)]
pub struct EventLog<'a, const CAPACITY: usize = DEFAULT_CAPACITY> {
    ring: RingBuffer<'a, CAPACITY>,
    mask: LevelMask,
    next_sequence: u32,
    overruns: u32,
}

impl<'a, const CAPACITY: usize> EventLog<'a, CAPACITY> {
    /// Bind an event log to `memory`, registered in the global registry
    ///
    /// # Errors
    ///
    /// Returns `EventError::Ring` if the ring buffer cannot be bound.
    pub fn new(memory: &'a mut [u8], instance_id: u8) -> EventResult<Self> {
        Ok(Self::from_ring(RingBuffer::bind(
            memory,
            EVENT_RECORD_SIZE,
            instance_id,
        )?))
    }

    /// Bind an event log to `memory`, registered in `registry`
    ///
    /// # Errors
    ///
    /// Returns `EventError::Ring` if the ring buffer cannot be bound.
    pub fn with_registry(
        memory: &'a mut [u8],
        instance_id: u8,
        registry: &'a InstanceRegistry,
    ) -> EventResult<Self> {
        let config = RingConfig::new(EVENT_RECORD_SIZE, instance_id);
        Ok(Self::from_ring(RingBuffer::bind_with(
            memory, &config, registry,
        )?))
    }

    fn from_ring(ring: RingBuffer<'a, CAPACITY>) -> Self {
        Self {
            ring,
            mask: LevelMask::ALL,
            next_sequence: 0,
            overruns: 0,
        }
    }

    /// Store an event
    ///
    /// Returns the assigned sequence number, or `None` if the mask filtered
    /// the level out.
    ///
    /// # Errors
    ///
    /// Returns `EventError::Ring(RingError::Full)` when the log is full; the
    /// overrun counter is bumped and nothing is stored.
    pub fn log(
        &mut self,
        level: Level,
        code: u16,
        timestamp_ms: u32,
        payload: u32,
    ) -> EventResult<Option<u32>> {
        if !self.mask.contains(level) {
            return Ok(None);
        }

        let mut record = EventRecord::new(level, code, timestamp_ms, payload);
        record.sequence = self.next_sequence;

        if let Err(e) = self.ring.insert(&record.encode()) {
            if e == RingError::Full {
                saturating::incr(&mut self.overruns, None);
                trace!("Event log full, {} overruns", self.overruns);
            }
            return Err(e.into());
        }

        self.next_sequence = self.next_sequence.wrapping_add(1);
        Ok(Some(record.sequence))
    }

    /// Remove and return the oldest event, `None` if the log is empty
    ///
    /// # Errors
    ///
    /// Returns `EventError::UnknownLevel` if the stored bytes do not decode.
    pub fn drain_oldest(&mut self) -> EventResult<Option<EventRecord>> {
        let mut buf = [0u8; EVENT_RECORD_SIZE];
        match self.ring.remove_oldest(&mut buf) {
            Ok(()) => EventRecord::decode(&buf).map(Some),
            Err(RingError::Empty) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Most recent event without removing it, `None` if the log is empty
    ///
    /// # Errors
    ///
    /// Returns `EventError::UnknownLevel` if the stored bytes do not decode.
    pub fn latest(&self) -> EventResult<Option<EventRecord>> {
        let mut buf = [0u8; EVENT_RECORD_SIZE];
        match self.ring.peek_newest(&mut buf) {
            Ok(()) => EventRecord::decode(&buf).map(Some),
            Err(RingError::Empty) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Stored events, oldest first, without removing them
    pub fn iter(&self) -> impl Iterator<Item = EventResult<EventRecord>> + '_ {
        self.ring.records().map(EventRecord::decode)
    }

    /// Replay stored events through `tracing` at their own level
    ///
    /// Returns the number of events emitted.
    ///
    /// # Errors
    ///
    /// Stops at the first record that does not decode.
    pub fn emit(&self) -> EventResult<usize> {
        let mut emitted = 0;
        for event in self.iter() {
            let event = event?;
            let (seq, code, ts, payload) =
                (event.sequence, event.code, event.timestamp_ms, event.payload);
            match event.level {
                Level::Fatal => error!(seq, code, ts, payload, "event"),
                Level::Warn => warn!(seq, code, ts, payload, "event"),
                Level::Info => info!(seq, code, ts, payload, "event"),
                Level::Debug => debug!(seq, code, ts, payload, "event"),
                Level::Trace => trace!(seq, code, ts, payload, "event"),
            }
            emitted += 1;
        }
        Ok(emitted)
    }

    /// Drop all stored events; sequence numbering continues
    pub fn clear(&mut self) {
        self.ring.reset();
    }

    /// Replace the level mask
    pub const fn set_mask(&mut self, mask: LevelMask) {
        self.mask = mask;
    }

    /// Current level mask
    #[must_use]
    pub const fn mask(&self) -> LevelMask {
        self.mask
    }

    /// Stored event count
    #[must_use]
    pub const fn len(&self) -> usize {
        self.ring.count()
    }

    /// `true` if no events are stored
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Events rejected because the log was full
    #[must_use]
    pub const fn overruns(&self) -> u32 {
        self.overruns
    }

    /// Underlying ring buffer, for diagnostics
    #[must_use]
    pub const fn ring(&self) -> &RingBuffer<'a, CAPACITY> {
        &self.ring
    }
}
