//! Instance registry
//!
//! Fixed table mapping a small slot index to a `(name, id)` pair so diagnostic
//! output can say which instance produced it. Knows nothing about buffer
//! contents.
//!
//! Slot choice on register:
//! 1. the most recently released slot, if any
//! 2. the next never-used slot
//! 3. any other empty slot
//!
//! Each slot carries a generation that is bumped on release. A `Slot` token
//! from before the release no longer matches, so a double release or a late
//! lookup cannot touch whichever instance now owns the index.

use crate::error::{RegistryError, RegistryResult};
use common::saturating;
use parking_lot::Mutex;
use tracing::debug;

/// Number of slots in a registry
pub const MAX_MODULES: usize = 64;

/// Id reported by an empty slot
pub const UNDEFINED_MODULE_ID: u8 = 0xFF;

/// Process-wide registry used by `RingBuffer::bind`
static GLOBAL_REGISTRY: InstanceRegistry = InstanceRegistry::new();

/// The process-wide registry
#[must_use]
pub fn global() -> &'static InstanceRegistry {
    &GLOBAL_REGISTRY
}

/// Handle to a registered slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    index: usize,
    generation: u32,
}

impl Slot {
    /// Position in the table
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }

    /// Registration generation of the slot
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    name: Option<&'static str>,
    id: u8,
    generation: u32,
}

impl Entry {
    const EMPTY: Self = Self {
        name: None,
        id: UNDEFINED_MODULE_ID,
        generation: 0,
    };

    const fn is_empty(&self) -> bool {
        self.name.is_none()
    }
}

#[derive(Debug)]
struct SlotTable {
    entries: [Entry; MAX_MODULES],
    /// Slots below this index have been handed out at least once
    high_water: usize,
    /// Most recently released slot
    free_hint: Option<usize>,
    occupied: usize,
}

impl SlotTable {
    const fn new() -> Self {
        Self {
            entries: [Entry::EMPTY; MAX_MODULES],
            high_water: 0,
            free_hint: None,
            occupied: 0,
        }
    }

    fn next_index(&mut self) -> RegistryResult<usize> {
        if let Some(hint) = self.free_hint.take() {
            debug_assert!(self.entries[hint].is_empty(), "free hint points at a live slot");
            return Ok(hint);
        }

        if self.high_water < MAX_MODULES {
            let index = self.high_water;
            saturating::incr(&mut self.high_water, Some(MAX_MODULES));
            return Ok(index);
        }

        self.entries
            .iter()
            .position(Entry::is_empty)
            .ok_or(RegistryError::RegistryFull {
                capacity: MAX_MODULES,
            })
    }

    fn live_entry(&self, slot: Slot) -> RegistryResult<&Entry> {
        let entry = self
            .entries
            .get(slot.index)
            .ok_or(RegistryError::UnknownSlot { index: slot.index })?;

        if entry.is_empty() || entry.generation != slot.generation {
            return Err(RegistryError::StaleSlot {
                index: slot.index,
                generation: slot.generation,
            });
        }
        Ok(entry)
    }
}

/// Fixed-size table of live instances
///
/// All methods take `&self`; the table sits behind a single mutex so one
/// registry can be shared by buffers on different threads.
#[derive(Debug)]
pub struct InstanceRegistry {
    table: Mutex<SlotTable>,
}

impl InstanceRegistry {
    /// Create an empty registry
    #[must_use]
    pub const fn new() -> Self {
        Self {
            table: parking_lot::const_mutex(SlotTable::new()),
        }
    }

    /// Register an instance and return its slot
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::RegistryFull` if all `MAX_MODULES` slots are live.
    pub fn register(&self, name: &'static str, id: u8) -> RegistryResult<Slot> {
        let mut table = self.table.lock();
        let index = table.next_index()?;

        let entry = &mut table.entries[index];
        entry.name = Some(name);
        entry.id = id;
        let slot = Slot {
            index,
            generation: entry.generation,
        };
        saturating::incr(&mut table.occupied, Some(MAX_MODULES));

        debug!("Registered {} (id {}) in slot {}", name, id, index);
        Ok(slot)
    }

    /// Release a slot so it can be reused
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownSlot` for an out-of-range index and
    /// `RegistryError::StaleSlot` if the slot was already released. Neither
    /// case modifies the table.
    pub fn release(&self, slot: Slot) -> RegistryResult<()> {
        let mut table = self.table.lock();
        table.live_entry(slot)?;

        let entry = &mut table.entries[slot.index];
        entry.name = None;
        entry.id = UNDEFINED_MODULE_ID;
        entry.generation = entry.generation.wrapping_add(1);
        table.free_hint = Some(slot.index);
        saturating::decr(&mut table.occupied, None);

        debug!("Released registry slot {}", slot.index);
        Ok(())
    }

    /// Name and id registered in `slot`
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownSlot` or `RegistryError::StaleSlot` if
    /// `slot` is not live.
    pub fn lookup(&self, slot: Slot) -> RegistryResult<(&'static str, u8)> {
        let table = self.table.lock();
        let entry = table.live_entry(slot)?;
        // live_entry guarantees the name is set
        Ok((entry.name.unwrap_or_default(), entry.id))
    }

    /// Name registered in `slot`
    ///
    /// # Errors
    ///
    /// See [`InstanceRegistry::lookup`].
    pub fn lookup_name(&self, slot: Slot) -> RegistryResult<&'static str> {
        self.lookup(slot).map(|(name, _)| name)
    }

    /// Id registered in `slot`
    ///
    /// # Errors
    ///
    /// See [`InstanceRegistry::lookup`].
    pub fn lookup_id(&self, slot: Slot) -> RegistryResult<u8> {
        self.lookup(slot).map(|(_, id)| id)
    }

    /// Number of live slots
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.lock().occupied
    }

    /// `true` if no slot is live
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slot the next `register` will reuse, if one was just released
    #[must_use]
    pub fn free_hint(&self) -> Option<usize> {
        self.table.lock().free_hint
    }
}

impl Default for InstanceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
