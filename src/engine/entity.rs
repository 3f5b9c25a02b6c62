//! Packed entity identifiers and the generational tracker.

use std::collections::VecDeque;
use std::fmt;

use crate::engine::sparse::SparseKey;
use crate::engine::types::{
    EntityRaw, Generation, GENERATION_MASK, MINIMUM_FREE, SLOT_BITS, SLOT_MASK, SlotIndex,
};

/// Packed, generation-checked entity identifier.
///
/// The raw value is the bitwise complement of `(slot << 24) | generation`
/// (see [`crate::engine::types`] for the layout rationale). Two
/// identifiers are equal iff their raw values are equal; decoding is pure
/// and total.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct EntityId(pub EntityRaw);

#[inline]
const fn make_raw(slot: SlotIndex, generation: Generation) -> EntityRaw {
    !(((slot as EntityRaw) << SLOT_BITS) | (generation as EntityRaw))
}

impl EntityId {
    /// Encodes a slot index and generation into a packed identifier.
    #[inline]
    pub const fn new(slot: SlotIndex, generation: Generation) -> Self {
        Self(make_raw(slot, generation))
    }

    /// Slot index encoded in this identifier.
    #[inline]
    pub const fn slot(self) -> SlotIndex {
        ((!self.0 >> SLOT_BITS) & SLOT_MASK) as SlotIndex
    }

    /// Generation encoded in this identifier.
    #[inline]
    pub const fn generation(self) -> Generation {
        (!self.0 & GENERATION_MASK) as Generation
    }
}

impl SparseKey for EntityId {
    #[inline]
    fn sparse_index(&self) -> usize {
        self.slot() as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity {}v{}", self.slot(), self.generation())
    }
}

/// Allocates and recycles entity identifiers.
///
/// Keeps one generation counter per ever-allocated slot and a FIFO queue
/// of freed slots. A slot is reused only once the queue holds more than
/// [`MINIMUM_FREE`] entries, so a just-destroyed identifier is not
/// immediately mistaken for a fresh allocation holding different data.
///
/// ## Invariants
/// - `generations[slot]` changes only on [`destroy`](Self::destroy), and
///   only by a wrapping increment.
/// - Destroying an identifier does not touch archetype state; evicting
///   component data first is the caller's responsibility.
#[derive(Default)]
pub struct EntityTracker {
    generations: Vec<Generation>,
    free: VecDeque<SlotIndex>,
}

impl EntityTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates an identifier, reusing a freed slot once enough have
    /// accumulated, otherwise appending a new slot at generation zero.
    pub fn create(&mut self) -> EntityId {
        let slot = if self.free.len() > MINIMUM_FREE {
            self.free.pop_front().expect("free queue above threshold")
        } else {
            self.generations.push(0);
            (self.generations.len() - 1) as SlotIndex
        };
        EntityId::new(slot, self.generations[slot as usize])
    }

    /// Returns `true` iff the slot's stored generation matches the
    /// identifier's. This is the sole liveness check in the engine;
    /// nothing consults it automatically.
    pub fn valid(&self, entity: EntityId) -> bool {
        self.generations
            .get(entity.slot() as usize)
            .map_or(false, |&generation| generation == entity.generation())
    }

    /// Retires an identifier: bumps the slot's generation (wrapping at 8
    /// bits) and queues the slot for eventual reuse.
    ///
    /// After 256 destroy/reuse cycles a slot's generation wraps and a
    /// sufficiently old identifier can alias a live one; the reuse
    /// threshold keeps that window remote.
    pub fn destroy(&mut self, entity: EntityId) {
        let slot = entity.slot();
        self.generations[slot as usize] = self.generations[slot as usize].wrapping_add(1);
        self.free.push_back(slot);
    }

    /// Number of slots ever allocated.
    pub fn slot_count(&self) -> usize {
        self.generations.len()
    }

    /// Number of slots currently awaiting reuse.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }
}
