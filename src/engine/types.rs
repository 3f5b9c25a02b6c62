//! Core identifier types, bit-level layouts, and engine capacities.
//!
//! This module defines the numeric backbone shared by every subsystem:
//! the packed entity identifier layout, row and archetype identifiers,
//! and the handful of tunable capacities the engine is built around.
//!
//! ## Entity representation
//!
//! Entities are encoded as the bitwise complement of a packed value:
//!
//! ```text
//! raw = !((slot << 24) | generation)
//! ```
//!
//! - **Slot** (24 bits) identifies the tracker slot backing the entity.
//! - **Generation** (8 bits) detects stale identifiers after a slot is
//!   recycled.
//!
//! The complement means the all-zero raw value (the `Default` of the id
//! type) decodes to the maximum slot index, which normal allocation does
//! not produce until the tracker has grown past sixteen million slots.
//! That gives an implicit, detectable null without a separate validity
//! flag.
//!
//! Bit widths are compile-time constants validated by static assertions.

/// Bit-width type used for compile-time layout calculations.
pub type Bits = u8;

/// Raw packed representation of an entity identifier.
pub type EntityRaw = u64;
/// Slot index within the entity tracker.
pub type SlotIndex = u32;
/// Generation counter stored per tracker slot.
pub type Generation = u8;

/// Row index within an archetype table.
pub type Row = u32;
/// Index of an archetype within the entity index's archetype list.
pub type ArchetypeId = u16;
/// Stable process-wide integer assigned to a Rust type by the registry.
pub type TypeIndex = u32;

/// Number of bits reserved for the slot index.
pub const SLOT_BITS: Bits = 24;
/// Number of bits reserved for the generation counter.
pub const GENERATION_BITS: Bits = 8;

const _: [(); 1] = [(); (SLOT_BITS as usize + GENERATION_BITS as usize <= 64) as usize];
const _: [(); 1] = [(); (GENERATION_BITS as usize <= 8) as usize];

const fn mask(bits: Bits) -> EntityRaw {
    if bits == 0 { 0 } else { ((1 as EntityRaw) << bits) - 1 }
}

/// Mask selecting the slot portion of a decoded identifier.
pub const SLOT_MASK: EntityRaw = mask(SLOT_BITS);
/// Mask selecting the generation portion of a decoded identifier.
pub const GENERATION_MASK: EntityRaw = mask(GENERATION_BITS);
/// Largest slot index representable in the packed layout.
pub const SLOT_CAP: SlotIndex = SLOT_MASK as SlotIndex;

/// Initial capacity of sparse-set tables and component columns.
pub const INITIAL_CAPACITY: usize = 4;

/// Number of freed tracker slots that must accumulate before any slot is
/// reused. Delaying reuse keeps a just-freed identifier from immediately
/// aliasing a fresh allocation in the same slot.
pub const MINIMUM_FREE: usize = 1024;
