//! Process-wide type registry.
//!
//! Assigns a stable, compact [`TypeIndex`] to each distinct Rust type the
//! first time that type is seen, and memoizes the assignment for the
//! lifetime of the process. The same table serves both the compile-time
//! path ([`type_index_of`]) and the runtime-handle path
//! ([`type_index_for`]), so a `TypeId` obtained dynamically resolves to
//! the identical integer.
//!
//! ## Invariants
//! - Indices are unique, assigned from a monotonically increasing counter,
//!   and never removed.
//! - Both lookup paths are total: an unseen type is assigned on first use.
//!
//! ## Scope
//! The registry is a single global table shared by every engine instance
//! in the process. The engine itself is single-threaded; the `RwLock`
//! exists because Rust statics must be `Sync`, not because concurrent
//! registration is a supported pattern.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

use crate::engine::types::TypeIndex;

struct TypeRegistry {
    next: TypeIndex,
    by_type: HashMap<TypeId, TypeIndex>,
}

static REGISTRY: OnceLock<RwLock<TypeRegistry>> = OnceLock::new();

fn registry() -> &'static RwLock<TypeRegistry> {
    REGISTRY.get_or_init(|| {
        RwLock::new(TypeRegistry {
            next: 0,
            by_type: HashMap::new(),
        })
    })
}

/// Returns the stable [`TypeIndex`] for type `T`, assigning one on first
/// use.
pub fn type_index_of<T: 'static>() -> TypeIndex {
    type_index_for(TypeId::of::<T>())
}

/// Returns the stable [`TypeIndex`] for a runtime type handle, assigning
/// one on first use.
///
/// Resolves through the same table as [`type_index_of`], so a handle
/// equivalent to `T` yields the same integer.
pub fn type_index_for(type_id: TypeId) -> TypeIndex {
    {
        let registry = registry().read().unwrap();
        if let Some(&index) = registry.by_type.get(&type_id) {
            return index;
        }
    }
    let mut registry = registry().write().unwrap();
    // Re-check under the write lock; a racing caller may have assigned.
    if let Some(&index) = registry.by_type.get(&type_id) {
        return index;
    }
    let index = registry.next;
    registry.next += 1;
    registry.by_type.insert(type_id, index);
    index
}

/// Returns the [`TypeIndex`] for a runtime handle without assigning one.
pub fn lookup_type_index(type_id: TypeId) -> Option<TypeIndex> {
    registry().read().unwrap().by_type.get(&type_id).copied()
}

/// Number of distinct types the registry has assigned indices to.
pub fn registered_type_count() -> usize {
    registry().read().unwrap().by_type.len()
}
