//! Singleton resources keyed by type.
//!
//! A resource is one value per Rust type, living beside the entity/
//! component model rather than inside it. The dispatch layer reads
//! resources and iterates queries in the same invocation, so the map
//! also answers containment probes for runtime type handles.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;

use crate::engine::error::{EcsError, EcsResult};

/// Type-keyed map of singleton values.
#[derive(Default)]
pub struct Resources {
    slots: HashMap<TypeId, Box<dyn Any>>,
}

impl Resources {
    /// Creates an empty resource map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a resource, replacing any existing value of the same type.
    pub fn insert<T: 'static>(&mut self, value: T) {
        self.slots.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Shared view of the resource of type `T`.
    pub fn get<T: 'static>(&self) -> EcsResult<&T> {
        self.slots
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.downcast_ref::<T>())
            .ok_or(EcsError::MissingResource(type_name::<T>()))
    }

    /// Exclusive view of the resource of type `T`.
    pub fn get_mut<T: 'static>(&mut self) -> EcsResult<&mut T> {
        self.slots
            .get_mut(&TypeId::of::<T>())
            .and_then(|slot| slot.downcast_mut::<T>())
            .ok_or(EcsError::MissingResource(type_name::<T>()))
    }

    /// Returns `true` if a resource of type `T` is present.
    pub fn contains<T: 'static>(&self) -> bool {
        self.slots.contains_key(&TypeId::of::<T>())
    }

    /// Containment probe for a runtime type handle.
    pub fn contains_type_id(&self, type_id: TypeId) -> bool {
        self.slots.contains_key(&type_id)
    }

    /// Removes and returns the resource of type `T`, if present.
    pub fn remove<T: 'static>(&mut self) -> Option<T> {
        self.slots
            .remove(&TypeId::of::<T>())
            .and_then(|slot| slot.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }

    /// Number of resources currently stored.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no resources are stored.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
