//! World facade: identifier lifecycle, typed registration, resources,
//! and per-step system execution.
//!
//! [`World`] composes the entity tracker, the entity index, the
//! type-index-to-component table, the resource map, and the registered
//! systems. It is the boundary the engine exposes to callers: every
//! entity-taking operation here is liveness-gated through the tracker,
//! so a destroyed identifier fails with a not-found error instead of
//! silently resurrecting.
//!
//! ## Systems
//! A system is a registered closure invoked once per [`step`](World::step)
//! with exclusive access to the world. Per-row dispatch uses the typed
//! iteration adapters ([`for_each_read`](World::for_each_read) and
//! friends), which resolve component ids from Rust types and downcast
//! each matching archetype's columns once before iterating rows.
//!
//! ## Borrow discipline
//! Views returned by `get`-style accessors and the rows visited by query
//! scans are valid only until the next structural mutation. The borrow
//! checker enforces this: scans borrow the world, mutation requires
//! `&mut`.

use std::any::{type_name, TypeId};

use log::trace;

use crate::engine::entity::{EntityId, EntityTracker};
use crate::engine::entity_type::EntityType;
use crate::engine::error::{EcsError, EcsResult};
use crate::engine::index::{ColumnSpec, ComponentValue, EntityIndex, Matches};
use crate::engine::registry;
use crate::engine::resource::Resources;
use crate::engine::types::Row;
use crate::engine::archetype::Archetype;

/// A registered system: one closure run per step.
pub type SystemFn = Box<dyn FnMut(&mut World) -> EcsResult<()>>;

/// Builder for the component list handed to an add operation.
///
/// Each entry pairs a component id with its boxed payload, or no payload
/// for a tag component.
#[derive(Default)]
pub struct Bundle {
    items: Vec<ComponentValue>,
}

impl Bundle {
    /// Creates an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a component with a value payload.
    pub fn with_value<T: 'static>(mut self, component: EntityId, value: T) -> Self {
        self.items.push((component, Some(Box::new(value))));
        self
    }

    /// Adds a tag component (no payload).
    pub fn with_tag(mut self, component: EntityId) -> Self {
        self.items.push((component, None));
        self
    }

    /// Number of components in the bundle.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the bundle lists no components.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consumes the bundle into its component list.
    pub fn into_items(self) -> Vec<ComponentValue> {
        self.items
    }
}

/// Top-level engine facade.
pub struct World {
    tracker: EntityTracker,
    index: EntityIndex,
    data_types: Vec<EntityId>,
    resources: Resources,
    systems: Vec<SystemFn>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates an empty world.
    pub fn new() -> Self {
        Self {
            tracker: EntityTracker::new(),
            index: EntityIndex::new(),
            data_types: Vec::new(),
            resources: Resources::new(),
            systems: Vec::new(),
        }
    }

    fn ensure_live(&self, entity: EntityId) -> EcsResult<()> {
        if self.tracker.valid(entity) {
            Ok(())
        } else {
            Err(EcsError::StaleEntity(entity))
        }
    }

    // ── Registration ────────────────────────────────────────────────

    /// Registers component type `T`, allocating a component id and
    /// declaring `T` as the value type backing it.
    pub fn register_component<T: Default + Clone + 'static>(&mut self) -> EntityId {
        let component = self.tracker.create();
        self.index.register(component, ColumnSpec::of::<T>());
        let type_index = registry::type_index_of::<T>() as usize;
        if type_index >= self.data_types.len() {
            self.data_types.resize(type_index + 1, EntityId::default());
        }
        self.data_types[type_index] = component;
        component
    }

    /// Component id registered for type `T`.
    pub fn component_id<T: 'static>(&self) -> EcsResult<EntityId> {
        self.lookup_component(TypeId::of::<T>())
            .ok_or(EcsError::UnknownComponentType(type_name::<T>()))
    }

    /// Component id registered for a runtime type handle.
    pub fn component_id_for(&self, type_id: TypeId) -> EcsResult<EntityId> {
        self.lookup_component(type_id)
            .ok_or(EcsError::UnknownComponentType("runtime type handle"))
    }

    fn lookup_component(&self, type_id: TypeId) -> Option<EntityId> {
        let type_index = registry::lookup_type_index(type_id)? as usize;
        self.data_types
            .get(type_index)
            .copied()
            .filter(|&component| component != EntityId::default())
    }

    // ── Entity lifecycle ────────────────────────────────────────────

    /// Allocates a fresh entity identifier.
    pub fn create_entity(&mut self) -> EntityId {
        self.tracker.create()
    }

    /// Returns `true` if the identifier is still live.
    pub fn valid(&self, entity: EntityId) -> bool {
        self.tracker.valid(entity)
    }

    /// Destroys an entity: evicts its component data through the root
    /// archetype, drops its record, and retires the identifier.
    pub fn destroy_entity(&mut self, entity: EntityId) -> EcsResult<()> {
        self.ensure_live(entity)?;
        if self.index.record(entity).is_some() {
            self.index.destroy(entity)?;
        }
        trace!("destroyed {entity}");
        self.tracker.destroy(entity);
        Ok(())
    }

    // ── Structural mutation ─────────────────────────────────────────

    /// Adds the bundle's components to `entity`.
    pub fn add_components(&mut self, entity: EntityId, bundle: Bundle) -> EcsResult<()> {
        self.ensure_live(entity)?;
        self.index.add(entity, bundle.into_items())
    }

    /// Removes the listed components from `entity`.
    pub fn remove_components(&mut self, entity: EntityId, components: &[EntityId]) -> EcsResult<()> {
        self.ensure_live(entity)?;
        self.index.remove(entity, components)
    }

    /// Adds a single value component of type `T`.
    pub fn add_component<T: 'static>(&mut self, entity: EntityId, value: T) -> EcsResult<()> {
        let component = self.component_id::<T>()?;
        self.add_components(entity, Bundle::new().with_value(component, value))
    }

    /// Adds a single tag component.
    pub fn add_tag(&mut self, entity: EntityId, tag: EntityId) -> EcsResult<()> {
        self.add_components(entity, Bundle::new().with_tag(tag))
    }

    /// Removes the component registered for type `T`.
    pub fn remove_component<T: 'static>(&mut self, entity: EntityId) -> EcsResult<()> {
        let component = self.component_id::<T>()?;
        self.remove_components(entity, &[component])
    }

    // ── Component access ────────────────────────────────────────────

    /// Shared view of `entity`'s value for `component`.
    pub fn get<T: Default + Clone + 'static>(
        &self,
        entity: EntityId,
        component: EntityId,
    ) -> EcsResult<&T> {
        self.ensure_live(entity)?;
        self.index.get(entity, component)
    }

    /// Exclusive view of `entity`'s value for `component`.
    pub fn get_mut<T: Default + Clone + 'static>(
        &mut self,
        entity: EntityId,
        component: EntityId,
    ) -> EcsResult<&mut T> {
        self.ensure_live(entity)?;
        self.index.get_mut(entity, component)
    }

    /// Shared view of `entity`'s value for the component registered for
    /// type `T`.
    pub fn get_component<T: Default + Clone + 'static>(&self, entity: EntityId) -> EcsResult<&T> {
        let component = self.component_id::<T>()?;
        self.get(entity, component)
    }

    /// Exclusive view of `entity`'s value for the component registered
    /// for type `T`.
    pub fn get_component_mut<T: Default + Clone + 'static>(
        &mut self,
        entity: EntityId,
    ) -> EcsResult<&mut T> {
        let component = self.component_id::<T>()?;
        self.get_mut(entity, component)
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// Read-only view of the entity index for external dispatch.
    pub fn entity_index(&self) -> &EntityIndex {
        &self.index
    }

    /// Invokes `visit` for every `(archetype, row)` matching `kind`.
    pub fn each<F>(&self, kind: &EntityType, visit: F)
    where
        F: FnMut(&Archetype, Row),
    {
        self.index.each(kind, visit);
    }

    /// Lazy sequence of `(archetype, row)` pairs matching `kind`.
    pub fn all<'a>(&'a self, kind: &'a EntityType) -> Matches<'a> {
        self.index.all(kind)
    }

    /// Collects the entities matching `kind`, in scan order.
    pub fn entities_matching(&self, kind: &EntityType) -> Vec<EntityId> {
        self.index
            .all(kind)
            .filter_map(|(archetype, row)| archetype.entity_at(row))
            .collect()
    }

    /// Invokes `f` with a shared view of every `T` value, entity by
    /// entity.
    pub fn for_each_read<T, F>(&self, mut f: F) -> EcsResult<()>
    where
        T: Default + Clone + 'static,
        F: FnMut(EntityId, &T),
    {
        let component = self.component_id::<T>()?;
        for archetype in self.index.archetypes() {
            if !archetype.kind().has(component) {
                continue;
            }
            archetype.for_each_row_ref::<T, _>(component, |entity, value| f(entity, value));
        }
        Ok(())
    }

    /// Invokes `f` with an exclusive view of every `T` value, entity by
    /// entity.
    pub fn for_each_write<T, F>(&mut self, mut f: F) -> EcsResult<()>
    where
        T: Default + Clone + 'static,
        F: FnMut(EntityId, &mut T),
    {
        let component = self.component_id::<T>()?;
        for archetype in self.index.archetypes_mut() {
            if !archetype.kind().has(component) {
                continue;
            }
            archetype.for_each_row_mut::<T, _>(component, |entity, value| f(entity, value));
        }
        Ok(())
    }

    /// Invokes `f` with a shared view of `A` and an exclusive view of
    /// `B` for every entity carrying both.
    pub fn for_each_read_write<A, B, F>(&mut self, mut f: F) -> EcsResult<()>
    where
        A: Default + Clone + 'static,
        B: Default + Clone + 'static,
        F: FnMut(EntityId, &A, &mut B),
    {
        let component_a = self.component_id::<A>()?;
        let component_b = self.component_id::<B>()?;
        for archetype in self.index.archetypes_mut() {
            if !archetype.kind().has(component_a) || !archetype.kind().has(component_b) {
                continue;
            }
            archetype.for_each_row_ref_mut::<A, B, _>(component_a, component_b, |entity, a, b| {
                f(entity, a, b)
            });
        }
        Ok(())
    }

    // ── Resources ───────────────────────────────────────────────────

    /// Inserts a singleton resource, replacing any existing value of the
    /// same type.
    pub fn insert_resource<T: 'static>(&mut self, value: T) {
        self.resources.insert(value);
    }

    /// Shared view of the resource of type `T`.
    pub fn resource<T: 'static>(&self) -> EcsResult<&T> {
        self.resources.get::<T>()
    }

    /// Exclusive view of the resource of type `T`.
    pub fn resource_mut<T: 'static>(&mut self) -> EcsResult<&mut T> {
        self.resources.get_mut::<T>()
    }

    /// Returns `true` if a resource of type `T` is present.
    pub fn has_resource<T: 'static>(&self) -> bool {
        self.resources.contains::<T>()
    }

    /// Containment probe for a runtime type handle.
    pub fn has_resource_type(&self, type_id: TypeId) -> bool {
        self.resources.contains_type_id(type_id)
    }

    /// Removes and returns the resource of type `T`, if present.
    pub fn remove_resource<T: 'static>(&mut self) -> Option<T> {
        self.resources.remove::<T>()
    }

    // ── Systems ─────────────────────────────────────────────────────

    /// Registers a system to run on every step, in registration order.
    pub fn register_system<F>(&mut self, system: F)
    where
        F: FnMut(&mut World) -> EcsResult<()> + 'static,
    {
        self.systems.push(Box::new(system));
    }

    /// Runs every registered system once, stopping at the first error.
    pub fn step(&mut self) -> EcsResult<()> {
        let mut systems = std::mem::take(&mut self.systems);
        let mut outcome = Ok(());
        for system in &mut systems {
            outcome = system(self);
            if outcome.is_err() {
                break;
            }
        }
        // Systems registered during the step land behind the originals.
        systems.append(&mut self.systems);
        self.systems = systems;
        outcome
    }
}
