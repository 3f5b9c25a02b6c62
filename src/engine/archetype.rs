//! Archetype tables: one columnar table per distinct signature.
//!
//! An archetype owns the entities sharing one exact component-type
//! signature. Rows are the shared coordinate space across the entity
//! list and every component column; preserving that alignment under
//! every mutation is the central invariant of the engine.
//!
//! ## Structure
//! - `entities` — sparse set keyed by row (identity index) mapping each
//!   occupied row to the entity holding it. Its dense order is the scan
//!   order for queries.
//! - `data` — sparse set from component id to that component's column,
//!   created lazily on first write. Tag components never own a column.
//! - `free` — FIFO queue of vacated rows, reused before appending.
//! - `edges` — cache of single-component structural transitions to
//!   neighboring archetypes, keyed by the toggled component id.
//!
//! ## Invariants
//! - A row is either occupied (present in `entities`) or queued in
//!   `free`; the occupied and free rows together always form the range
//!   `0..(len + free.len())`, so appending at the current dense size
//!   yields a fresh row.
//! - Rows are stable for as long as they are occupied: eviction compacts
//!   the entity list's dense order but never renumbers a surviving row,
//!   so row-indexed columns stay aligned without copying. Column values
//!   move only when an entity moves rows.

use crate::engine::entity::EntityId;
use crate::engine::entity_type::EntityType;
use crate::engine::sparse::SparseSet;
use crate::engine::storage::{Column, ComponentColumn};
use crate::engine::types::{ArchetypeId, Row};

use std::collections::VecDeque;

/// One table per distinct component-type signature.
pub struct Archetype {
    kind: EntityType,
    entities: SparseSet<Row, EntityId>,
    data: SparseSet<EntityId, Box<dyn Column>>,
    free: VecDeque<Row>,
    edges: SparseSet<EntityId, ArchetypeId>,
}

impl Archetype {
    /// Creates an empty table for the given signature.
    pub fn new(kind: EntityType) -> Self {
        Self {
            kind,
            entities: SparseSet::new(),
            data: SparseSet::new(),
            free: VecDeque::new(),
            edges: SparseSet::new(),
        }
    }

    /// Signature identifying this archetype.
    #[inline]
    pub fn kind(&self) -> &EntityType {
        &self.kind
    }

    /// Number of entities currently resident.
    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if no entities are resident.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entity occupying `row`, if the row is occupied.
    #[inline]
    pub fn entity_at(&self, row: Row) -> Option<EntityId> {
        self.entities.get(row).copied()
    }

    /// Row stored at a dense scan position.
    #[inline]
    pub fn row_at(&self, dense: usize) -> Row {
        self.entities.key_at(dense)
    }

    /// Column for `component`, if one has been materialized.
    #[inline]
    pub fn column(&self, component: EntityId) -> Option<&dyn Column> {
        self.data.get(component).map(|column| column.as_ref())
    }

    /// Exclusive view of the column for `component`.
    #[inline]
    pub fn column_mut(&mut self, component: EntityId) -> Option<&mut Box<dyn Column>> {
        self.data.get_mut(component)
    }

    /// Column for `component`, materializing it with `make` on first use.
    pub fn column_or_create_with<F>(&mut self, component: EntityId, make: F) -> &mut Box<dyn Column>
    where
        F: FnOnce() -> Box<dyn Column>,
    {
        if !self.data.has(component) {
            self.data.add(component, make());
        }
        self.data
            .get_mut(component)
            .expect("column present after insertion")
    }

    /// Value of `component` at `row`, downcast to `T`.
    pub fn get_component<T: Default + Clone + 'static>(
        &self,
        row: Row,
        component: EntityId,
    ) -> Option<&T> {
        self.data
            .get(component)?
            .as_any()
            .downcast_ref::<ComponentColumn<T>>()?
            .get(row)
    }

    /// Exclusive view of `component` at `row`, downcast to `T`.
    ///
    /// Valid only until the next structural mutation of this archetype.
    pub fn get_component_mut<T: Default + Clone + 'static>(
        &mut self,
        row: Row,
        component: EntityId,
    ) -> Option<&mut T> {
        self.data
            .get_mut(component)?
            .as_any_mut()
            .downcast_mut::<ComponentColumn<T>>()?
            .get_mut(row)
    }

    /// Allocates a destination row: a vacated row if one is queued,
    /// otherwise the next append position.
    pub fn allocate_row(&mut self) -> Row {
        match self.free.pop_front() {
            Some(row) => row,
            None => self.entities.len() as Row,
        }
    }

    /// Records `entity` as the occupant of `row`.
    pub fn place(&mut self, row: Row, entity: EntityId) {
        self.entities.add(row, entity);
    }

    /// Vacates `row`: queues it for reuse and removes it from the entity
    /// list. Surviving rows keep their numbers, so column storage needs
    /// no adjustment; the row's stale column values are overwritten when
    /// the row is reused.
    pub fn evict_row(&mut self, row: Row) {
        self.free.push_back(row);
        self.entities.remove(row);
    }

    /// Copies every materialized column value from `from` to `to` within
    /// this table. Used when an entity moves rows without changing
    /// archetype.
    pub(crate) fn copy_row_values(&mut self, from: Row, to: Row) {
        let kind = &self.kind;
        let data = &mut self.data;
        for &component in kind.ids() {
            if let Some(column) = data.get_mut(component) {
                column.copy_row(from, to);
            }
        }
    }

    /// Cached neighbor reached by toggling `component`, if the edge has
    /// been taken before.
    #[inline]
    pub fn edge(&self, component: EntityId) -> Option<ArchetypeId> {
        self.edges.get(component).copied()
    }

    /// Caches the neighbor reached by toggling `component`.
    pub fn cache_edge(&mut self, component: EntityId, destination: ArchetypeId) {
        self.edges.add(component, destination);
    }

    /// Invokes `f` with each resident entity and a shared view of its
    /// `component` value, in dense scan order.
    pub fn for_each_row_ref<T, F>(&self, component: EntityId, mut f: F)
    where
        T: Default + Clone + 'static,
        F: FnMut(EntityId, &T),
    {
        let Some(column) = self.data.get(component) else {
            return;
        };
        let Some(column) = column.as_any().downcast_ref::<ComponentColumn<T>>() else {
            return;
        };
        for dense in 0..self.entities.len() {
            let row = self.entities.key_at(dense);
            let entity = *self.entities.value_at(dense);
            if let Some(value) = column.get(row) {
                f(entity, value);
            }
        }
    }

    /// Invokes `f` with each resident entity and an exclusive view of its
    /// `component` value, in dense scan order.
    pub fn for_each_row_mut<T, F>(&mut self, component: EntityId, mut f: F)
    where
        T: Default + Clone + 'static,
        F: FnMut(EntityId, &mut T),
    {
        let entities = &self.entities;
        let Some(column) = self.data.get_mut(component) else {
            return;
        };
        let Some(column) = column.as_any_mut().downcast_mut::<ComponentColumn<T>>() else {
            return;
        };
        for dense in 0..entities.len() {
            let row = entities.key_at(dense);
            let entity = *entities.value_at(dense);
            if let Some(value) = column.get_mut(row) {
                f(entity, value);
            }
        }
    }

    /// Invokes `f` with each resident entity, a shared view of its `A`
    /// value, and an exclusive view of its `B` value.
    pub fn for_each_row_ref_mut<A, B, F>(
        &mut self,
        component_a: EntityId,
        component_b: EntityId,
        mut f: F,
    ) where
        A: Default + Clone + 'static,
        B: Default + Clone + 'static,
        F: FnMut(EntityId, &A, &mut B),
    {
        let entities = &self.entities;
        let (column_a, column_b) = self.data.get_pair_mut(component_a, component_b);
        let (Some(column_a), Some(column_b)) = (column_a, column_b) else {
            return;
        };
        let Some(column_a) = column_a.as_any().downcast_ref::<ComponentColumn<A>>() else {
            return;
        };
        let Some(column_b) = column_b.as_any_mut().downcast_mut::<ComponentColumn<B>>() else {
            return;
        };
        for dense in 0..entities.len() {
            let row = entities.key_at(dense);
            let entity = *entities.value_at(dense);
            if let (Some(a), Some(b)) = (column_a.get(row), column_b.get_mut(row)) {
                f(entity, a, b);
            }
        }
    }
}
