//! The entity index: archetype graph ownership and structural mutation.
//!
//! [`EntityIndex`] owns the root (empty-signature) archetype, the full
//! archetype list, and the per-entity records mapping each entity to its
//! current archetype and row. Every structural mutation (adding or
//! removing component types, destroying an entity) funnels through one
//! internal row-move routine so that the entity list and every component
//! column stay in lock-step.
//!
//! ## Graph walk
//! `add` and `remove` walk the archetype graph one component at a time:
//! a cached edge is followed when present, otherwise the successor
//! signature is built, resolved against the archetype list by value
//! equality (an equal signature is never duplicated), and the edge taken
//! is cached for the next walk. Repeated add/remove patterns are thereby
//! O(1) amortized instead of O(archetype count).
//!
//! ## Failure atomicity
//! Payloads and signature membership are validated before any state is
//! mutated, and the record is published last; a rejected call leaves the
//! entity exactly where it was.
//!
//! ## Queries
//! [`each`](EntityIndex::each) and [`all`](EntityIndex::all) scan the
//! archetype list linearly with no caching: a query issued immediately
//! after a structural mutation reflects it exactly. Both borrow the
//! index, so structural mutation while a scan is in progress is rejected
//! at compile time.

use std::any::{Any, TypeId};

use log::debug;

use crate::engine::archetype::Archetype;
use crate::engine::entity::EntityId;
use crate::engine::entity_type::EntityType;
use crate::engine::error::{EcsError, EcsResult, TypeMismatchError};
use crate::engine::sparse::SparseSet;
use crate::engine::storage::{Column, ComponentColumn};
use crate::engine::types::{ArchetypeId, Row};

/// Archetype id of the root (empty-signature) archetype.
pub const ROOT: ArchetypeId = 0;

/// Per-entity location: current archetype and row.
///
/// `row` is `None` until the entity's first structural write lands it in
/// a table.
#[derive(Clone, Copy, Debug)]
pub struct Record {
    /// Archetype currently holding the entity.
    pub archetype: ArchetypeId,
    /// Row within that archetype, once occupied.
    pub row: Option<Row>,
}

/// Declared value type for a registered component, plus the factory used
/// to materialize columns for it.
#[derive(Clone, Copy)]
pub struct ColumnSpec {
    /// Runtime type of the component's values.
    pub type_id: TypeId,
    /// Human-readable name of the value type.
    pub type_name: &'static str,
    /// Allocates an empty column for this value type.
    pub new_column: fn() -> Box<dyn Column>,
}

fn new_column_of<T: Default + Clone + 'static>() -> Box<dyn Column> {
    Box::new(ComponentColumn::<T>::new())
}

impl ColumnSpec {
    /// Spec describing columns of value type `T`.
    pub fn of<T: Default + Clone + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            new_column: new_column_of::<T>,
        }
    }
}

/// A component payload handed to [`EntityIndex::add`]: the component id
/// and its boxed value, or `None` for a tag.
pub type ComponentValue = (EntityId, Option<Box<dyn Any>>);

/// Owns the archetype graph and performs entity moves between tables.
pub struct EntityIndex {
    archetypes: Vec<Archetype>,
    index: SparseSet<EntityId, Record>,
    data_types: SparseSet<EntityId, ColumnSpec>,
}

impl Default for EntityIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityIndex {
    /// Creates an index holding only the root archetype.
    pub fn new() -> Self {
        Self {
            archetypes: vec![Archetype::new(EntityType::empty())],
            index: SparseSet::new(),
            data_types: SparseSet::new(),
        }
    }

    /// Declares the value type backing `component`.
    ///
    /// Components never registered here are treated as bare tags.
    /// Registering the same component twice is a contract violation.
    pub fn register(&mut self, component: EntityId, spec: ColumnSpec) {
        debug_assert!(
            !self.data_types.has(component),
            "component registered twice"
        );
        debug!("registered component {component} with value type {}", spec.type_name);
        self.data_types.add(component, spec);
    }

    /// Declared value type of `component`, if any.
    #[inline]
    pub fn data_type(&self, component: EntityId) -> Option<&ColumnSpec> {
        self.data_types.get(component)
    }

    /// All archetypes in creation order; the root is first.
    #[inline]
    pub fn archetypes(&self) -> &[Archetype] {
        &self.archetypes
    }

    #[inline]
    pub(crate) fn archetypes_mut(&mut self) -> &mut [Archetype] {
        &mut self.archetypes
    }

    /// Archetype with the given id.
    #[inline]
    pub fn archetype(&self, id: ArchetypeId) -> &Archetype {
        &self.archetypes[id as usize]
    }

    /// Number of archetypes, the root included.
    #[inline]
    pub fn archetype_count(&self) -> usize {
        self.archetypes.len()
    }

    /// Record for `entity`, if it has one.
    #[inline]
    pub fn record(&self, entity: EntityId) -> Option<Record> {
        self.index.get(entity).copied()
    }

    /// Archetype holding the given signature, found by value equality
    /// over the archetype list; created if no equal signature exists.
    fn find_or_create(&mut self, kind: EntityType) -> ArchetypeId {
        if kind.is_empty() {
            return ROOT;
        }
        for (id, archetype) in self.archetypes.iter().enumerate() {
            if *archetype.kind() == kind {
                return id as ArchetypeId;
            }
        }
        let id = self.archetypes.len() as ArchetypeId;
        debug!("created archetype {id} {kind}");
        self.archetypes.push(Archetype::new(kind));
        id
    }

    /// Neighbor of `from` reached by adding `component`, resolving and
    /// caching the edge on first use.
    fn successor(
        &mut self,
        from: ArchetypeId,
        entity: EntityId,
        component: EntityId,
    ) -> EcsResult<ArchetypeId> {
        let archetype = &self.archetypes[from as usize];
        if archetype.kind().has(component) {
            return Err(EcsError::DuplicateComponent { entity, component });
        }
        if let Some(next) = archetype.edge(component) {
            return Ok(next);
        }
        let next_kind = archetype.kind().with(component);
        let next = self.find_or_create(next_kind);
        self.archetypes[from as usize].cache_edge(component, next);
        Ok(next)
    }

    /// Neighbor of `from` reached by removing `component`, resolving and
    /// caching the edge on first use.
    fn predecessor(
        &mut self,
        from: ArchetypeId,
        entity: EntityId,
        component: EntityId,
    ) -> EcsResult<ArchetypeId> {
        let archetype = &self.archetypes[from as usize];
        if !archetype.kind().has(component) {
            return Err(EcsError::ComponentNotPresent { entity, component });
        }
        if let Some(next) = archetype.edge(component) {
            return Ok(next);
        }
        let next_kind = archetype.kind().without(component);
        let next = self.find_or_create(next_kind);
        self.archetypes[from as usize].cache_edge(component, next);
        Ok(next)
    }

    /// Exclusive views of two distinct archetypes.
    fn pair_mut(
        archetypes: &mut [Archetype],
        a: ArchetypeId,
        b: ArchetypeId,
    ) -> (&mut Archetype, &mut Archetype) {
        assert!(a != b, "source and destination archetype must differ");
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = archetypes.split_at_mut(high as usize);
        let low_reference = &mut head[low as usize];
        let high_reference = &mut tail[0];
        if a < b {
            (low_reference, high_reference)
        } else {
            (high_reference, low_reference)
        }
    }

    /// Moves an entity's row into `destination`, returning the new row.
    ///
    /// Allocates the destination row (vacated row first, else append),
    /// inserts the entity into the destination entity list, copies every
    /// shared component value whose column exists across at
    /// `(source row -> new row)`, then evicts the source row — triggering
    /// the source table's internal compaction. This is the single choke
    /// point preserving entity-list/column alignment across every
    /// structural mutation.
    fn move_record(
        &mut self,
        entity: EntityId,
        record: Record,
        destination: ArchetypeId,
    ) -> EcsResult<Row> {
        let new_row = self.archetypes[destination as usize].allocate_row();
        self.archetypes[destination as usize].place(new_row, entity);
        if let Some(source_row) = record.row {
            if record.archetype == destination {
                let archetype = &mut self.archetypes[destination as usize];
                archetype.copy_row_values(source_row, new_row);
                archetype.evict_row(source_row);
            } else {
                let (source, target) =
                    Self::pair_mut(&mut self.archetypes, record.archetype, destination);
                for &component in source.kind().ids() {
                    if !target.kind().has(component) {
                        continue;
                    }
                    if let Some(column) = source.column(component) {
                        let target_column =
                            target.column_or_create_with(component, || column.new_empty());
                        column.transfer_row(component, source_row, target_column, new_row)?;
                    }
                }
                source.evict_row(source_row);
            }
        }
        Ok(new_row)
    }

    fn validate_payloads(&self, components: &[ComponentValue]) -> EcsResult<()> {
        for (component, payload) in components {
            match (payload, self.data_types.get(*component)) {
                (Some(payload), Some(spec)) => {
                    let actual = payload.as_ref().type_id();
                    if actual != spec.type_id {
                        return Err(TypeMismatchError {
                            component: *component,
                            expected: spec.type_name,
                            actual,
                        }
                        .into());
                    }
                }
                (Some(_), None) => {
                    return Err(EcsError::UnexpectedValue { component: *component })
                }
                (None, Some(_)) => return Err(EcsError::MissingValue { component: *component }),
                (None, None) => {}
            }
        }
        Ok(())
    }

    /// Adds the listed components to `entity`, moving it to the matching
    /// archetype and storing each payload at the destination row.
    ///
    /// Entities without a record start at the root archetype. A component
    /// already present in the entity's signature (or listed twice) is
    /// rejected; payloads are validated against the declared value types
    /// before any state changes.
    pub fn add(&mut self, entity: EntityId, components: Vec<ComponentValue>) -> EcsResult<()> {
        self.validate_payloads(&components)?;

        let record = self.record(entity).unwrap_or(Record {
            archetype: ROOT,
            row: None,
        });

        let mut destination = record.archetype;
        for (component, _) in &components {
            destination = self.successor(destination, entity, *component)?;
        }

        let new_row = self.move_record(entity, record, destination)?;

        for (component, payload) in components {
            let Some(payload) = payload else { continue };
            let spec = self
                .data_types
                .get(component)
                .expect("payload validated against a registered component");
            let make = spec.new_column;
            let archetype = &mut self.archetypes[destination as usize];
            let column = archetype.column_or_create_with(component, make);
            column.write_boxed(component, new_row, payload)?;
        }

        self.publish(entity, destination, new_row);
        Ok(())
    }

    /// Removes the listed components from `entity`, moving it to the
    /// matching archetype.
    pub fn remove(&mut self, entity: EntityId, components: &[EntityId]) -> EcsResult<()> {
        let record = self.record(entity).ok_or(EcsError::UnknownEntity(entity))?;

        let mut destination = record.archetype;
        for &component in components {
            destination = self.predecessor(destination, entity, component)?;
        }

        let new_row = self.move_record(entity, record, destination)?;
        self.publish(entity, destination, new_row);
        Ok(())
    }

    /// Severs `entity` from all component data and drops its record.
    ///
    /// The entity is moved to the root archetype (the move finds no
    /// destination columns to populate), its root row is returned to the
    /// root free list, and the record is removed. Recycling the
    /// identifier is the caller's (tracker's) concern.
    pub fn destroy(&mut self, entity: EntityId) -> EcsResult<()> {
        let record = self.record(entity).ok_or(EcsError::UnknownEntity(entity))?;
        let root_row = self.move_record(entity, record, ROOT)?;
        self.archetypes[ROOT as usize].evict_row(root_row);
        self.index.remove(entity);
        Ok(())
    }

    fn publish(&mut self, entity: EntityId, archetype: ArchetypeId, row: Row) {
        match self.index.get_mut(entity) {
            Some(record) => {
                record.archetype = archetype;
                record.row = Some(row);
            }
            None => self.index.add(
                entity,
                Record {
                    archetype,
                    row: Some(row),
                },
            ),
        }
    }

    /// Shared view of `entity`'s value for `component`.
    pub fn get<T: Default + Clone + 'static>(
        &self,
        entity: EntityId,
        component: EntityId,
    ) -> EcsResult<&T> {
        let (archetype, row, spec) = self.locate(entity, component)?;
        let column = archetype
            .column(component)
            .ok_or(EcsError::ComponentNotPresent { entity, component })?;
        let column = column
            .as_any()
            .downcast_ref::<ComponentColumn<T>>()
            .ok_or(TypeMismatchError {
                component,
                expected: spec.type_name,
                actual: TypeId::of::<T>(),
            })?;
        column
            .get(row)
            .ok_or(EcsError::ComponentNotPresent { entity, component })
    }

    /// Exclusive view of `entity`'s value for `component`.
    ///
    /// Valid only until the next structural mutation on the index.
    pub fn get_mut<T: Default + Clone + 'static>(
        &mut self,
        entity: EntityId,
        component: EntityId,
    ) -> EcsResult<&mut T> {
        let (_, row, spec) = self.locate(entity, component)?;
        let spec_name = spec.type_name;
        let record = self.record(entity).ok_or(EcsError::UnknownEntity(entity))?;
        let archetype = &mut self.archetypes[record.archetype as usize];
        let column = archetype
            .column_mut(component)
            .ok_or(EcsError::ComponentNotPresent { entity, component })?;
        let column = column
            .as_any_mut()
            .downcast_mut::<ComponentColumn<T>>()
            .ok_or(TypeMismatchError {
                component,
                expected: spec_name,
                actual: TypeId::of::<T>(),
            })?;
        column
            .get_mut(row)
            .ok_or(EcsError::ComponentNotPresent { entity, component })
    }

    fn locate(
        &self,
        entity: EntityId,
        component: EntityId,
    ) -> EcsResult<(&Archetype, Row, &ColumnSpec)> {
        let record = self.record(entity).ok_or(EcsError::UnknownEntity(entity))?;
        let row = record
            .row
            .ok_or(EcsError::ComponentNotPresent { entity, component })?;
        let archetype = &self.archetypes[record.archetype as usize];
        if !archetype.kind().has(component) {
            return Err(EcsError::ComponentNotPresent { entity, component });
        }
        let spec = self
            .data_types
            .get(component)
            .ok_or(EcsError::UnknownComponent(component))?;
        Ok((archetype, row, spec))
    }

    /// Invokes `visit` with every `(archetype, row)` whose signature
    /// carries all of `kind`, scanning archetypes linearly in creation
    /// order and rows in current dense order.
    pub fn each<F>(&self, kind: &EntityType, mut visit: F)
    where
        F: FnMut(&Archetype, Row),
    {
        for archetype in &self.archetypes {
            if !archetype.kind().has_all(kind) {
                continue;
            }
            for dense in 0..archetype.len() {
                visit(archetype, archetype.row_at(dense));
            }
        }
    }

    /// Lazy sequence of `(archetype, row)` pairs matching `kind`.
    ///
    /// The scan is uncached and finite; calling `all` again restarts it.
    pub fn all<'a>(&'a self, kind: &'a EntityType) -> Matches<'a> {
        Matches {
            archetypes: &self.archetypes,
            kind,
            cursor: 0,
            dense: 0,
        }
    }
}

/// Iterator over `(archetype, row)` pairs matching a signature.
pub struct Matches<'a> {
    archetypes: &'a [Archetype],
    kind: &'a EntityType,
    cursor: usize,
    dense: usize,
}

impl<'a> Iterator for Matches<'a> {
    type Item = (&'a Archetype, Row);

    fn next(&mut self) -> Option<Self::Item> {
        while self.cursor < self.archetypes.len() {
            let archetype = &self.archetypes[self.cursor];
            if archetype.kind().has_all(self.kind) && self.dense < archetype.len() {
                let row = archetype.row_at(self.dense);
                self.dense += 1;
                return Some((archetype, row));
            }
            self.cursor += 1;
            self.dense = 0;
        }
        None
    }
}
