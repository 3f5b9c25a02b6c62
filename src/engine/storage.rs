//! Type-erased, independently growable component columns.
//!
//! Each archetype stores one [`ComponentColumn<T>`] per value-carrying
//! component in its signature, indexed by row. Columns grow geometrically
//! and fill with `T::default()` beyond the written range; a row is never
//! read without a prior write in correct usage.
//!
//! The [`Column`] trait erases the element type so heterogeneous columns
//! can live in one container. It exposes exactly the capabilities the
//! engine needs:
//!
//! - element type identity for payload validation,
//! - a checked boxed write (the payload insertion path),
//! - an in-column row copy (the relocation mirror for entity-list
//!   compaction),
//! - a cross-column row transfer (archetype-to-archetype moves), which
//!   clones the value directly between typed columns without boxing,
//! - an empty-clone factory so a destination archetype can materialize a
//!   matching column lazily.
//!
//! Typed access goes through `as_any`/`as_any_mut` downcasting, which
//! succeeds only when the requested type matches the column's element
//! type.

use std::any::{type_name, Any, TypeId};

use crate::engine::entity::EntityId;
use crate::engine::error::TypeMismatchError;
use crate::engine::types::{Row, INITIAL_CAPACITY};

/// Dynamically typed interface over a single component column.
pub trait Column {
    /// Immutable `Any` view for downcasting to the typed column.
    fn as_any(&self) -> &dyn Any;

    /// Mutable `Any` view for downcasting to the typed column.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// `TypeId` of the element type stored by this column.
    fn element_type_id(&self) -> TypeId;

    /// Human-readable name of the element type.
    fn element_type_name(&self) -> &'static str;

    /// Number of rows currently backed by storage.
    fn written_len(&self) -> usize;

    /// Writes a boxed value at `row`, growing the column as needed.
    ///
    /// Fails if the value's dynamic type does not match the element type;
    /// `component` only labels the error.
    fn write_boxed(
        &mut self,
        component: EntityId,
        row: Row,
        value: Box<dyn Any>,
    ) -> Result<(), TypeMismatchError>;

    /// Copies the value at `from` over the value at `to` within this
    /// column.
    fn copy_row(&mut self, from: Row, to: Row);

    /// Clones the value at `row` into `destination` at
    /// `destination_row`.
    ///
    /// Fails if `destination` stores a different element type.
    fn transfer_row(
        &self,
        component: EntityId,
        row: Row,
        destination: &mut dyn Column,
        destination_row: Row,
    ) -> Result<(), TypeMismatchError>;

    /// A fresh, empty column of the same element type.
    fn new_empty(&self) -> Box<dyn Column>;
}

/// Growable column of `T` values indexed by row.
pub struct ComponentColumn<T> {
    data: Vec<T>,
}

impl<T: Default + Clone + 'static> Default for ComponentColumn<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default + Clone + 'static> ComponentColumn<T> {
    /// Creates a column backed by the engine's initial capacity of
    /// default values.
    pub fn new() -> Self {
        Self {
            data: vec![T::default(); INITIAL_CAPACITY],
        }
    }

    fn grow_to(&mut self, index: usize) {
        let mut new_len = self.data.len();
        while new_len <= index {
            new_len *= 2;
        }
        self.data.resize(new_len, T::default());
    }

    /// Writes `value` at `row`, doubling the backing storage until the
    /// row is addressable.
    pub fn set(&mut self, row: Row, value: T) {
        let index = row as usize;
        if index >= self.data.len() {
            self.grow_to(index);
        }
        self.data[index] = value;
    }

    /// Value at `row`, if the row is backed by storage.
    #[inline]
    pub fn get(&self, row: Row) -> Option<&T> {
        self.data.get(row as usize)
    }

    /// Exclusive view of the value at `row`.
    ///
    /// Valid only until the next structural mutation of the owning
    /// archetype.
    #[inline]
    pub fn get_mut(&mut self, row: Row) -> Option<&mut T> {
        self.data.get_mut(row as usize)
    }
}

impl<T: Default + Clone + 'static> Column for ComponentColumn<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn element_type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn element_type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn written_len(&self) -> usize {
        self.data.len()
    }

    fn write_boxed(
        &mut self,
        component: EntityId,
        row: Row,
        value: Box<dyn Any>,
    ) -> Result<(), TypeMismatchError> {
        match value.downcast::<T>() {
            Ok(value) => {
                self.set(row, *value);
                Ok(())
            }
            Err(value) => Err(TypeMismatchError {
                component,
                expected: type_name::<T>(),
                actual: value.as_ref().type_id(),
            }),
        }
    }

    fn copy_row(&mut self, from: Row, to: Row) {
        let value = self.data[from as usize].clone();
        self.set(to, value);
    }

    fn transfer_row(
        &self,
        component: EntityId,
        row: Row,
        destination: &mut dyn Column,
        destination_row: Row,
    ) -> Result<(), TypeMismatchError> {
        let actual = destination.element_type_id();
        match destination.as_any_mut().downcast_mut::<ComponentColumn<T>>() {
            Some(destination) => {
                destination.set(destination_row, self.data[row as usize].clone());
                Ok(())
            }
            None => Err(TypeMismatchError {
                component,
                expected: type_name::<T>(),
                actual,
            }),
        }
    }

    fn new_empty(&self) -> Box<dyn Column> {
        Box::new(ComponentColumn::<T>::new())
    }
}
