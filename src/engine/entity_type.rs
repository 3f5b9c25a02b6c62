//! Component-type signatures.
//!
//! An [`EntityType`] is the sorted list of component ids that identifies
//! an archetype. Identity is by content: two signatures constructed from
//! the same ids in any order are equal and hash equally, which is what
//! lets the entity index deduplicate archetypes by value.

use std::fmt;

use crate::engine::entity::EntityId;

/// Immutable sorted list of component ids identifying an archetype.
///
/// Duplicate ids are not expected; the structural-mutation paths reject
/// inputs that would produce them.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct EntityType {
    ids: Vec<EntityId>,
}

impl EntityType {
    /// Builds a signature from a list of component ids, sorting in place.
    pub fn new(mut ids: Vec<EntityId>) -> Self {
        ids.sort();
        Self { ids }
    }

    /// The empty signature (identifies the root archetype).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of component ids in the signature.
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` for the empty signature.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Sorted component ids.
    #[inline]
    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    /// Returns `true` if `component` appears in this signature.
    ///
    /// Linear scan; signatures are short.
    pub fn has(&self, component: EntityId) -> bool {
        self.ids.iter().any(|&id| id == component)
    }

    /// Returns `true` if every id in `other` appears in this signature.
    ///
    /// Single merge pass over both sorted lists; the empty signature is
    /// contained in every signature.
    pub fn has_all(&self, other: &EntityType) -> bool {
        if other.ids.len() > self.ids.len() {
            return false;
        }
        let mut needed = other.ids.iter();
        let mut next = needed.next();
        for &id in &self.ids {
            match next {
                Some(&want) if want == id => next = needed.next(),
                Some(_) => {}
                None => break,
            }
        }
        next.is_none()
    }

    /// Signature produced by adding one component id.
    pub fn with(&self, component: EntityId) -> EntityType {
        let mut ids = Vec::with_capacity(self.ids.len() + 1);
        ids.extend_from_slice(&self.ids);
        ids.push(component);
        EntityType::new(ids)
    }

    /// Signature produced by removing one component id.
    pub fn without(&self, component: EntityId) -> EntityType {
        let ids = self
            .ids
            .iter()
            .copied()
            .filter(|&id| id != component)
            .collect();
        // Filtering a sorted list preserves order; no re-sort needed.
        EntityType { ids }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, id) in self.ids.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{id}")?;
        }
        write!(f, "]")
    }
}
