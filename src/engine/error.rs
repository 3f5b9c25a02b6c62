//! Error types for structural mutation, component access, and resources.
//!
//! Every failure in this engine is a synchronously detected contract
//! violation: a stale identifier, an unregistered component, a payload of
//! the wrong type. There is no retry path and no degraded mode, so each
//! error type models a single failure mode with enough structure to make
//! the violation actionable at the call site.
//!
//! Low-level operations return small, dedicated error types (e.g.
//! [`TypeMismatchError`]); orchestration code uses `?` to bubble them into
//! the aggregate [`EcsError`], which callers can match on or log.
//!
//! ## Display vs. Debug
//! * [`std::fmt::Display`] is optimized for operator logs (short,
//!   imperative phrasing).
//! * `Debug` (derived) retains full structure for diagnostics.

use std::any::TypeId;
use std::fmt;

use crate::engine::entity::EntityId;

/// Convenience alias for results carrying [`EcsError`].
pub type EcsResult<T> = Result<T, EcsError>;

/// Returned when a component payload's runtime type does not match the
/// value type declared for that component at registration.
///
/// ### Fields
/// * `component` — The component id whose column was targeted.
/// * `expected` — Name of the declared value type.
/// * `actual` — [`TypeId`] of the value the caller supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMismatchError {
    /// Component id whose declared value type was violated.
    pub component: EntityId,

    /// Human-readable name of the declared value type.
    pub expected: &'static str,

    /// Dynamic type of the supplied value.
    pub actual: TypeId,
}

impl fmt::Display for TypeMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type mismatch for component {}: expected {}, got {:?}",
            self.component, self.expected, self.actual
        )
    }
}

impl std::error::Error for TypeMismatchError {}

/// Aggregate error for all engine operations.
///
/// All variants are programmer-misuse contracts surfaced at the call
/// site; none leaves the entity's record pointing at partially updated
/// storage (validation happens before any state is published).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// The identifier's generation no longer matches its tracker slot.
    StaleEntity(EntityId),

    /// No record exists for the entity (never given components, or
    /// already destroyed).
    UnknownEntity(EntityId),

    /// The component id was never registered with a value type and no
    /// payload semantics can be resolved for it.
    UnknownComponent(EntityId),

    /// No component id has been registered for the requested Rust type.
    UnknownComponentType(&'static str),

    /// The entity's signature does not carry the component.
    ComponentNotPresent {
        /// Entity whose signature was inspected.
        entity: EntityId,
        /// Component that was absent.
        component: EntityId,
    },

    /// The component is already part of the entity's signature, or was
    /// listed twice in one call.
    DuplicateComponent {
        /// Entity being mutated.
        entity: EntityId,
        /// Component that was duplicated.
        component: EntityId,
    },

    /// A component declared with a value type was supplied no payload.
    MissingValue {
        /// Component whose payload was omitted.
        component: EntityId,
    },

    /// A payload was supplied for a component registered as a bare tag.
    UnexpectedValue {
        /// Tag component that received a payload.
        component: EntityId,
    },

    /// A payload's runtime type did not match the declared value type.
    TypeMismatch(TypeMismatchError),

    /// No resource of the requested type has been inserted.
    MissingResource(&'static str),
}

impl fmt::Display for EcsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EcsError::StaleEntity(entity) => {
                write!(f, "stale entity reference {entity}")
            }
            EcsError::UnknownEntity(entity) => {
                write!(f, "no record for entity {entity}")
            }
            EcsError::UnknownComponent(component) => {
                write!(f, "component {component} was never registered")
            }
            EcsError::UnknownComponentType(name) => {
                write!(f, "no component registered for type {name}")
            }
            EcsError::ComponentNotPresent { entity, component } => {
                write!(f, "entity {entity} does not carry component {component}")
            }
            EcsError::DuplicateComponent { entity, component } => {
                write!(f, "entity {entity} already carries component {component}")
            }
            EcsError::MissingValue { component } => {
                write!(f, "component {component} requires a value but none was supplied")
            }
            EcsError::UnexpectedValue { component } => {
                write!(f, "component {component} is a tag but a value was supplied")
            }
            EcsError::TypeMismatch(e) => write!(f, "{e}"),
            EcsError::MissingResource(name) => {
                write!(f, "no resource of type {name}")
            }
        }
    }
}

impl std::error::Error for EcsError {}

impl From<TypeMismatchError> for EcsError {
    fn from(e: TypeMismatchError) -> Self {
        EcsError::TypeMismatch(e)
    }
}
