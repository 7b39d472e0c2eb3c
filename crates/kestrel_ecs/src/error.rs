//! Error types for the entity-component core.
//!
//! The taxonomy is small on purpose. Identifier and type-contract
//! violations are surfaced to the immediate caller and never retried.
//! Capacity overflow in event buffers is absorbed locally by the buffers
//! themselves, and a single-answer broadcast with no responder resolves to
//! the [`Entity::INVALID`](kestrel_component::Entity::INVALID) sentinel —
//! neither is an error here.

use kestrel_component::Entity;
use thiserror::Error;

/// Errors surfaced by the entity-component core.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EcsError {
    /// An operation referenced an identifier with no live entity.
    #[error("entity {0} not found")]
    EntityNotFound(Entity),

    /// A typed access was made on an entity lacking that component.
    ///
    /// This is a programmer contract violation; callers are expected to
    /// guard with `has`.
    #[error("component '{component}' not present on {entity}")]
    ComponentNotPresent {
        /// The entity that was accessed.
        entity: Entity,
        /// The missing component's type name.
        component: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EcsError::EntityNotFound(Entity::from_raw(7));
        assert_eq!(err.to_string(), "entity Entity(7) not found");

        let err = EcsError::ComponentNotPresent {
            entity: Entity::from_raw(3),
            component: "Transform",
        };
        assert_eq!(
            err.to_string(),
            "component 'Transform' not present on Entity(3)"
        );
    }
}
