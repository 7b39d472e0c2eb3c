//! Entity type and allocation utilities.
//!
//! An [`Entity`] is a lightweight `u64` identifier with no inherent data.
//! All entity IDs are allocated by the manager to ensure uniqueness among
//! live entities.

use serde::{Deserialize, Serialize};

/// A unique entity identifier.
///
/// Entities are pure identifiers — they carry no data of their own.
/// Components are attached to entities to give them meaning.
///
/// Identifiers are unique among *currently live* entities. After removal an
/// identifier may be recycled for a later entity, but the allocator never
/// hands out an identifier that collides with a live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity(pub u64);

impl Entity {
    /// The null / "no entity" sentinel.
    pub const INVALID: Entity = Entity(0);

    /// Create an entity from a raw `u64` identifier.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` identifier.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }

    /// Returns `true` if this is a valid (non-sentinel) entity.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Allocates entity IDs, recycling released ones through a free list.
///
/// The allocator lives in the manager and is the single source of truth
/// for entity identity. IDs start at 1; 0 is reserved for
/// [`Entity::INVALID`]. A released ID may be handed out again, but only
/// after its previous owner is gone.
#[derive(Debug)]
pub struct EntityAllocator {
    next_id: u64,
    free: Vec<u64>,
}

impl EntityAllocator {
    /// Creates a new allocator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            free: Vec::new(),
        }
    }

    /// Allocates an entity ID, preferring recycled ones.
    pub fn allocate(&mut self) -> Entity {
        if let Some(id) = self.free.pop() {
            return Entity(id);
        }
        let id = self.next_id;
        self.next_id += 1;
        Entity(id)
    }

    /// Returns an ID to the free list for reuse.
    ///
    /// The caller must guarantee the entity is no longer live; releasing a
    /// live ID would let the allocator hand out a colliding identifier.
    pub fn release(&mut self, entity: Entity) {
        if entity.is_valid() {
            self.free.push(entity.id());
        }
    }

    /// Returns the number of IDs handed out so far, including recycled slots.
    #[must_use]
    pub fn allocated(&self) -> u64 {
        self.next_id - 1
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_creation() {
        let e = Entity::from_raw(42);
        assert_eq!(e.id(), 42);
        assert!(e.is_valid());
    }

    #[test]
    fn test_entity_invalid() {
        assert!(!Entity::INVALID.is_valid());
        assert_eq!(Entity::INVALID.id(), 0);
    }

    #[test]
    fn test_allocator_produces_unique_ids() {
        let mut alloc = EntityAllocator::new();
        let e1 = alloc.allocate();
        let e2 = alloc.allocate();
        let e3 = alloc.allocate();
        assert_eq!(e1.id(), 1);
        assert_eq!(e2.id(), 2);
        assert_eq!(e3.id(), 3);
        assert_eq!(alloc.allocated(), 3);
    }

    #[test]
    fn test_allocator_recycles_released_ids() {
        let mut alloc = EntityAllocator::new();
        let e1 = alloc.allocate();
        let _e2 = alloc.allocate();
        alloc.release(e1);

        let e3 = alloc.allocate();
        assert_eq!(e3, e1, "released ID should be recycled");

        // No new raw IDs were consumed by the recycled allocation.
        assert_eq!(alloc.allocated(), 2);
    }

    #[test]
    fn test_allocator_never_releases_sentinel() {
        let mut alloc = EntityAllocator::new();
        alloc.release(Entity::INVALID);
        let e = alloc.allocate();
        assert!(e.is_valid());
        assert_ne!(e, Entity::INVALID);
    }
}
