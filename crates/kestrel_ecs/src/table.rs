//! The entity table — the authoritative list of live entities.
//!
//! The table records every live entity in creation order together with its
//! component-presence mask. Creation-order traversal is what gives queries
//! their deterministic, reproducible iteration order.

use std::collections::HashMap;

use kestrel_component::{ComponentMask, Entity};

/// Per-entity bookkeeping: the component-presence mask. Dense slot
/// references live inside each registry's sparse index.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct EntityRecord {
    pub(crate) mask: ComponentMask,
}

/// The authoritative list of live entity identifiers.
#[derive(Debug, Default)]
pub(crate) struct EntityTable {
    /// Live entities in creation order.
    order: Vec<Entity>,
    /// Records keyed by identifier.
    records: HashMap<Entity, EntityRecord>,
}

impl EntityTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Inserts a freshly created entity with an empty mask.
    pub(crate) fn insert(&mut self, entity: Entity) {
        debug_assert!(!self.records.contains_key(&entity));
        self.order.push(entity);
        self.records.insert(entity, EntityRecord::default());
    }

    /// Removes an entity, preserving the creation order of the rest.
    ///
    /// Returns `false` if the entity was not live.
    pub(crate) fn remove(&mut self, entity: Entity) -> bool {
        if self.records.remove(&entity).is_none() {
            return false;
        }
        self.order.retain(|&e| e != entity);
        true
    }

    pub(crate) fn contains(&self, entity: Entity) -> bool {
        self.records.contains_key(&entity)
    }

    pub(crate) fn mask(&self, entity: Entity) -> Option<ComponentMask> {
        self.records.get(&entity).map(|r| r.mask)
    }

    pub(crate) fn record_mut(&mut self, entity: Entity) -> Option<&mut EntityRecord> {
        self.records.get_mut(&entity)
    }

    /// Iterates live entities in creation order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.order.iter().copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }
}

#[cfg(test)]
mod tests {
    use kestrel_component::ComponentIndex;

    use super::*;

    fn e(id: u64) -> Entity {
        Entity::from_raw(id)
    }

    #[test]
    fn test_insert_and_contains() {
        let mut table = EntityTable::new();
        table.insert(e(1));
        assert!(table.contains(e(1)));
        assert!(!table.contains(e(2)));
        assert_eq!(table.len(), 1);
        assert_eq!(table.mask(e(1)), Some(ComponentMask::EMPTY));
    }

    #[test]
    fn test_iteration_follows_creation_order() {
        let mut table = EntityTable::new();
        table.insert(e(3));
        table.insert(e(1));
        table.insert(e(2));

        let order: Vec<u64> = table.iter().map(Entity::id).collect();
        assert_eq!(order, vec![3, 1, 2]);
    }

    #[test]
    fn test_remove_preserves_order_of_rest() {
        let mut table = EntityTable::new();
        table.insert(e(1));
        table.insert(e(2));
        table.insert(e(3));

        assert!(table.remove(e(2)));
        assert!(!table.remove(e(2)));

        let order: Vec<u64> = table.iter().map(Entity::id).collect();
        assert_eq!(order, vec![1, 3]);
    }

    #[test]
    fn test_mask_updates() {
        let mut table = EntityTable::new();
        table.insert(e(1));
        let idx = ComponentIndex::new(4);

        table.record_mut(e(1)).unwrap().mask.set(idx);
        assert!(table.mask(e(1)).unwrap().contains(idx));

        table.record_mut(e(1)).unwrap().mask.clear(idx);
        assert!(!table.mask(e(1)).unwrap().contains(idx));
    }
}
