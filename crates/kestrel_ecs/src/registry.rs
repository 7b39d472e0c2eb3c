//! Per-type component registries.
//!
//! A [`Registry<T>`] owns every live instance of one component type,
//! stored in a sparse-to-dense set: a sparse index keyed by entity ID
//! points into dense, tightly packed entity and data arrays. Traversal
//! touches only live instances, never the sparse universe of identifiers,
//! and removal is a swap-remove on the dense arrays.
//!
//! Registries are type-erased behind [`AnyRegistry`] so the manager can
//! hold one map over all component types and strip an entity's components
//! without knowing their concrete types.

use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};

use kestrel_component::{Component, ComponentIndex, Entity};

const EMPTY: u32 = u32::MAX;

/// Sparse-to-dense storage for one component type.
#[derive(Debug)]
pub(crate) struct SparseSet<T> {
    sparse: Vec<u32>,
    dense: Vec<Entity>,
    data: Vec<T>,
}

impl<T> SparseSet<T> {
    pub(crate) fn new() -> Self {
        Self {
            sparse: Vec::new(),
            dense: Vec::new(),
            data: Vec::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, entity: Entity) -> bool {
        let idx = entity.id() as usize;
        idx < self.sparse.len() && self.sparse[idx] != EMPTY
    }

    /// Inserts or replaces the instance for `entity`, returning the
    /// replaced value if any.
    pub(crate) fn insert(&mut self, entity: Entity, value: T) -> Option<T> {
        let idx = entity.id() as usize;
        if idx >= self.sparse.len() {
            self.sparse.resize(idx + 1, EMPTY);
        }
        if self.sparse[idx] != EMPTY {
            let dense_idx = self.sparse[idx] as usize;
            return Some(std::mem::replace(&mut self.data[dense_idx], value));
        }
        self.sparse[idx] = self.dense.len() as u32;
        self.dense.push(entity);
        self.data.push(value);
        None
    }

    /// Removes the instance for `entity` via swap-remove.
    pub(crate) fn remove(&mut self, entity: Entity) -> Option<T> {
        let idx = entity.id() as usize;
        if idx >= self.sparse.len() || self.sparse[idx] == EMPTY {
            return None;
        }
        let dense_idx = self.sparse[idx] as usize;
        self.sparse[idx] = EMPTY;

        let value = self.data.swap_remove(dense_idx);
        self.dense.swap_remove(dense_idx);

        // Re-point the entity that was swapped into the vacated slot.
        if dense_idx < self.dense.len() {
            let moved = self.dense[dense_idx];
            self.sparse[moved.id() as usize] = dense_idx as u32;
        }
        Some(value)
    }

    pub(crate) fn get(&self, entity: Entity) -> Option<&T> {
        let idx = entity.id() as usize;
        if idx >= self.sparse.len() || self.sparse[idx] == EMPTY {
            return None;
        }
        Some(&self.data[self.sparse[idx] as usize])
    }

    pub(crate) fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let idx = entity.id() as usize;
        if idx >= self.sparse.len() || self.sparse[idx] == EMPTY {
            return None;
        }
        Some(&mut self.data[self.sparse[idx] as usize])
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.dense.len()
    }

    /// Iterates live instances only, in dense (unspecified) order.
    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.dense.iter().copied().zip(self.data.iter())
    }
}

/// The registry for one component type, with interior mutability so the
/// manager can reach it through shared references during traversal.
#[derive(Debug)]
pub(crate) struct Registry<T: Component> {
    cell: RefCell<SparseSet<T>>,
}

impl<T: Component> Registry<T> {
    pub(crate) fn new() -> Self {
        Self {
            cell: RefCell::new(SparseSet::new()),
        }
    }

    pub(crate) fn borrow(&self) -> Ref<'_, SparseSet<T>> {
        self.cell.borrow()
    }

    pub(crate) fn borrow_mut(&self) -> RefMut<'_, SparseSet<T>> {
        self.cell.borrow_mut()
    }
}

/// Type-erased view of a [`Registry<T>`], held by the manager's registry
/// map alongside the type's mask index.
pub(crate) trait AnyRegistry: 'static {
    fn as_any(&self) -> &dyn Any;

    /// Drops the instance for `entity`, if present. Used when an entity is
    /// removed and all its components are detached atomically.
    fn remove(&self, entity: Entity) -> bool;
}

impl<T: Component> AnyRegistry for Registry<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn remove(&self, entity: Entity) -> bool {
        self.cell.borrow_mut().remove(entity).is_some()
    }
}

/// One entry in the manager's registry map: the component's assigned mask
/// index, its name for diagnostics, and the erased storage.
pub(crate) struct RegistrySlot {
    pub(crate) index: ComponentIndex,
    pub(crate) name: &'static str,
    pub(crate) registry: Box<dyn AnyRegistry>,
}

impl RegistrySlot {
    pub(crate) fn new<T: Component>(index: ComponentIndex) -> Self {
        Self {
            index,
            name: T::type_name(),
            registry: Box::new(Registry::<T>::new()),
        }
    }

    /// Downcasts to the concrete registry. The slot is keyed by
    /// `TypeId::of::<T>()` in the manager's map, so a mismatch cannot
    /// occur through the public API.
    pub(crate) fn typed<T: Component>(&self) -> &Registry<T> {
        self.registry
            .as_any()
            .downcast_ref::<Registry<T>>()
            .expect("registry slot type mismatch")
    }
}

impl std::fmt::Debug for RegistrySlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrySlot")
            .field("index", &self.index)
            .field("name", &self.name)
            .finish()
    }
}
