//! Non-owning entity handles.
//!
//! An [`EntityHandle`] is a plain (identifier, manager reference) pair —
//! it owns nothing and is free to copy. All storage stays inside the
//! manager; the handle only delegates. A handle is invalidated logically,
//! not physically, when its entity is removed: operations on a dead
//! handle fail with `EntityNotFound` or report absence.

use kestrel_component::{Component, Entity};

use crate::error::EcsError;
use crate::manager::Manager;

/// A lightweight reference to one entity inside a [`Manager`].
#[derive(Clone, Copy)]
pub struct EntityHandle<'a> {
    manager: &'a Manager,
    entity: Entity,
}

impl<'a> EntityHandle<'a> {
    pub(crate) fn new(manager: &'a Manager, entity: Entity) -> Self {
        Self { manager, entity }
    }

    /// Returns the entity identifier.
    #[must_use]
    pub fn id(&self) -> Entity {
        self.entity
    }

    /// Returns the owning manager.
    #[must_use]
    pub fn manager(&self) -> &'a Manager {
        self.manager
    }

    /// Returns `true` while the entity is live.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.manager.is_alive(self.entity)
    }

    /// Installs or replaces the `T` instance on this entity and sets its
    /// mask bit. Overwriting an existing instance is the documented
    /// contract, not an error. Deferred when a traversal is in progress.
    pub fn attach<T: Component>(&self, value: T) -> &Self {
        self.manager.attach_component(self.entity, value);
        self
    }

    /// Removes the `T` instance and clears its mask bit; no-op when
    /// absent. Deferred when a traversal is in progress.
    pub fn detach<T: Component>(&self) -> &Self {
        self.manager.detach_component::<T>(self.entity);
        self
    }

    /// O(1) mask test for `T`. Returns `false` for a dead entity.
    #[must_use]
    pub fn has<T: Component>(&self) -> bool {
        self.manager.has_component::<T>(self.entity)
    }

    /// Scoped read access to the `T` instance.
    ///
    /// The closure receives `&T`; the reference cannot be retained, which
    /// encodes the rule that component references are invalid across a
    /// flush boundary.
    pub fn get<T: Component, R>(&self, f: impl FnOnce(&T) -> R) -> Result<R, EcsError> {
        self.manager.read_component(self.entity, f)
    }

    /// Scoped mutable access to the `T` instance.
    pub fn get_mut<T: Component, R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R, EcsError> {
        self.manager.write_component(self.entity, f)
    }

    /// Removes this entity. Equivalent to
    /// [`Manager::remove_entity`] with the handle's identifier.
    pub fn remove(self) -> Result<(), EcsError> {
        self.manager.remove_entity(self.entity)
    }
}

impl std::fmt::Debug for EntityHandle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("EntityHandle").field(&self.entity).finish()
    }
}
