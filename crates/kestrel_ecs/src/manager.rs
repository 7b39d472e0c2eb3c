//! The manager — aggregate root of the entity-component runtime.
//!
//! The [`Manager`] is the sole owner of all entity and component storage
//! and the single entry point subsystems use to create entities, run
//! queries, register capabilities and broadcast them. It composes the
//! entity table, one registry per component type, the deferred command
//! queue and the capability dispatch table.
//!
//! ## Reentrancy
//!
//! One logical thread per manager; there is no locking. Safety against
//! *same-thread* reentrant mutation — a subsystem creating or removing
//! entities while iterating a query, directly or through a broadcast —
//! comes from a traversal-depth counter: while any traversal, broadcast
//! or flush is active, structural operations are recorded in the command
//! queue instead of applied in place.
//!
//! ## Flush points
//!
//! The queue drains, in FIFO order, at [`Manager::commit`] — called
//! explicitly, or implicitly at the end of [`Manager::execute`] and
//! [`Manager::terminate`]. Operations submitted while *no* traversal is
//! active apply immediately; this is the documented contract subsystems
//! rely on for same-call visibility of a just-created entity.

use std::any::TypeId;
use std::cell::{Cell, Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use kestrel_component::{Component, ComponentIndex, Entity, EntityAllocator};
use tracing::{debug, warn};

use crate::capabilities::{
    Execute, GetEntityInPixel, OnEntityCreated, OnEntityRemoved, OnInputFocusChanged, OnTerminate,
};
use crate::commands::{CommandQueue, InitFn, PendingOp};
use crate::dispatch::{DispatchTable, Signature};
use crate::error::EcsError;
use crate::handle::EntityHandle;
use crate::registry::RegistrySlot;
use crate::table::EntityTable;

/// The aggregate root owning all entity and component storage.
pub struct Manager {
    allocator: RefCell<EntityAllocator>,
    table: RefCell<EntityTable>,
    registries: RefCell<HashMap<TypeId, Rc<RegistrySlot>>>,
    dispatch: DispatchTable,
    queue: CommandQueue,
    /// Number of active traversals, broadcasts and flushes. Structural
    /// operations defer while non-zero.
    lock_depth: Cell<usize>,
    /// Guards against nested queue drains while a flush is in progress.
    flushing: Cell<bool>,
}

/// RAII marker for an active traversal; dropping it unlocks.
pub(crate) struct TraversalGuard<'a> {
    depth: &'a Cell<usize>,
}

impl Drop for TraversalGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get() - 1);
    }
}

impl Manager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self {
            allocator: RefCell::new(EntityAllocator::new()),
            table: RefCell::new(EntityTable::new()),
            registries: RefCell::new(HashMap::new()),
            dispatch: DispatchTable::new(),
            queue: CommandQueue::new(),
            lock_depth: Cell::new(0),
            flushing: Cell::new(false),
        }
    }

    // -- Entity lifecycle --

    /// Creates an entity, returning its identifier immediately.
    ///
    /// Outside any active traversal the entity is constructed on the spot:
    /// it is inserted into the table, `init` runs with its handle, and
    /// `OnEntityCreated` is broadcast. During a traversal or flush both
    /// the construction and the initializer are deferred to the next
    /// flush; the returned identifier becomes usable once flushed.
    pub fn create_entity(&self, init: impl for<'e> FnOnce(EntityHandle<'e>) + 'static) -> Entity {
        let entity = self.allocator.borrow_mut().allocate();
        if self.is_locked() {
            debug!(%entity, "deferring entity creation");
            self.queue.push(PendingOp::Create {
                entity,
                init: Box::new(init),
            });
        } else {
            self.create_now(entity, Box::new(init));
        }
        entity
    }

    /// Returns a handle for a live entity.
    pub fn get_entity(&self, entity: Entity) -> Result<EntityHandle<'_>, EcsError> {
        if !self.table.borrow().contains(entity) {
            return Err(EcsError::EntityNotFound(entity));
        }
        Ok(EntityHandle::new(self, entity))
    }

    /// Removes a live entity, its components and its capability entries.
    ///
    /// `OnEntityRemoved` is broadcast while the entity is still live.
    /// Deferred when a traversal is in progress; the removal becomes
    /// visible after the next flush.
    pub fn remove_entity(&self, entity: Entity) -> Result<(), EcsError> {
        if !self.table.borrow().contains(entity) {
            return Err(EcsError::EntityNotFound(entity));
        }
        if self.is_locked() {
            debug!(%entity, "deferring entity removal");
            self.queue.push(PendingOp::Remove { entity });
        } else {
            self.remove_now(entity);
        }
        Ok(())
    }

    /// Returns `true` while `entity` is live.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.table.borrow().contains(entity)
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.table.borrow().len()
    }

    /// Returns the number of operations waiting for the next flush.
    #[must_use]
    pub fn pending_ops(&self) -> usize {
        self.queue.len()
    }

    // -- Component types --

    /// Registers `T` up front, assigning its mask index.
    ///
    /// Registration is otherwise lazy on first attach; registering at
    /// startup makes the type-ceiling check fail fast.
    ///
    /// # Panics
    ///
    /// Panics when the distinct-type ceiling
    /// [`MAX_COMPONENT_TYPES`](kestrel_component::MAX_COMPONENT_TYPES)
    /// would be exceeded.
    pub fn register_component<T: Component>(&self) {
        let _ = self.ensure_registry::<T>();
    }

    // -- Deferred mutation --

    /// Drains the command queue in submission order.
    ///
    /// A no-op while a traversal is active: the flush point is by
    /// definition outside iteration. Operations applied here may enqueue
    /// further operations (through lifecycle broadcasts); the drain
    /// continues until the queue is empty.
    pub fn commit(&self) {
        if self.is_locked() || self.flushing.get() {
            return;
        }
        self.flushing.set(true);
        while let Some(op) = self.queue.pop() {
            debug!(?op, "applying deferred operation");
            self.apply(op);
        }
        self.flushing.set(false);
    }

    // -- Capability dispatch --

    /// Registers `callback` under signature `S`, owned by `entity`.
    ///
    /// Entries fire in attachment order and are pruned when the owning
    /// entity is removed. A registration made during a broadcast of `S`
    /// takes effect on the next broadcast.
    pub fn register_capability<S: Signature>(&self, entity: Entity, callback: Rc<S::Callback>) {
        debug!(signature = S::name(), %entity, "registering capability");
        self.dispatch.register::<S>(entity, callback);
    }

    /// Invokes `invoke` with every callable registered under `S`, in
    /// attachment order. Structural mutation from inside the callables is
    /// deferred to the next flush.
    pub fn broadcast<S: Signature>(&self, mut invoke: impl FnMut(&S::Callback)) {
        let entries = self.dispatch.snapshot::<S>();
        let _guard = self.lock();
        for entry in entries {
            invoke(&entry.callback);
        }
    }

    /// First-responder dispatch for single-answer signatures: stops at
    /// the first callable producing `Some`, returns `None` when no
    /// responder answers.
    pub fn dispatch_first<S: Signature, R>(
        &self,
        mut invoke: impl FnMut(&S::Callback) -> Option<R>,
    ) -> Option<R> {
        let entries = self.dispatch.snapshot::<S>();
        let _guard = self.lock();
        for entry in entries {
            if let Some(answer) = invoke(&entry.callback) {
                return Some(answer);
            }
        }
        None
    }

    /// Runs one frame: broadcasts [`Execute`] with the delta time, then
    /// flushes deferred operations.
    pub fn execute(&self, dt: f64) {
        self.broadcast::<Execute>(|cb| cb(self, dt));
        self.commit();
    }

    /// Broadcasts [`OnTerminate`] once at shutdown, then flushes.
    pub fn terminate(&self) {
        self.broadcast::<OnTerminate>(|cb| cb(self));
        self.commit();
    }

    /// Broadcasts an input-focus change for a window entity.
    pub fn input_focus_changed(&self, window: Entity, captured: bool) {
        self.broadcast::<OnInputFocusChanged>(|cb| cb(self, window, captured));
    }

    /// Asks the registered responders which entity is visible in `pixel`
    /// of `window`. Resolves to [`Entity::INVALID`] when no responder
    /// answers — a sentinel, never an error.
    #[must_use]
    pub fn entity_in_pixel(&self, window: Entity, pixel: glam::UVec2) -> Entity {
        self.dispatch_first::<GetEntityInPixel, Entity>(|cb| cb(self, window, pixel))
            .unwrap_or(Entity::INVALID)
    }

    // -- Internals: lock & flush --

    pub(crate) fn lock(&self) -> TraversalGuard<'_> {
        self.lock_depth.set(self.lock_depth.get() + 1);
        TraversalGuard {
            depth: &self.lock_depth,
        }
    }

    pub(crate) fn is_locked(&self) -> bool {
        self.lock_depth.get() != 0
    }

    pub(crate) fn table_ref(&self) -> Ref<'_, EntityTable> {
        self.table.borrow()
    }

    fn apply(&self, op: PendingOp) {
        match op {
            PendingOp::Create { entity, init } => self.create_now(entity, init),
            PendingOp::Remove { entity } => self.remove_now(entity),
            PendingOp::Attach { apply, .. } => apply(self),
            PendingOp::Detach {
                entity, type_id, ..
            } => self.detach_now(entity, type_id),
        }
    }

    fn create_now(&self, entity: Entity, init: Box<InitFn>) {
        self.table.borrow_mut().insert(entity);
        init(EntityHandle::new(self, entity));
        self.broadcast::<OnEntityCreated>(|cb| cb(self, entity));
    }

    fn remove_now(&self, entity: Entity) {
        if !self.table.borrow().contains(entity) {
            // Removal queued more than once before the flush.
            debug!(%entity, "skipping removal of dead entity");
            return;
        }
        self.broadcast::<OnEntityRemoved>(|cb| cb(self, entity));

        // All components are detached atomically with the removal.
        let slots: Vec<Rc<RegistrySlot>> = self.registries.borrow().values().cloned().collect();
        for slot in slots {
            slot.registry.remove(entity);
        }
        self.dispatch.remove_entity(entity);
        self.table.borrow_mut().remove(entity);
        self.allocator.borrow_mut().release(entity);
    }

    // -- Internals: typed component access, delegated to by handles --

    pub(crate) fn attach_component<T: Component>(&self, entity: Entity, value: T) {
        if self.is_locked() {
            self.queue.push(PendingOp::Attach {
                entity,
                component: T::type_name(),
                apply: Box::new(move |manager: &Manager| manager.attach_now(entity, value)),
            });
        } else {
            self.attach_now(entity, value);
        }
    }

    fn attach_now<T: Component>(&self, entity: Entity, value: T) {
        let slot = self.ensure_registry::<T>();
        let mut table = self.table.borrow_mut();
        let Some(record) = table.record_mut(entity) else {
            warn!(%entity, component = T::type_name(), "dropping attach to dead entity");
            return;
        };
        slot.typed::<T>().borrow_mut().insert(entity, value);
        record.mask.set(slot.index);
    }

    pub(crate) fn detach_component<T: Component>(&self, entity: Entity) {
        if self.is_locked() {
            self.queue.push(PendingOp::Detach {
                entity,
                component: T::type_name(),
                type_id: TypeId::of::<T>(),
            });
        } else {
            self.detach_now(entity, TypeId::of::<T>());
        }
    }

    fn detach_now(&self, entity: Entity, type_id: TypeId) {
        let slot = match self.registries.borrow().get(&type_id) {
            Some(slot) => Rc::clone(slot),
            None => return,
        };
        slot.registry.remove(entity);
        if let Some(record) = self.table.borrow_mut().record_mut(entity) {
            record.mask.clear(slot.index);
        }
    }

    pub(crate) fn has_component<T: Component>(&self, entity: Entity) -> bool {
        let Some(slot) = self.slot_of::<T>() else {
            return false;
        };
        self.table
            .borrow()
            .mask(entity)
            .is_some_and(|mask| mask.contains(slot.index))
    }

    pub(crate) fn read_component<T: Component, R>(
        &self,
        entity: Entity,
        f: impl FnOnce(&T) -> R,
    ) -> Result<R, EcsError> {
        if !self.table.borrow().contains(entity) {
            return Err(EcsError::EntityNotFound(entity));
        }
        let missing = || EcsError::ComponentNotPresent {
            entity,
            component: T::type_name(),
        };
        let slot = self.slot_of::<T>().ok_or_else(missing)?;
        let registry = slot.typed::<T>();
        let set = registry.borrow();
        let component = set.get(entity).ok_or_else(missing)?;
        Ok(f(component))
    }

    pub(crate) fn write_component<T: Component, R>(
        &self,
        entity: Entity,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R, EcsError> {
        if !self.table.borrow().contains(entity) {
            return Err(EcsError::EntityNotFound(entity));
        }
        let missing = || EcsError::ComponentNotPresent {
            entity,
            component: T::type_name(),
        };
        let slot = self.slot_of::<T>().ok_or_else(missing)?;
        let registry = slot.typed::<T>();
        let mut set = registry.borrow_mut();
        let component = set.get_mut(entity).ok_or_else(missing)?;
        Ok(f(component))
    }

    pub(crate) fn slot_of<T: Component>(&self) -> Option<Rc<RegistrySlot>> {
        self.registries.borrow().get(&TypeId::of::<T>()).cloned()
    }

    fn ensure_registry<T: Component>(&self) -> Rc<RegistrySlot> {
        if let Some(slot) = self.slot_of::<T>() {
            return slot;
        }
        let mut registries = self.registries.borrow_mut();
        // Fail-fast ceiling check lives in ComponentIndex::new.
        let index = ComponentIndex::new(registries.len());
        let slot = Rc::new(RegistrySlot::new::<T>(index));
        debug!(
            component = T::type_name(),
            index = index.bit(),
            "registered component type"
        );
        registries.insert(TypeId::of::<T>(), Rc::clone(&slot));
        slot
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("entities", &self.table.borrow().len())
            .field("component_types", &self.registries.borrow().len())
            .field("pending_ops", &self.queue.len())
            .finish()
    }
}
