//! Capability dispatch — composition over named function signatures.
//!
//! Independently built subsystems cooperate without a shared base trait:
//! each subsystem registers callables against named [`Signature`] types,
//! owned by one of its entities. The manager broadcasts a signature to
//! every registered callable in attachment order, or asks for the first
//! responder when the signature produces a single answer.
//!
//! The table has two observable states per signature: accepting
//! registrations, and steady-state where broadcasts interleave with new
//! registrations. A broadcast works on a snapshot of the entry list, so a
//! registration made during a broadcast takes effect on the *next*
//! broadcast, never the one in progress.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use kestrel_component::Entity;

/// A named callable signature.
///
/// Implementors are zero-sized marker types; the callable shape lives in
/// the associated `Callback` type, e.g. `dyn Fn(&Manager, f64)` for a
/// per-frame tick. See [`crate::capabilities`] for the signatures the
/// runtime itself understands.
pub trait Signature: 'static {
    /// The callable type registered under this signature.
    type Callback: ?Sized + 'static;

    /// The signature's wire name, used in logs.
    fn name() -> &'static str;
}

/// One registered capability: the owning entity and its callable.
pub(crate) struct CapabilityEntry<S: Signature> {
    pub(crate) entity: Entity,
    pub(crate) callback: Rc<S::Callback>,
}

impl<S: Signature> Clone for CapabilityEntry<S> {
    fn clone(&self) -> Self {
        Self {
            entity: self.entity,
            callback: Rc::clone(&self.callback),
        }
    }
}

/// Ordered entry list for one signature, type-erased for the table.
struct SignatureSlot<S: Signature> {
    entries: RefCell<Vec<CapabilityEntry<S>>>,
}

impl<S: Signature> SignatureSlot<S> {
    fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
        }
    }
}

trait AnySlot {
    fn as_any(&self) -> &dyn Any;

    /// Prunes every entry owned by `entity`.
    fn remove_entity(&self, entity: Entity);
}

impl<S: Signature> AnySlot for SignatureSlot<S> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn remove_entity(&self, entity: Entity) {
        self.entries.borrow_mut().retain(|e| e.entity != entity);
    }
}

/// The capability dispatch table: signature type to ordered entry list.
#[derive(Default)]
pub(crate) struct DispatchTable {
    slots: RefCell<HashMap<TypeId, Rc<dyn AnySlot>>>,
}

impl DispatchTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends an entry for `S`, keeping attachment order.
    pub(crate) fn register<S: Signature>(&self, entity: Entity, callback: Rc<S::Callback>) {
        let slot = self
            .slots
            .borrow_mut()
            .entry(TypeId::of::<S>())
            .or_insert_with(|| Rc::new(SignatureSlot::<S>::new()) as Rc<dyn AnySlot>)
            .clone();
        let slot = slot
            .as_any()
            .downcast_ref::<SignatureSlot<S>>()
            .expect("signature slot type mismatch");
        slot.entries
            .borrow_mut()
            .push(CapabilityEntry { entity, callback });
    }

    /// Clones the current entry list for `S`. Broadcasts iterate the
    /// snapshot, leaving the live list free to accept registrations.
    pub(crate) fn snapshot<S: Signature>(&self) -> Vec<CapabilityEntry<S>> {
        let slot = match self.slots.borrow().get(&TypeId::of::<S>()) {
            Some(slot) => Rc::clone(slot),
            None => return Vec::new(),
        };
        let slot = slot
            .as_any()
            .downcast_ref::<SignatureSlot<S>>()
            .expect("signature slot type mismatch");
        let entries = slot.entries.borrow();
        entries.clone()
    }

    /// Prunes every entry owned by `entity`, across all signatures.
    pub(crate) fn remove_entity(&self, entity: Entity) {
        for slot in self.slots.borrow().values() {
            slot.remove_entity(entity);
        }
    }
}

impl std::fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchTable")
            .field("signatures", &self.slots.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    struct Ping;

    impl Signature for Ping {
        type Callback = dyn Fn(u32);
        fn name() -> &'static str {
            "ping"
        }
    }

    fn e(id: u64) -> Entity {
        Entity::from_raw(id)
    }

    #[test]
    fn test_entries_keep_attachment_order() {
        let table = DispatchTable::new();
        table.register::<Ping>(e(1), Rc::new(|_| {}));
        table.register::<Ping>(e(2), Rc::new(|_| {}));
        table.register::<Ping>(e(1), Rc::new(|_| {}));

        let owners: Vec<u64> = table
            .snapshot::<Ping>()
            .iter()
            .map(|entry| entry.entity.id())
            .collect();
        assert_eq!(owners, vec![1, 2, 1]);
    }

    #[test]
    fn test_remove_entity_prunes_all_its_entries() {
        let table = DispatchTable::new();
        table.register::<Ping>(e(1), Rc::new(|_| {}));
        table.register::<Ping>(e(2), Rc::new(|_| {}));
        table.register::<Ping>(e(1), Rc::new(|_| {}));

        table.remove_entity(e(1));
        let owners: Vec<u64> = table
            .snapshot::<Ping>()
            .iter()
            .map(|entry| entry.entity.id())
            .collect();
        assert_eq!(owners, vec![2]);
    }

    #[test]
    fn test_snapshot_isolated_from_later_registrations() {
        let table = DispatchTable::new();
        let hits = Rc::new(Cell::new(0u32));

        let hits_cb = Rc::clone(&hits);
        table.register::<Ping>(e(1), Rc::new(move |_| hits_cb.set(hits_cb.get() + 1)));

        let snapshot = table.snapshot::<Ping>();
        // A registration after the snapshot must not appear in it.
        table.register::<Ping>(e(2), Rc::new(|_| {}));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(table.snapshot::<Ping>().len(), 2);

        for entry in &snapshot {
            (entry.callback)(0);
        }
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_unknown_signature_snapshot_is_empty() {
        let table = DispatchTable::new();
        assert!(table.snapshot::<Ping>().is_empty());
    }
}
