//! Deferred structural mutations.
//!
//! Structural operations — entity creation and removal, component attach
//! and detach — requested while a traversal, broadcast or flush is in
//! progress are not applied in place. They are recorded as [`PendingOp`]
//! values in a FIFO [`CommandQueue`] and applied in submission order at
//! the next flush point. This is what makes same-thread reentrant
//! mutation during iteration safe.

use std::any::TypeId;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;

use kestrel_component::Entity;

use crate::handle::EntityHandle;
use crate::manager::Manager;

/// An entity initializer closure, run once on the new entity.
pub(crate) type InitFn = dyn for<'e> FnOnce(EntityHandle<'e>);

/// A deferred structural mutation.
///
/// Attach carries the component value inside a typed closure so the queue
/// itself stays free of generics; Detach only needs the type identity.
pub(crate) enum PendingOp {
    /// Realize an entity whose identifier was already allocated at
    /// submission time, then run its initializer.
    Create {
        entity: Entity,
        init: Box<InitFn>,
    },
    /// Remove a live entity and everything attached to it.
    Remove { entity: Entity },
    /// Insert-or-replace one component instance.
    Attach {
        entity: Entity,
        component: &'static str,
        apply: Box<dyn FnOnce(&Manager)>,
    },
    /// Drop one component instance, if present.
    Detach {
        entity: Entity,
        component: &'static str,
        type_id: TypeId,
    },
}

impl fmt::Debug for PendingOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingOp::Create { entity, .. } => write!(f, "Create({entity})"),
            PendingOp::Remove { entity } => write!(f, "Remove({entity})"),
            PendingOp::Attach {
                entity, component, ..
            } => write!(f, "Attach({entity}, {component})"),
            PendingOp::Detach {
                entity, component, ..
            } => write!(f, "Detach({entity}, {component})"),
        }
    }
}

/// FIFO queue of pending operations, shared through interior mutability
/// so operations can be recorded mid-traversal.
#[derive(Default)]
pub(crate) struct CommandQueue {
    ops: RefCell<VecDeque<PendingOp>>,
}

impl CommandQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, op: PendingOp) {
        self.ops.borrow_mut().push_back(op);
    }

    pub(crate) fn pop(&self) -> Option<PendingOp> {
        self.ops.borrow_mut().pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.ops.borrow().len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.ops.borrow().is_empty()
    }
}

impl fmt::Debug for CommandQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandQueue")
            .field("pending", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let queue = CommandQueue::new();
        queue.push(PendingOp::Remove {
            entity: Entity::from_raw(1),
        });
        queue.push(PendingOp::Remove {
            entity: Entity::from_raw(2),
        });
        assert_eq!(queue.len(), 2);

        match queue.pop() {
            Some(PendingOp::Remove { entity }) => assert_eq!(entity.id(), 1),
            other => panic!("unexpected op: {other:?}"),
        }
        match queue.pop() {
            Some(PendingOp::Remove { entity }) => assert_eq!(entity.id(), 2),
            other => panic!("unexpected op: {other:?}"),
        }
        assert!(queue.is_empty());
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_debug_formatting() {
        let op = PendingOp::Detach {
            entity: Entity::from_raw(4),
            component: "Transform",
            type_id: TypeId::of::<u32>(),
        };
        assert_eq!(format!("{op:?}"), "Detach(Entity(4), Transform)");
    }
}
