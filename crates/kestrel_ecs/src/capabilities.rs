//! The capability signatures understood at the runtime boundary.
//!
//! Every collaborating subsystem — rendering backends, input capture,
//! asset loaders — participates in the frame lifecycle by registering
//! callables under these signatures. Void signatures are broadcast to all
//! entries; [`GetEntityInPixel`] is a single-answer signature resolved
//! with first-responder semantics.

use glam::UVec2;
use kestrel_component::Entity;

use crate::dispatch::Signature;
use crate::manager::Manager;

/// Per-frame tick. Invoked once per registered subsystem each frame with
/// the delta time in seconds.
pub struct Execute;

impl Signature for Execute {
    type Callback = dyn Fn(&Manager, f64);
    fn name() -> &'static str {
        "execute"
    }
}

/// Notification fired after an entity has been constructed (initializer
/// already applied).
pub struct OnEntityCreated;

impl Signature for OnEntityCreated {
    type Callback = dyn Fn(&Manager, Entity);
    fn name() -> &'static str {
        "on_entity_created"
    }
}

/// Notification fired while the entity is still live, just before its
/// components are detached and its identifier released.
pub struct OnEntityRemoved;

impl Signature for OnEntityRemoved {
    type Callback = dyn Fn(&Manager, Entity);
    fn name() -> &'static str {
        "on_entity_removed"
    }
}

/// Shutdown notification, broadcast once when the application terminates.
pub struct OnTerminate;

impl Signature for OnTerminate {
    type Callback = dyn Fn(&Manager);
    fn name() -> &'static str {
        "on_terminate"
    }
}

/// Input-focus change: the window entity and whether the cursor is now
/// captured by it.
pub struct OnInputFocusChanged;

impl Signature for OnInputFocusChanged {
    type Callback = dyn Fn(&Manager, Entity, bool);
    fn name() -> &'static str {
        "on_input_focus_changed"
    }
}

/// Single-answer lookup: which entity is visible in `pixel` of the given
/// window. A responder returns `Some(entity)` when it can answer and
/// `None` to pass; with no responder able to answer, the dispatch resolves
/// to the [`Entity::INVALID`] sentinel, never an error.
pub struct GetEntityInPixel;

impl Signature for GetEntityInPixel {
    type Callback = dyn Fn(&Manager, Entity, UVec2) -> Option<Entity>;
    fn name() -> &'static str {
        "get_entity_in_pixel"
    }
}
