//! Entity-component runtime.
//!
//! The runtime is built around a single [`Manager`] owning all storage:
//! an entity table preserving creation order, one sparse-set registry
//! per component type, a capability dispatch table and a deferred
//! command queue. Subsystems never touch storage directly; they go
//! through [`EntityHandle`]s, the `query*` methods and capability
//! broadcasts.
//!
//! Structural mutation during traversal is legal everywhere: while any
//! query or broadcast is active, creates and removes are queued and
//! applied at the next [`Manager::commit`].

mod capabilities;
mod commands;
mod dispatch;
mod error;
mod handle;
mod input;
mod manager;
mod query;
mod registry;
mod table;

pub use capabilities::{
    Execute, GetEntityInPixel, OnEntityCreated, OnEntityRemoved, OnInputFocusChanged, OnTerminate,
};
pub use dispatch::Signature;
pub use error::EcsError;
pub use handle::EntityHandle;
pub use input::{
    ClickEvent, InputBuffer, KeyEvent, MouseMoveEvent, MouseScrollEvent, MAX_BUFFERED_EVENTS,
};
pub use manager::Manager;

pub use kestrel_component::{Component, Entity};
