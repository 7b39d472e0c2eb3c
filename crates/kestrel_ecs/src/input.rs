//! Buffered input events.
//!
//! Input backends run inside windowing callbacks and cannot touch the
//! world mid-callback, so they append events to an [`InputBuffer`]
//! component instead. A consumer subsystem drains the buffer once per
//! frame. Each stream is a fixed-capacity [`EventBuffer`]: overflowing
//! events are dropped silently, per the documented policy.

use glam::Vec2;
use kestrel_component::{Component, Entity, EventBuffer};

/// Maximum number of buffered events per stream between two frames.
pub const MAX_BUFFERED_EVENTS: usize = 128;

/// A key press or release.
#[derive(Debug, Clone, Copy)]
pub struct KeyEvent {
    /// The window entity that received the event.
    pub window: Entity,
    /// Backend-specific key code.
    pub key: i32,
    pub pressed: bool,
}

/// A mouse button press or release.
#[derive(Debug, Clone, Copy)]
pub struct ClickEvent {
    pub window: Entity,
    /// Cursor position in window coordinates.
    pub position: Vec2,
    /// Backend-specific button code.
    pub button: i32,
    pub pressed: bool,
}

/// Cursor movement.
#[derive(Debug, Clone, Copy)]
pub struct MouseMoveEvent {
    pub window: Entity,
    pub position: Vec2,
    /// Movement since the previous event.
    pub relative: Vec2,
}

/// Scroll wheel movement.
#[derive(Debug, Clone, Copy)]
pub struct MouseScrollEvent {
    pub window: Entity,
    /// Horizontal and vertical scroll offsets.
    pub offset: Vec2,
    pub position: Vec2,
}

/// Fixed-capacity event streams filled by input backends and drained by
/// the input consumer each frame.
#[derive(Debug, Clone, Default)]
pub struct InputBuffer {
    pub keys: EventBuffer<KeyEvent, MAX_BUFFERED_EVENTS>,
    pub clicks: EventBuffer<ClickEvent, MAX_BUFFERED_EVENTS>,
    pub moves: EventBuffer<MouseMoveEvent, MAX_BUFFERED_EVENTS>,
    pub scrolls: EventBuffer<MouseScrollEvent, MAX_BUFFERED_EVENTS>,
}

impl Component for InputBuffer {
    fn type_name() -> &'static str {
        "InputBuffer"
    }
}
