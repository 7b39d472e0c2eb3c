//! # kestrel_component
//!
//! The "C" in ECS — defines what an entity and a component are, and the
//! small value types the rest of the runtime is built on.
//!
//! This crate provides:
//!
//! - [`Component`] trait — the contract all runtime data must satisfy.
//! - [`Entity`] — lightweight `u64` entity identifiers.
//! - [`EntityAllocator`] — identifier allocator with free-list recycling.
//! - [`ComponentMask`] / [`ComponentIndex`] — per-entity presence bitsets.
//! - [`EventBuffer`] — fixed-capacity, drop-on-overflow event queues.

pub mod buffer;
pub mod component;
pub mod entity;
pub mod mask;

pub use buffer::EventBuffer;
pub use component::Component;
pub use entity::{Entity, EntityAllocator};
pub use mask::{ComponentIndex, ComponentMask, MAX_COMPONENT_TYPES};
