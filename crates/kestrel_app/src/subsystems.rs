//! Demo subsystems hosted by the binary.
//!
//! Each subsystem is an entity carrying capability callbacks; nothing
//! here is special-cased by the runtime. Movement integrates velocities
//! into transforms every frame; lifetime expires entities after a fixed
//! time, exercising deferred removal from inside a traversal.

use std::rc::Rc;

use glam::Vec3;
use kestrel_ecs::{Component, Execute, Manager, OnEntityRemoved};
use serde::{Deserialize, Serialize};
use tracing::info;

/// World-space placement of an entity.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
}

impl Component for Transform {
    fn type_name() -> &'static str {
        "Transform"
    }
}

/// Linear velocity, integrated by the movement subsystem.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub linear: Vec3,
}

impl Component for Velocity {
    fn type_name() -> &'static str {
        "Velocity"
    }
}

/// Remaining lifetime in seconds; the entity is removed on expiry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Lifetime {
    pub remaining: f64,
}

impl Component for Lifetime {
    fn type_name() -> &'static str {
        "Lifetime"
    }
}

/// Registers the movement subsystem: every frame, integrate each
/// entity's velocity into its transform.
pub fn register_movement(manager: &Manager) {
    manager.create_entity(|e| {
        e.manager().register_capability::<Execute>(
            e.id(),
            Rc::new(|em: &Manager, dt: f64| {
                em.query2_mut(|_entity, transform: &mut Transform, velocity: &mut Velocity| {
                    transform.position += velocity.linear * dt as f32;
                });
            }),
        );
    });
}

/// Registers the lifetime subsystem: tick down lifetimes and remove
/// expired entities. Removal happens mid-traversal and is deferred to
/// the end of the frame by the runtime.
pub fn register_lifetime(manager: &Manager) {
    manager.create_entity(|e| {
        e.manager().register_capability::<Execute>(
            e.id(),
            Rc::new(|em: &Manager, dt: f64| {
                em.query_mut(|entity, lifetime: &mut Lifetime| {
                    lifetime.remaining -= dt;
                    if lifetime.remaining <= 0.0 {
                        em.remove_entity(entity).ok();
                    }
                });
            }),
        );
        e.manager().register_capability::<OnEntityRemoved>(
            e.id(),
            Rc::new(|_em: &Manager, entity| {
                info!(%entity, "entity expired");
            }),
        );
    });
}
