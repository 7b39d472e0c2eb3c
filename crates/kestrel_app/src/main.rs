//! # kestrel_app — Host
//!
//! The host owns the runtime [`Manager`](kestrel_ecs::Manager) and the
//! frame loop. Subsystems are plain entities registered with capability
//! callbacks before the loop starts.
//!
//! ## Startup Sequence
//!
//! 1. Initialise structured logging.
//! 2. Load the frame configuration (optional JSON path as first argument).
//! 3. Register subsystems and sample entities.
//! 4. Enter the fixed-target frame loop; terminate on exit.

mod config;
mod frame;
mod subsystems;

use anyhow::Result;
use glam::Vec3;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::FrameConfig;
use frame::FrameLoop;
use subsystems::{Lifetime, Transform, Velocity};

fn main() -> Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("kestrel_app=info".parse()?))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => FrameConfig::from_file(path)?,
        None => FrameConfig::default(),
    };

    info!("kestrel host starting");

    let mut frame_loop = FrameLoop::new(config);
    let manager = frame_loop.manager();

    subsystems::register_movement(manager);
    subsystems::register_lifetime(manager);

    // Sample content: a drifting entity that expires after ten seconds.
    manager.create_entity(|e| {
        e.attach(Transform::default())
            .attach(Velocity {
                linear: Vec3::new(1.0, 0.0, 0.0),
            })
            .attach(Lifetime { remaining: 10.0 });
    });

    frame_loop.run();

    info!("kestrel host shut down");
    Ok(())
}
