//! Host frame loop.
//!
//! Fixed-target pacing over the runtime's frame lifecycle: each frame
//! measures the real delta time, broadcasts `Execute` through
//! [`Manager::execute`] (which flushes deferred operations at the end of
//! the frame), then sleeps off the remainder of the frame budget.

use std::time::{Duration, Instant};

use kestrel_ecs::Manager;
use tracing::{debug, info};

use crate::config::FrameConfig;

/// The host frame loop, owning the runtime manager.
#[derive(Debug)]
pub struct FrameLoop {
    config: FrameConfig,
    manager: Manager,
    frame_id: u64,
}

impl FrameLoop {
    /// Creates a frame loop with the given configuration.
    #[must_use]
    pub fn new(config: FrameConfig) -> Self {
        Self {
            config,
            manager: Manager::new(),
            frame_id: 0,
        }
    }

    /// Returns the runtime manager.
    #[must_use]
    pub fn manager(&self) -> &Manager {
        &self.manager
    }

    /// Returns the current frame counter.
    #[must_use]
    pub fn frame_id(&self) -> u64 {
        self.frame_id
    }

    /// Runs a single frame with an explicit delta time.
    pub fn step(&mut self, dt: f64) {
        self.manager.execute(dt);
        self.frame_id += 1;
    }

    /// Runs frames at the configured rate until `max_frames` is reached,
    /// then broadcasts the terminate notification.
    pub fn run(&mut self) {
        let budget = Duration::from_secs_f64(1.0 / self.config.frame_rate);
        info!(
            frame_rate = self.config.frame_rate,
            max_frames = self.config.max_frames,
            "frame loop starting"
        );

        let mut last = Instant::now();
        while self.config.max_frames == 0 || self.frame_id < self.config.max_frames {
            let now = Instant::now();
            let dt = (now - last).as_secs_f64();
            last = now;

            self.step(dt);
            debug!(frame = self.frame_id, dt, "frame complete");

            let elapsed = last.elapsed();
            if elapsed < budget {
                std::thread::sleep(budget - elapsed);
            }
        }

        info!(frames = self.frame_id, "frame loop stopping");
        self.manager.terminate();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use kestrel_ecs::Execute;

    use super::*;

    #[test]
    fn test_step_advances_frame_counter() {
        let mut frame_loop = FrameLoop::new(FrameConfig::default());
        frame_loop.step(0.016);
        frame_loop.step(0.016);
        assert_eq!(frame_loop.frame_id(), 2);
    }

    #[test]
    fn test_run_honours_max_frames() {
        let mut frame_loop = FrameLoop::new(FrameConfig {
            frame_rate: 1000.0,
            max_frames: 3,
        });

        let frames = Rc::new(Cell::new(0u32));
        let frames_cb = Rc::clone(&frames);
        let owner = frame_loop.manager().create_entity(|_| {});
        frame_loop.manager().register_capability::<Execute>(
            owner,
            Rc::new(move |_em, _dt| frames_cb.set(frames_cb.get() + 1)),
        );

        frame_loop.run();
        assert_eq!(frames.get(), 3);
    }
}
