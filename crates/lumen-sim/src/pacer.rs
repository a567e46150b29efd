//! Frame pacing for the render loop.

use std::time::{Duration, Instant};

use lumen_flow::TARGET_FPS;

use crate::{Error, Result};

/// Holds a loop to a fixed frame rate and measures what it actually hit.
#[derive(Debug)]
pub struct FramePacer {
    interval: Duration,
    next_frame: Instant,
    started: Instant,
    frames: u64,
}

impl FramePacer {
    /// Pace at `fps` frames per second, at most [`TARGET_FPS`].
    pub fn new(fps: u32) -> Result<Self> {
        if fps == 0 || fps > TARGET_FPS {
            return Err(Error::FrameRate {
                max: TARGET_FPS,
                got: fps,
            });
        }
        let now = Instant::now();
        Ok(Self {
            interval: Duration::from_secs(1) / fps,
            next_frame: now,
            started: now,
            frames: 0,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time left before the next frame is due.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next_frame.saturating_duration_since(now)
    }

    /// Block until the next frame is due.
    ///
    /// A loop that falls behind by more than a frame starts a fresh
    /// schedule instead of running frames back to back to catch up.
    pub fn wait(&mut self) {
        let wait = self.remaining(Instant::now());
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }
        self.mark(Instant::now());
    }

    fn mark(&mut self, now: Instant) {
        self.frames += 1;
        self.next_frame += self.interval;
        if now > self.next_frame + self.interval {
            self.next_frame = now + self.interval;
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Frames per second since the pacer was created.
    pub fn achieved_fps(&self) -> f64 {
        let secs = self.started.elapsed().as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.frames as f64 / secs
    }
}
