//! Monotonic clocks and frame pacing

use std::time::{Duration, Instant};

/// Source of monotonic time for the frame loop
pub trait Clock {
    /// Time elapsed since the clock started
    fn now(&self) -> Duration;

    /// Block until the next frame is due at `target_fps`
    fn tick_wait(&mut self, target_fps: u32);

    /// Milliseconds since the clock started
    fn ticks_since_start(&self) -> u64 {
        self.now().as_millis() as u64
    }

    /// Block for a fixed delay
    fn sleep(&mut self, duration: Duration);
}

fn frame_duration(target_fps: u32) -> Duration {
    Duration::from_secs(1) / target_fps.max(1)
}

/// Wall clock backed by `Instant`, pacing with `thread::sleep`
#[derive(Debug)]
pub struct SystemClock {
    start: Instant,
    last_tick: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        let start = Instant::now();
        Self {
            start,
            last_tick: start,
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    fn tick_wait(&mut self, target_fps: u32) {
        let frame = frame_duration(target_fps);
        let elapsed = self.last_tick.elapsed();
        if elapsed < frame {
            std::thread::sleep(frame - elapsed);
        }
        // Late frames start a fresh schedule instead of bursting to catch up
        self.last_tick = Instant::now();
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Clock that only moves when told to: one frame per `tick_wait`.
///
/// Runs a match as fast as the CPU allows with the same timing a real-time
/// run would see at the target rate.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Duration,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn tick_wait(&mut self, target_fps: u32) {
        self.now += frame_duration(target_fps);
    }

    fn sleep(&mut self, duration: Duration) {
        self.now += duration;
    }
}
