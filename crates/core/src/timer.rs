//! Frame timing.

use std::time::{Duration, Instant};

/// High-resolution timer for the render loop.
#[derive(Debug)]
pub struct FrameTimer {
    start: Instant,
    last_tick: Instant,
}

impl FrameTimer {
    /// Create a new timer, starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
        }
    }

    /// Total elapsed time since the timer was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Time elapsed since the last call to `tick()`.
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let delta = now - self.last_tick;
        self.last_tick = now;
        delta
    }

    /// Delta time in seconds since the last tick.
    pub fn delta_secs(&mut self) -> f32 {
        self.tick().as_secs_f32()
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts frames per second over one-second windows.
#[derive(Debug)]
pub struct FpsCounter {
    window_start: Instant,
    frames: u32,
    fps: u32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            window_start: Instant::now(),
            frames: 0,
            fps: 0,
        }
    }

    /// Record one rendered frame. Returns `Some(fps)` when a one-second
    /// window has just completed.
    pub fn frame(&mut self) -> Option<u32> {
        self.frames += 1;
        if self.window_start.elapsed() >= Duration::from_secs(1) {
            self.fps = self.frames;
            self.frames = 0;
            self.window_start = Instant::now();
            Some(self.fps)
        } else {
            None
        }
    }

    /// The frame count of the last completed window.
    pub fn fps(&self) -> u32 {
        self.fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_tick_advances() {
        let mut timer = FrameTimer::new();
        std::thread::sleep(Duration::from_millis(5));
        let delta = timer.tick();
        assert!(delta >= Duration::from_millis(5));
        assert!(timer.elapsed() >= delta);
    }

    #[test]
    fn test_fps_counter_accumulates_within_window() {
        let mut counter = FpsCounter::new();
        assert_eq!(counter.frame(), None);
        assert_eq!(counter.frame(), None);
        assert_eq!(counter.fps(), 0);
    }
}
