/// Fixed timestep clock
///
/// Turns variable frame times into a bounded number of fixed simulation
/// ticks. The caller measures frame time; the clock never reads the wall
/// clock itself, so headless runs and tests are deterministic.
use std::time::Duration;

/// Simulation tick rate (60 updates per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667); // ~1/60 second

/// Maximum number of ticks per frame to prevent spiral of death
const MAX_STEPS_PER_FRAME: u32 = 5;

/// Fixed-step accumulator with pause support
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    /// Accumulated time not yet consumed by ticks
    accumulator: Duration,

    paused: bool,

    /// Current frame number
    frame_count: u64,

    /// Total ticks executed
    tick_count: u64,

    /// Frames that hit the per-frame tick cap
    dropped_frames: u64,
}

impl FixedStepClock {
    pub fn new() -> Self {
        Self {
            accumulator: Duration::ZERO,
            paused: false,
            frame_count: 0,
            tick_count: 0,
            dropped_frames: 0,
        }
    }

    /// Feed one frame's elapsed time, returns the number of fixed ticks to run
    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        self.frame_count += 1;

        // If paused, don't accumulate time for updates
        if self.paused {
            return 0;
        }

        self.accumulator += frame_time;

        let mut ticks = 0;
        while self.accumulator >= FIXED_TIMESTEP_DURATION && ticks < MAX_STEPS_PER_FRAME {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            ticks += 1;
        }

        // Too far behind: drop the backlog instead of catching up later
        if self.accumulator >= FIXED_TIMESTEP_DURATION {
            self.accumulator = Duration::ZERO;
            self.dropped_frames += 1;
            log::warn!("Simulation fell behind, dropping accumulated time");
        }

        self.tick_count += ticks as u64;
        ticks
    }

    /// Tick length in seconds
    pub fn fixed_timestep(&self) -> f32 {
        FIXED_TIMESTEP
    }

    /// Fraction of a tick left in the accumulator, for render interpolation
    pub fn alpha(&self) -> f32 {
        self.accumulator.as_secs_f32() / FIXED_TIMESTEP
    }

    /// Simulated time in seconds
    pub fn simulated_secs(&self) -> f32 {
        self.tick_count as f32 * FIXED_TIMESTEP
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Simulation paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent update burst
            self.accumulator = Duration::ZERO;
            log::info!("Simulation resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }
}

impl Default for FixedStepClock {
    fn default() -> Self {
        Self::new()
    }
}
