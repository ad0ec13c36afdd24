//! Frame timing.

use std::time::{Duration, Instant};

/// Elapsed-time snapshot handed to the active scene each frame.
///
/// `seconds` is the time since the previous tick; it is opaque elapsed time
/// derived from a monotonic clock, not a calendar timestamp.
#[derive(Debug, Copy, Clone)]
pub struct Timestep {
    /// Time elapsed since the previous frame tick, in seconds.
    pub seconds: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing [`Timestep`] snapshots.
///
/// Delta time is clamped to avoid pathological values when the application is
/// paused by the debugger, minimized, or stalls.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            frame_index: 0,
            dt_min: Duration::from_micros(100),
            dt_max: Duration::from_millis(250),
        }
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the clock baseline, e.g. after resuming from suspension.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock and returns a new [`Timestep`].
    pub fn tick(&mut self) -> Timestep {
        let now = Instant::now();
        let mut dt = now.saturating_duration_since(self.last);

        if dt < self.dt_min {
            dt = self.dt_min;
        } else if dt > self.dt_max {
            dt = self.dt_max;
        }

        self.last = now;

        let ts = Timestep {
            seconds: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ts
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_index_is_monotonic() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick().frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
        assert_eq!(clock.tick().frame_index, 2);
    }

    #[test]
    fn dt_stays_within_clamps() {
        let min = Duration::from_millis(1);
        let max = Duration::from_millis(10);
        let mut clock = FrameClock::with_clamps(min, max);

        for _ in 0..3 {
            let ts = clock.tick();
            assert!(ts.seconds >= min.as_secs_f32());
            assert!(ts.seconds <= max.as_secs_f32());
        }
    }
}
