use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,

    /// Seconds since the clock started. Drives the shader `time` uniform.
    pub elapsed: f32,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

impl FrameTime {
    /// Synthetic frame `frame_index` of a fixed-rate sequence.
    pub fn fixed(frame_index: u64, dt: f32) -> Self {
        Self { dt, elapsed: frame_index as f32 * dt, frame_index }
    }
}

/// Frame clock producing `FrameTime` snapshots.
///
/// One clock per graph (or per loop), so several animated graphs never share
/// delta-time state.
///
/// Delta time is clamped to avoid pathological values when the host stalls or
/// is paused by the debugger. `elapsed` is not clamped.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a new clock with default clamps.
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the delta baseline. `elapsed` keeps counting from the original start.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last).clamp(self.dt_min, self.dt_max);
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: now.saturating_duration_since(self.start).as_secs_f32(),
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
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
    fn tick_counts_frames_and_clamps() {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(1), Duration::from_millis(2));
        let a = clock.tick();
        let b = clock.tick();
        assert_eq!(a.frame_index, 0);
        assert_eq!(b.frame_index, 1);
        assert!(a.dt >= 0.001 && a.dt <= 0.002);
        assert!(b.elapsed >= a.elapsed);
    }

    #[test]
    fn fixed_frames_advance_elapsed() {
        let ft = FrameTime::fixed(30, 1.0 / 60.0);
        assert_eq!(ft.frame_index, 30);
        assert!((ft.elapsed - 0.5).abs() < 1e-6);
    }
}
