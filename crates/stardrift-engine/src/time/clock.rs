use std::fmt;
use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Wall-clock timer producing per-frame deltas and running averages.
///
/// The first tick only establishes a baseline and reports `dt = 0`, so the
/// simulation never sees a spike from the time spent on startup.
///
/// Deltas are clamped to `dt_max` to keep the simulation stable after a stall
/// (debugger break, minimized window).
#[derive(Debug, Clone)]
pub struct GameClock {
    last: Option<Instant>,
    dt: f32,
    frame_count: u64,
    /// Sum of clamped deltas: the time the simulation has seen.
    elapsed: Duration,
    /// Unclamped wall time since the first tick; feeds the averages.
    wall_elapsed: Duration,
    dt_max: Duration,
    stopped: bool,
}

impl GameClock {
    /// Creates a new clock with the default 0.25s delta clamp.
    pub fn new() -> Self {
        Self::with_max_delta(Duration::from_millis(250))
    }

    /// Creates a clock with a custom delta clamp.
    pub fn with_max_delta(dt_max: Duration) -> Self {
        Self {
            last: None,
            dt: 0.0,
            frame_count: 0,
            elapsed: Duration::ZERO,
            wall_elapsed: Duration::ZERO,
            dt_max,
            stopped: false,
        }
    }

    /// Advances the clock to `Instant::now()`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to `now`.
    ///
    /// Ticks after `stop()` are ignored and return the last snapshot.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        if self.stopped {
            log::debug!("GameClock::tick after stop; ignored");
            return self.snapshot();
        }

        let wall = match self.last {
            None => Duration::ZERO,
            Some(last) => now.saturating_duration_since(last),
        };
        let dt = wall.min(self.dt_max);

        self.last = Some(now);
        self.dt = dt.as_secs_f32();
        self.elapsed += dt;
        self.wall_elapsed += wall;
        self.frame_count = self.frame_count.wrapping_add(1);

        self.snapshot()
    }

    /// Seconds elapsed between the two most recent ticks.
    #[inline]
    pub fn frame_delta(&self) -> f32 {
        self.dt
    }

    /// Number of ticks recorded so far.
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Total clamped time accumulated across all ticks.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Wall-clock time between the first and the latest tick.
    #[inline]
    pub fn wall_elapsed(&self) -> Duration {
        self.wall_elapsed
    }

    /// Average frames per second since the first tick, or 0 if no time has passed.
    pub fn average_fps(&self) -> f64 {
        let secs = self.wall_elapsed.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.measured_frames() as f64 / secs
    }

    /// Average seconds per frame since the first tick, or 0 if no frame was measured.
    pub fn average_spf(&self) -> f64 {
        let frames = self.measured_frames();
        if frames == 0 {
            return 0.0;
        }
        self.wall_elapsed.as_secs_f64() / frames as f64
    }

    /// Finalizes timing. Subsequent ticks are ignored.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Summary of the timing data gathered so far.
    pub fn report(&self) -> TimingReport {
        TimingReport {
            frames: self.frame_count,
            elapsed_secs: self.wall_elapsed.as_secs_f64(),
            average_fps: self.average_fps(),
            average_spf: self.average_spf(),
        }
    }

    // The baseline tick does not close a frame interval.
    fn measured_frames(&self) -> u64 {
        self.frame_count.saturating_sub(1)
    }

    fn snapshot(&self) -> FrameTime {
        FrameTime {
            dt: self.dt,
            frame_index: self.frame_count.saturating_sub(1),
        }
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Human-readable timing summary produced by [`GameClock::report`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TimingReport {
    pub frames: u64,
    pub elapsed_secs: f64,
    pub average_fps: f64,
    pub average_spf: f64,
}

impl fmt::Display for TimingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} frames in {:.3}s; average fps: {:.2}; average spf: {:.6}",
            self.frames, self.elapsed_secs, self.average_fps, self.average_spf
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration { Duration::from_millis(n) }

    #[test]
    fn first_tick_reports_zero_delta() {
        let mut clock = GameClock::new();
        let ft = clock.tick_at(Instant::now());
        assert_eq!(ft.dt, 0.0);
        assert_eq!(ft.frame_index, 0);
        assert_eq!(clock.frame_delta(), 0.0);
    }

    #[test]
    fn delta_is_time_between_ticks() {
        let mut clock = GameClock::new();
        let t0 = Instant::now();
        clock.tick_at(t0);
        let ft = clock.tick_at(t0 + ms(20));
        assert!((ft.dt - 0.020).abs() < 1e-6);
        assert_eq!(ft.frame_index, 1);
    }

    #[test]
    fn delta_is_clamped_after_stall() {
        let mut clock = GameClock::with_max_delta(ms(100));
        let t0 = Instant::now();
        clock.tick_at(t0);
        let ft = clock.tick_at(t0 + Duration::from_secs(5));
        assert!((ft.dt - 0.1).abs() < 1e-6);
    }

    #[test]
    fn zero_elapsed_does_not_divide_by_zero() {
        let mut clock = GameClock::new();
        assert_eq!(clock.average_fps(), 0.0);
        assert_eq!(clock.average_spf(), 0.0);

        let t0 = Instant::now();
        clock.tick_at(t0);
        clock.tick_at(t0);
        assert_eq!(clock.average_fps(), 0.0);
        assert_eq!(clock.average_spf(), 0.0);
    }

    #[test]
    fn averages_over_steady_frames() {
        let mut clock = GameClock::new();
        let t0 = Instant::now();
        for i in 0..=10 {
            clock.tick_at(t0 + ms(10 * i));
        }
        assert!((clock.average_fps() - 100.0).abs() < 1e-6);
        assert!((clock.average_spf() - 0.010).abs() < 1e-9);
    }

    #[test]
    fn stop_freezes_the_clock() {
        let mut clock = GameClock::new();
        let t0 = Instant::now();
        clock.tick_at(t0);
        clock.tick_at(t0 + ms(50));
        clock.stop();

        let before = clock.report();
        clock.tick_at(t0 + ms(500));
        assert!(clock.is_stopped());
        assert_eq!(clock.report(), before);
        assert_eq!(before.frames, 2);
    }

    #[test]
    fn report_is_human_readable() {
        let mut clock = GameClock::new();
        let t0 = Instant::now();
        clock.tick_at(t0);
        clock.tick_at(t0 + ms(500));
        let text = clock.report().to_string();
        assert!(text.contains("2 frames"));
        assert!(text.contains("average fps: 2.00"));
    }

    #[test]
    fn averages_use_wall_time_across_stalls() {
        let mut clock = GameClock::new();
        let t0 = Instant::now();
        clock.tick_at(t0);
        clock.tick_at(t0 + Duration::from_secs(1));
        let ft = clock.tick_at(t0 + Duration::from_secs(2));

        // Simulation still sees the clamped step.
        assert!((ft.dt - 0.25).abs() < 1e-6);
        assert_eq!(clock.elapsed(), ms(500));

        assert_eq!(clock.wall_elapsed(), Duration::from_secs(2));
        assert!((clock.average_fps() - 1.0).abs() < 1e-9);
        assert!((clock.average_spf() - 1.0).abs() < 1e-9);
        assert!((clock.report().elapsed_secs - 2.0).abs() < 1e-9);
    }
}
