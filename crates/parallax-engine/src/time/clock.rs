use std::time::Instant;

/// Source of monotonic timestamps, in seconds from an arbitrary origin.
///
/// Hosts with irregular timers may report values that step backwards; `Clock`
/// absorbs that instead of propagating negative deltas.
pub trait TimeSource {
    fn now_secs(&mut self) -> f64;
}

/// `TimeSource` backed by `std::time::Instant`.
#[derive(Debug, Clone)]
pub struct MonotonicSource {
    origin: Instant,
}

impl MonotonicSource {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicSource {
    fn now_secs(&mut self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous tick. Never negative.
    pub delta: f64,

    /// Seconds since the clock was created.
    pub elapsed: f64,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Elapsed/delta clock used for frame-rate independent animation.
///
/// `elapsed()` never decreases and `tick()` never returns a negative delta,
/// even if the underlying source misbehaves.
pub struct Clock {
    source: Box<dyn TimeSource>,
    origin: f64,
    last_tick: f64,
    last_elapsed: f64,
    frame_index: u64,
    max_delta: Option<f64>,
}

impl Clock {
    /// Creates a clock reading `std::time::Instant`.
    pub fn new() -> Self {
        Self::with_source(Box::new(MonotonicSource::new()))
    }

    /// Creates a clock over a custom time source.
    pub fn with_source(mut source: Box<dyn TimeSource>) -> Self {
        let origin = source.now_secs();
        Self {
            source,
            origin,
            last_tick: origin,
            last_elapsed: 0.0,
            frame_index: 0,
            max_delta: None,
        }
    }

    /// Caps the delta returned by `tick()`.
    ///
    /// Useful when the process is paused by a debugger or the window is
    /// minimized and animation code should not jump forward by the full stall.
    pub fn with_max_delta(mut self, max_delta: f64) -> Self {
        debug_assert!(max_delta >= 0.0);
        self.max_delta = Some(max_delta);
        self
    }

    /// Seconds since creation. Monotonically non-decreasing.
    pub fn elapsed(&mut self) -> f64 {
        let now = self.source.now_secs() - self.origin;
        if now > self.last_elapsed {
            self.last_elapsed = now;
        }
        self.last_elapsed
    }

    /// Advances the clock and returns the frame snapshot.
    pub fn tick(&mut self) -> FrameTime {
        let now = self.source.now_secs();

        let mut delta = (now - self.last_tick).max(0.0);
        if let Some(max) = self.max_delta {
            delta = delta.min(max);
        }

        // Keep the baseline from moving backwards so one bad sample does not
        // inflate the next delta.
        if now > self.last_tick {
            self.last_tick = now;
        }

        let ft = FrameTime {
            delta,
            elapsed: self.elapsed(),
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }

    /// Re-baselines the next delta without touching the elapsed origin.
    ///
    /// Called when the render loop restarts so the first frame after a pause
    /// does not see the whole pause as its delta.
    pub fn reset(&mut self) {
        let now = self.source.now_secs();
        if now > self.last_tick {
            self.last_tick = now;
        }
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// Replays a fixed list of timestamps; repeats the last one when exhausted.
    #[derive(Clone)]
    pub(crate) struct ScriptedSource(pub Rc<RefCell<VecDeque<f64>>>);

    impl ScriptedSource {
        pub(crate) fn new(samples: &[f64]) -> Self {
            Self(Rc::new(RefCell::new(samples.iter().copied().collect())))
        }
    }

    impl TimeSource for ScriptedSource {
        fn now_secs(&mut self) -> f64 {
            let mut q = self.0.borrow_mut();
            if q.len() > 1 {
                q.pop_front().unwrap_or(0.0)
            } else {
                q.front().copied().unwrap_or(0.0)
            }
        }
    }

    fn clock(samples: &[f64]) -> Clock {
        Clock::with_source(Box::new(ScriptedSource::new(samples)))
    }

    // ── tick ──────────────────────────────────────────────────────────────

    #[test]
    fn tick_reports_delta_since_previous_tick() {
        // origin, tick, elapsed, tick, elapsed
        let mut c = clock(&[10.0, 10.5, 10.5, 11.25, 11.25]);
        let a = c.tick();
        assert_eq!(a.delta, 0.5);
        assert_eq!(a.frame_index, 0);
        let b = c.tick();
        assert_eq!(b.delta, 0.75);
        assert_eq!(b.elapsed, 1.25);
        assert_eq!(b.frame_index, 1);
    }

    #[test]
    fn backwards_source_clamps_delta_to_zero() {
        let mut c = clock(&[5.0, 4.0, 4.0, 5.5, 5.5]);
        assert_eq!(c.tick().delta, 0.0);
        // Baseline stayed at 5.0, so the recovery delta is 0.5, not 1.5.
        assert_eq!(c.tick().delta, 0.5);
    }

    #[test]
    fn max_delta_caps_long_stalls() {
        let mut c = clock(&[0.0, 30.0, 30.0]).with_max_delta(0.25);
        assert_eq!(c.tick().delta, 0.25);
    }

    // ── elapsed ───────────────────────────────────────────────────────────

    #[test]
    fn elapsed_never_decreases() {
        let mut c = clock(&[1.0, 3.0, 2.0, 2.5]);
        assert_eq!(c.elapsed(), 2.0);
        assert_eq!(c.elapsed(), 2.0);
        assert_eq!(c.elapsed(), 2.0);
    }

    #[test]
    fn reset_rebaselines_delta_only() {
        let mut c = clock(&[0.0, 8.0, 8.5, 8.5]);
        c.reset();
        let ft = c.tick();
        assert_eq!(ft.delta, 0.5);
        assert_eq!(ft.elapsed, 8.5);
    }

    #[test]
    fn monotonic_clock_is_non_negative() {
        let mut c = Clock::new();
        for _ in 0..100 {
            assert!(c.tick().delta >= 0.0);
        }
    }
}
