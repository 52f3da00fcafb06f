//! Performance measurement.

use std::{
    cell::Cell,
    fmt,
    time::{Duration, Instant},
};

/// Measures how long an operation takes, averaged over all runs since it was last displayed.
///
/// Collected timings are averaged and reset when the timer is displayed using `{}`
/// ([`std::fmt::Display`]).
#[derive(Debug)]
pub struct Timer {
    name: &'static str,
    runs: Cell<u32>,
    total: Cell<Duration>,
}

impl Timer {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            runs: Cell::new(0),
            total: Cell::new(Duration::ZERO),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Invokes a closure, measuring and recording the time it takes.
    pub fn time<T>(&mut self, timee: impl FnOnce() -> T) -> T {
        let _guard = self.start();
        timee()
    }

    /// Starts timing an operation.
    ///
    /// The time until the returned [`TimerGuard`] is dropped is recorded.
    pub fn start(&mut self) -> TimerGuard<'_> {
        TimerGuard {
            start: Instant::now(),
            timer: self,
        }
    }

    /// Returns the number of recorded runs since the last reset.
    pub fn runs(&self) -> u32 {
        self.runs.get()
    }

    /// Returns the average duration of the recorded runs, or [`None`] if nothing was recorded.
    pub fn average(&self) -> Option<Duration> {
        match self.runs.get() {
            0 => None,
            runs => Some(self.total.get() / runs),
        }
    }

    /// Discards all recorded runs.
    pub fn reset(&self) {
        self.runs.set(0);
        self.total.set(Duration::ZERO);
    }

    fn record(&mut self, duration: Duration) {
        let runs = self.runs.get_mut();
        let total = self.total.get_mut();
        match (runs.checked_add(1), total.checked_add(duration)) {
            (Some(r), Some(t)) => {
                *runs = r;
                *total = t;
            }
            // Saturated; start over with just this run.
            _ => {
                *runs = 1;
                *total = duration;
            }
        }
    }
}

/// Displays the average recorded time and resets it.
impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let runs = self.runs();
        let avg_ms = self.average().unwrap_or_default().as_secs_f32() * 1000.0;
        self.reset();

        write!(f, "{}: {runs}x{avg_ms:.02}ms", self.name)
    }
}

/// Guard returned by [`Timer::start`]. Stops timing the operation when dropped.
pub struct TimerGuard<'a> {
    start: Instant,
    timer: &'a mut Timer,
}

impl Drop for TimerGuard<'_> {
    fn drop(&mut self) {
        self.timer.record(self.start.elapsed());
    }
}
