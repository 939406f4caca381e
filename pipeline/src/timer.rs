//! Rolling-average frame timer

use blockmatch_rs::History;
use std::time::{Duration, Instant};

/// Measures how many times per second some stage runs, averaged over the
/// last few runs.
pub struct RollingTimer {
    /// Elapsed seconds of each recent run.
    window: History<f64>,

    started: Option<Instant>,
}

impl RollingTimer {
    /// Construct a timer averaging over the last `window` samples.
    pub fn new(window: usize) -> Self {
        Self {
            window: History::new(window),
            started: None,
        }
    }

    /// Start timing a run.
    pub fn tic(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Finish timing a run and record it.
    ///
    /// Returns the elapsed time, or `None` if the timer was never started.
    pub fn toc(&mut self) -> Option<Duration> {
        let elapsed = self.started.take()?.elapsed();
        self.record(elapsed);

        Some(elapsed)
    }

    /// Record a run that was timed elsewhere.
    pub fn record(&mut self, elapsed: Duration) {
        self.window.push(elapsed.as_secs_f64());
    }

    /// Time a closure as one run.
    pub fn time<T, F>(&mut self, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        self.tic();
        let result = f();
        self.toc();

        result
    }

    /// Number of samples currently averaged over.
    pub fn samples(&self) -> usize {
        self.window.len()
    }

    /// Average runs per second over the window.
    ///
    /// This is the sample count over the total elapsed time. It is zero with
    /// no samples, or when the samples add up to no time at all.
    pub fn fps(&self) -> f64 {
        let total = self.window.sum();
        if self.window.is_empty() || total <= 0.0 {
            return 0.0;
        }

        self.window.len() as f64 / total
    }
}
