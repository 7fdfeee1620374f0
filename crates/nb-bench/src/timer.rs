//! Warmup-then-measure timing loop.

use std::time::{Duration, Instant};

use crate::error::{BenchError, Result};

/// Number of untimed warmup calls and timed calls for one case.
///
/// Fixed before a case runs; the timer never adapts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub warmup: usize,
    pub iterations: usize,
}

impl Schedule {
    pub const fn new(warmup: usize, iterations: usize) -> Self {
        Schedule { warmup, iterations }
    }

    /// Both counts must be positive.
    pub fn validate(&self) -> Result<()> {
        if self.warmup == 0 {
            return Err(BenchError::InvalidConfig {
                field: "schedule.warmup",
                message: "warmup count must be greater than 0".to_string(),
            });
        }
        if self.iterations == 0 {
            return Err(BenchError::InvalidConfig {
                field: "schedule.iterations",
                message: "iteration count must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Schedule::new(20, 200)
    }
}

/// Runs a unit of work `warmup` times untimed, then `iterations` times timed,
/// and reports the mean wall-clock time per timed call in microseconds.
///
/// The first error returned by the unit of work aborts the loop and is
/// returned unchanged.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    schedule: Schedule,
}

impl Timer {
    pub fn new(schedule: Schedule) -> Self {
        Timer { schedule }
    }

    pub fn schedule(&self) -> Schedule {
        self.schedule
    }

    /// Times the whole measured loop with one clock read on each side.
    pub fn measure<E, F>(&self, mut call: F) -> std::result::Result<f64, E>
    where
        F: FnMut() -> std::result::Result<(), E>,
    {
        for _ in 0..self.schedule.warmup {
            call()?;
        }

        let start = Instant::now();
        for _ in 0..self.schedule.iterations {
            call()?;
        }
        Ok(micros_per_call(start.elapsed(), self.schedule.iterations))
    }

    /// Like [`Timer::measure`], but runs `reset` before every call (warmup
    /// included). Only the calls are timed; each one is clocked separately
    /// and the durations summed.
    pub fn measure_with_reset<S, E, R, F>(
        &self,
        state: &mut S,
        mut reset: R,
        mut call: F,
    ) -> std::result::Result<f64, E>
    where
        S: ?Sized,
        R: FnMut(&mut S) -> std::result::Result<(), E>,
        F: FnMut(&mut S) -> std::result::Result<(), E>,
    {
        for _ in 0..self.schedule.warmup {
            reset(state)?;
            call(state)?;
        }

        let mut total = Duration::ZERO;
        for _ in 0..self.schedule.iterations {
            reset(state)?;
            let start = Instant::now();
            call(state)?;
            total += start.elapsed();
        }
        Ok(micros_per_call(total, self.schedule.iterations))
    }
}

// Clamped so a coarse clock reporting zero still yields a positive mean.
fn micros_per_call(total: Duration, iterations: usize) -> f64 {
    let micros = total.as_secs_f64() * 1e6 / iterations as f64;
    micros.max(f64::MIN_POSITIVE)
}
