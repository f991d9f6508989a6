//! Wall-Clock Timing
//!
//! Every duration in rulebench is reported in milliseconds as `f64`, so
//! sub-millisecond rule evaluations keep their precision.

use std::time::{Duration, Instant};

/// Convert a `Duration` into fractional milliseconds
#[inline(always)]
pub fn duration_to_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// Timer for measuring a single call
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer
    #[inline(always)]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed time since start
    #[inline(always)]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Elapsed time since start, in milliseconds
    #[inline(always)]
    pub fn elapsed_ms(&self) -> f64 {
        duration_to_ms(self.start.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_to_ms() {
        assert!((duration_to_ms(Duration::from_micros(1500)) - 1.5).abs() < 1e-9);
        assert_eq!(duration_to_ms(Duration::ZERO), 0.0);
    }

    #[test]
    fn test_timer() {
        let timer = Timer::start();
        std::thread::sleep(Duration::from_millis(10));
        let ms = timer.elapsed_ms();

        // sleep never returns early
        assert!(ms >= 10.0);
        assert!(timer.elapsed() >= Duration::from_millis(10));
    }
}
