//! Sample Executor
//!
//! Repeatedly awaits a unit of work and records how long each call took.
//!
//! ```text
//! warmup (optional, timings discarded)
//!        │
//!        ▼
//! measure ── until iteration budget spent OR timeout budget exceeded
//!        │    (at least one measured call always runs)
//!        ▼
//!   SampleRun { samples (ms), aborted?, error? }
//! ```
//!
//! A call is never preempted: the timeout only prevents the next call from
//! starting. A failing or panicking call stops collection and marks the run
//! aborted; the error never propagates to the caller.

use crate::measure::Timer;
use crate::model::BenchmarkConfig;
use futures::FutureExt;
use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

/// Raw output of one sampling pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleRun {
    /// Measured call durations in milliseconds, in call order
    pub samples: Vec<f64>,
    /// Warmup calls that completed
    pub warmup_calls: u64,
    /// Wall-clock time of the measurement phase
    pub total_time: Duration,
    /// Whether collection stopped because a call failed
    pub aborted: bool,
    /// Error text of the failing call
    pub error: Option<String>,
}

impl SampleRun {
    fn abort(&mut self, message: String) {
        self.aborted = true;
        self.error = Some(message);
    }
}

/// Run `work` under the warmup, iteration and timeout policy of `config`.
///
/// An iteration budget of zero is treated as one: every successful run has at
/// least one sample.
pub async fn run_samples<F, Fut, T, E>(config: &BenchmarkConfig, mut work: F) -> SampleRun
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut run = SampleRun::default();

    if config.warmup.enabled {
        for _ in 0..config.warmup.iterations {
            match invoke(&mut work).await {
                Ok(output) => {
                    std::hint::black_box(output);
                    run.warmup_calls += 1;
                }
                Err(message) => {
                    run.abort(format!("warmup call failed: {message}"));
                    return run;
                }
            }
        }
    }

    let iterations = config.iterations.max(1);
    let measure_timer = Timer::start();

    while (run.samples.len() as u64) < iterations {
        if !run.samples.is_empty() && measure_timer.elapsed() >= config.timeout {
            break;
        }

        let timer = Timer::start();
        let outcome = invoke(&mut work).await;
        let elapsed_ms = timer.elapsed_ms();

        match outcome {
            Ok(output) => {
                std::hint::black_box(output);
                run.samples.push(elapsed_ms);
            }
            Err(message) => {
                run.abort(message);
                break;
            }
        }
    }

    run.total_time = measure_timer.elapsed();
    run
}

/// Await one call, turning both errors and panics into error text
async fn invoke<F, Fut, T, E>(work: &mut F) -> Result<T, String>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    match AssertUnwindSafe(async move { work().await })
        .catch_unwind()
        .await
    {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(e.to_string()),
        Err(panic) => Err(panic_message(panic.as_ref())),
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked: unknown payload".to_string()
    }
}
