//! Test Case Lifecycle
//!
//! ```text
//! Pending → EvaluatorBuilding → EvaluatorReady → Sampling → Completed
//!                 │                                  └────→ SampleAborted
//!                 └──→ EvaluatorFailed
//! Pending → NoSamples
//! ```
//!
//! Terminal states never transition again.

use rulebench_report::CaseStatus;
use thiserror::Error;

/// Lifecycle state of one test case
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseState {
    /// Not started
    Pending,
    /// Evaluator construction in progress
    EvaluatorBuilding,
    /// Evaluator built, no sample measured yet
    EvaluatorReady,
    /// Samples are being measured
    Sampling,
    /// Every runnable sample measured
    Completed,
    /// At least one sample's measurement aborted
    SampleAborted,
    /// Evaluator construction failed
    EvaluatorFailed,
    /// Skipped: no recognized samples
    NoSamples,
}

impl CaseState {
    /// Lowercase name used in errors and logs
    pub fn state_name(self) -> &'static str {
        match self {
            CaseState::Pending => "pending",
            CaseState::EvaluatorBuilding => "evaluator-building",
            CaseState::EvaluatorReady => "evaluator-ready",
            CaseState::Sampling => "sampling",
            CaseState::Completed => "completed",
            CaseState::SampleAborted => "sample-aborted",
            CaseState::EvaluatorFailed => "evaluator-failed",
            CaseState::NoSamples => "no-samples",
        }
    }

    /// Whether the state is final
    pub fn is_terminal(self) -> bool {
        self.status().is_some()
    }

    /// Report status for terminal states
    pub fn status(self) -> Option<CaseStatus> {
        match self {
            CaseState::Completed => Some(CaseStatus::Completed),
            CaseState::SampleAborted => Some(CaseStatus::SampleAborted),
            CaseState::EvaluatorFailed => Some(CaseStatus::EvaluatorFailed),
            CaseState::NoSamples => Some(CaseStatus::NoSamples),
            _ => None,
        }
    }
}

/// Rejected lifecycle transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid case state transition: {from} -> {to}")]
pub struct InvalidCaseTransition {
    /// State the case was in
    pub from: &'static str,
    /// Requested state
    pub to: &'static str,
}

/// Guards the lifecycle of one test case
#[derive(Debug)]
pub struct CaseStateMachine {
    state: CaseState,
}

impl CaseStateMachine {
    pub fn new() -> Self {
        Self {
            state: CaseState::Pending,
        }
    }

    pub fn state(&self) -> CaseState {
        self.state
    }

    /// Transition: PENDING → EVALUATOR_BUILDING
    pub fn begin_build(&mut self) -> Result<(), InvalidCaseTransition> {
        self.advance(CaseState::Pending, CaseState::EvaluatorBuilding)
    }

    /// Transition: EVALUATOR_BUILDING → EVALUATOR_READY
    pub fn evaluator_ready(&mut self) -> Result<(), InvalidCaseTransition> {
        self.advance(CaseState::EvaluatorBuilding, CaseState::EvaluatorReady)
    }

    /// Transition: EVALUATOR_BUILDING → EVALUATOR_FAILED
    pub fn evaluator_failed(&mut self) -> Result<(), InvalidCaseTransition> {
        self.advance(CaseState::EvaluatorBuilding, CaseState::EvaluatorFailed)
    }

    /// Transition: PENDING → NO_SAMPLES
    pub fn no_samples(&mut self) -> Result<(), InvalidCaseTransition> {
        self.advance(CaseState::Pending, CaseState::NoSamples)
    }

    /// Transition: EVALUATOR_READY → SAMPLING
    pub fn begin_sampling(&mut self) -> Result<(), InvalidCaseTransition> {
        self.advance(CaseState::EvaluatorReady, CaseState::Sampling)
    }

    /// Transition: SAMPLING → COMPLETED | SAMPLE_ABORTED
    pub fn finish(&mut self, any_aborted: bool) -> Result<(), InvalidCaseTransition> {
        let to = if any_aborted {
            CaseState::SampleAborted
        } else {
            CaseState::Completed
        };
        self.advance(CaseState::Sampling, to)
    }

    fn advance(&mut self, from: CaseState, to: CaseState) -> Result<(), InvalidCaseTransition> {
        if self.state != from {
            return Err(InvalidCaseTransition {
                from: self.state.state_name(),
                to: to.state_name(),
            });
        }
        self.state = to;
        Ok(())
    }
}

impl Default for CaseStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut sm = CaseStateMachine::new();
        sm.begin_build().unwrap();
        sm.evaluator_ready().unwrap();
        sm.begin_sampling().unwrap();
        sm.finish(false).unwrap();

        assert_eq!(sm.state(), CaseState::Completed);
        assert_eq!(sm.state().status(), Some(CaseStatus::Completed));
    }

    #[test]
    fn test_aborted_sampling() {
        let mut sm = CaseStateMachine::new();
        sm.begin_build().unwrap();
        sm.evaluator_ready().unwrap();
        sm.begin_sampling().unwrap();
        sm.finish(true).unwrap();

        assert_eq!(sm.state(), CaseState::SampleAborted);
    }

    #[test]
    fn test_evaluator_failure_is_terminal() {
        let mut sm = CaseStateMachine::new();
        sm.begin_build().unwrap();
        sm.evaluator_failed().unwrap();

        assert!(sm.state().is_terminal());
        let err = sm.begin_sampling().unwrap_err();
        assert_eq!(err.from, "evaluator-failed");
        assert_eq!(err.to, "sampling");
        assert!(sm.begin_build().is_err());
    }

    #[test]
    fn test_cannot_skip_states() {
        let mut sm = CaseStateMachine::new();
        assert!(sm.begin_sampling().is_err());
        assert!(sm.finish(false).is_err());
        assert_eq!(sm.state(), CaseState::Pending);

        sm.no_samples().unwrap();
        assert!(sm.state().is_terminal());
        assert!(sm.begin_build().is_err());
    }
}
