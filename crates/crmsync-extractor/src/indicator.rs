//! Per-pass progress indicator
//!
//! One indicator is created for each pass and consumed when the pass ends.
//! It tracks the pass state, remembers every status it showed and reports
//! each transition as a tracing event.

use crate::types::PassState;
use std::time::{Duration, Instant};
use tracing::{error, info};

/// A status shown while a pass runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndicatorStatus {
    /// The pass is running
    Extracting,
    /// The pass finished with this message
    Success(String),
    /// The pass failed with this message
    Error(String),
}

/// Progress indicator owned by one extraction pass
#[derive(Debug)]
pub struct PassIndicator {
    state: PassState,
    history: Vec<IndicatorStatus>,
    started: Option<Instant>,
}

/// What an indicator showed over its pass
#[derive(Debug, Clone, PartialEq)]
pub struct PassReport {
    /// Terminal state
    pub state: PassState,
    /// Every status shown, in order
    pub history: Vec<IndicatorStatus>,
    /// Time spent between start and finish
    pub elapsed: Duration,
}

impl Default for PassIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl PassIndicator {
    /// A fresh, idle indicator
    pub fn new() -> Self {
        Self {
            state: PassState::Idle,
            history: Vec::new(),
            started: None,
        }
    }

    /// Current state
    pub fn state(&self) -> PassState {
        self.state
    }

    /// Statuses shown so far
    pub fn history(&self) -> &[IndicatorStatus] {
        &self.history
    }

    /// Enter `Extracting`
    pub fn start(&mut self, location: &str) {
        self.state = PassState::Extracting;
        self.started = Some(Instant::now());
        self.history.push(IndicatorStatus::Extracting);
        info!(location, "Extracting data...");
    }

    /// Finish as `Done`
    pub fn succeed(mut self, message: &str) -> PassReport {
        self.history.push(IndicatorStatus::Success(message.to_string()));
        let report = self.finish(PassState::Done);
        info!(elapsed_ms = report.elapsed.as_millis() as u64, "{}", message);
        report
    }

    /// Finish as `Failed`
    pub fn fail(mut self, message: &str) -> PassReport {
        let message = format!("Extraction failed: {}", message);
        error!(message = %message, "Extraction pass failed");
        self.history.push(IndicatorStatus::Error(message));
        self.finish(PassState::Failed)
    }

    fn finish(self, state: PassState) -> PassReport {
        PassReport {
            state,
            history: self.history,
            elapsed: self.started.map(|s| s.elapsed()).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_lifecycle() {
        let mut indicator = PassIndicator::new();
        assert_eq!(indicator.state(), PassState::Idle);
        indicator.start("/app/contacts");
        assert_eq!(indicator.state(), PassState::Extracting);
        let report = indicator.succeed("Extracted: 1 contacts, 0 deals, 0 tasks");
        assert_eq!(report.state, PassState::Done);
        assert_eq!(
            report.history,
            vec![
                IndicatorStatus::Extracting,
                IndicatorStatus::Success("Extracted: 1 contacts, 0 deals, 0 tasks".to_string()),
            ]
        );
    }

    #[test]
    fn test_failure_lifecycle() {
        let mut indicator = PassIndicator::new();
        indicator.start("/app/deals");
        let report = indicator.fail("Store error: database is locked");
        assert_eq!(report.state, PassState::Failed);
        assert_eq!(
            report.history.last(),
            Some(&IndicatorStatus::Error(
                "Extraction failed: Store error: database is locked".to_string()
            ))
        );
    }

    #[test]
    fn test_indicators_are_independent() {
        let mut a = PassIndicator::new();
        let b = PassIndicator::new();
        a.start("/app/tasks");
        assert_eq!(a.history().len(), 1);
        assert!(b.history().is_empty());
        assert_eq!(b.state(), PassState::Idle);
    }
}
