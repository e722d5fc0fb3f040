use crate::mood::MoodBuckets;
use crate::utils::error_handling::safe_lock;
use crate::utils::errors::AppError;
use std::sync::{Arc, Mutex};

/// Where the fetch → classify pipeline currently is
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AnalysisState {
    #[default]
    Idle,
    Fetching,
    Classifying,
    Ready(MoodBuckets),
    Failed(String),
}

impl AnalysisState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, AnalysisState::Fetching | AnalysisState::Classifying)
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnalysisState::Idle => "idle",
            AnalysisState::Fetching => "fetching",
            AnalysisState::Classifying => "classifying",
            AnalysisState::Ready(_) => "ready",
            AnalysisState::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Default)]
struct SessionInner {
    state: AnalysisState,
    generation: u64,
}

/// Shared handle over the pipeline state.
///
/// Only one run may be in flight. Every run is tagged with a generation;
/// `cancel` bumps it so a run that finishes later cannot publish its result.
#[derive(Debug, Clone, Default)]
pub struct AnalysisSession {
    inner: Arc<Mutex<SessionInner>>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AnalysisState {
        safe_lock(&self.inner, "AnalysisSession").state.clone()
    }

    /// Buckets of the last completed run, if the session is `Ready`
    pub fn buckets(&self) -> Option<MoodBuckets> {
        match &safe_lock(&self.inner, "AnalysisSession").state {
            AnalysisState::Ready(buckets) => Some(buckets.clone()),
            _ => None,
        }
    }

    /// Start a run: Idle/Ready/Failed → Fetching. Rejected while a run is in flight.
    pub fn begin(&self) -> Result<u64, AppError> {
        let mut inner = safe_lock(&self.inner, "AnalysisSession");
        if inner.state.is_in_flight() {
            log::warn!("[Session] Refusing new analysis, one is already {}", inner.state.label());
            return Err(AppError::Busy);
        }
        inner.generation += 1;
        inner.state = AnalysisState::Fetching;
        log::debug!("[Session] Run {} started", inner.generation);
        Ok(inner.generation)
    }

    /// Move run `generation` to `next`. Returns false (and changes nothing) if the run was cancelled.
    pub fn advance(&self, generation: u64, next: AnalysisState) -> bool {
        let mut inner = safe_lock(&self.inner, "AnalysisSession");
        if inner.generation != generation || !inner.state.is_in_flight() {
            log::debug!(
                "[Session] Dropping stale transition of run {} to {}",
                generation,
                next.label()
            );
            return false;
        }
        log::debug!(
            "[Session] Run {}: {} -> {}",
            generation,
            inner.state.label(),
            next.label()
        );
        inner.state = next;
        true
    }

    /// Abandon any in-flight run and return to Idle
    pub fn cancel(&self) {
        let mut inner = safe_lock(&self.inner, "AnalysisSession");
        if inner.state.is_in_flight() {
            log::info!("[Session] Cancelling run {}", inner.generation);
            inner.generation += 1;
            inner.state = AnalysisState::Idle;
        }
    }

    /// Forget any result and return to Idle (e.g. after logout)
    pub fn reset(&self) {
        let mut inner = safe_lock(&self.inner, "AnalysisSession");
        inner.generation += 1;
        inner.state = AnalysisState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let session = AnalysisSession::new();
        assert_eq!(session.state(), AnalysisState::Idle);

        let run = session.begin().unwrap();
        assert_eq!(session.state(), AnalysisState::Fetching);
        assert!(session.advance(run, AnalysisState::Classifying));
        assert!(session.advance(run, AnalysisState::Ready(MoodBuckets::default())));
        assert_eq!(session.buckets(), Some(MoodBuckets::default()));
    }

    #[test]
    fn test_second_run_rejected_while_in_flight() {
        let session = AnalysisSession::new();
        session.begin().unwrap();
        assert!(matches!(session.begin(), Err(AppError::Busy)));
    }

    #[test]
    fn test_new_run_allowed_after_failure() {
        let session = AnalysisSession::new();
        let run = session.begin().unwrap();
        assert!(session.advance(run, AnalysisState::Failed("boom".to_string())));
        assert!(session.begin().is_ok());
    }

    #[test]
    fn test_cancel_discards_late_result() {
        let session = AnalysisSession::new();
        let run = session.begin().unwrap();
        session.cancel();

        assert_eq!(session.state(), AnalysisState::Idle);
        assert!(!session.advance(run, AnalysisState::Ready(MoodBuckets::default())));
        assert_eq!(session.state(), AnalysisState::Idle);
        assert!(session.buckets().is_none());
    }

    #[test]
    fn test_cancel_when_ready_keeps_result() {
        let session = AnalysisSession::new();
        let run = session.begin().unwrap();
        session.advance(run, AnalysisState::Ready(MoodBuckets::default()));
        session.cancel();
        assert!(session.buckets().is_some());

        session.reset();
        assert!(session.buckets().is_none());
    }
}
