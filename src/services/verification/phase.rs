//! Request Phases
//!
//! Strictly forward state machine for one `execute` call.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestPhase {
    ResolvingMode,
    SelectingProviders,
    Executing,
    Aggregating,
    FallbackMerge,
    Done,
}

impl RequestPhase {
    /// The phase after this one; `Done` is terminal.
    pub fn next(&self) -> Option<RequestPhase> {
        match self {
            RequestPhase::ResolvingMode => Some(RequestPhase::SelectingProviders),
            RequestPhase::SelectingProviders => Some(RequestPhase::Executing),
            RequestPhase::Executing => Some(RequestPhase::Aggregating),
            RequestPhase::Aggregating => Some(RequestPhase::FallbackMerge),
            RequestPhase::FallbackMerge => Some(RequestPhase::Done),
            RequestPhase::Done => None,
        }
    }
}

impl std::fmt::Display for RequestPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestPhase::ResolvingMode => write!(f, "RESOLVING_MODE"),
            RequestPhase::SelectingProviders => write!(f, "SELECTING_PROVIDERS"),
            RequestPhase::Executing => write!(f, "EXECUTING"),
            RequestPhase::Aggregating => write!(f, "AGGREGATING"),
            RequestPhase::FallbackMerge => write!(f, "FALLBACK_MERGE"),
            RequestPhase::Done => write!(f, "DONE"),
        }
    }
}

/// Tracks the current phase of one request.
///
/// Phases may be skipped (the heuristic-only path jumps from provider
/// selection to the merge) but never revisited.
#[derive(Debug)]
pub struct PhaseTracker {
    request_id: String,
    current: RequestPhase,
    history: Vec<RequestPhase>,
}

impl PhaseTracker {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            current: RequestPhase::ResolvingMode,
            history: vec![RequestPhase::ResolvingMode],
        }
    }

    pub fn current(&self) -> RequestPhase {
        self.current
    }

    pub fn history(&self) -> &[RequestPhase] {
        &self.history
    }

    /// Move to `phase`. Backward or repeated moves are ignored and logged.
    pub fn advance(&mut self, phase: RequestPhase) {
        if phase <= self.current {
            tracing::warn!(
                "[{}] ignoring phase change {} -> {}",
                self.request_id,
                self.current,
                phase
            );
            return;
        }
        tracing::debug!("[{}] {} -> {}", self.request_id, self.current, phase);
        self.current = phase;
        self.history.push(phase);
    }
}
