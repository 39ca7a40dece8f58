//! Model Results
//!
//! One `ModelResult` is produced per executed assignment, success or not.

use serde::{Deserialize, Serialize};

use crate::assignment::{ModelAssignment, ModelRole};

/// Lifecycle of a single assignment within a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentState {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl AssignmentState {
    /// Terminal states are the only ones the aggregator reads.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AssignmentState::Succeeded | AssignmentState::Failed)
    }
}

impl std::fmt::Display for AssignmentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentState::Pending => write!(f, "pending"),
            AssignmentState::Running => write!(f, "running"),
            AssignmentState::Succeeded => write!(f, "succeeded"),
            AssignmentState::Failed => write!(f, "failed"),
        }
    }
}

/// Estimated token counts for one call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub input: u32,
    pub output: u32,
}

/// Signal words found in a model's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceIndicator {
    HighConfidence,
    ModerateConfidence,
    LowConfidence,
    ContradictoryEvidence,
    SupportingEvidence,
}

impl std::fmt::Display for ConfidenceIndicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfidenceIndicator::HighConfidence => write!(f, "high_confidence"),
            ConfidenceIndicator::ModerateConfidence => write!(f, "moderate_confidence"),
            ConfidenceIndicator::LowConfidence => write!(f, "low_confidence"),
            ConfidenceIndicator::ContradictoryEvidence => write!(f, "contradictory_evidence"),
            ConfidenceIndicator::SupportingEvidence => write!(f, "supporting_evidence"),
        }
    }
}

/// Outcome of one assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelResult {
    pub provider: String,
    pub model: String,
    pub role: ModelRole,
    /// Weight copied from the assignment, used for renormalization
    pub weight: f64,
    /// Terminal state (succeeded or failed)
    pub state: AssignmentState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_text: Option<String>,
    /// Confidence in [0, 1]; 0 for failures
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall-clock latency of the call in milliseconds
    pub latency_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<TokenUsage>,
    /// Estimated cost in USD
    #[serde(default)]
    pub cost: f64,
    /// Status/verdict line of the answer, else its first sentence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub confidence_indicators: Vec<ConfidenceIndicator>,
    /// Sources, URLs and bracketed references cited in the answer
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources_mentioned: Vec<String>,
}

impl ModelResult {
    /// Build a succeeded result for `assignment`.
    pub fn succeeded(
        assignment: &ModelAssignment,
        response_text: String,
        confidence: f64,
        latency_ms: u64,
    ) -> Self {
        Self {
            provider: assignment.provider.clone(),
            model: assignment.model.clone(),
            role: assignment.role,
            weight: assignment.weight,
            state: AssignmentState::Succeeded,
            response_text: Some(response_text),
            confidence: confidence.clamp(0.0, 1.0),
            error: None,
            latency_ms,
            tokens_used: None,
            cost: 0.0,
            verification_summary: None,
            confidence_indicators: Vec::new(),
            sources_mentioned: Vec::new(),
        }
    }

    /// Build a failed result for `assignment` with confidence 0.
    pub fn failed(assignment: &ModelAssignment, error: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            provider: assignment.provider.clone(),
            model: assignment.model.clone(),
            role: assignment.role,
            weight: assignment.weight,
            state: AssignmentState::Failed,
            response_text: None,
            confidence: 0.0,
            error: Some(error.into()),
            latency_ms,
            tokens_used: None,
            cost: 0.0,
            verification_summary: None,
            confidence_indicators: Vec::new(),
            sources_mentioned: Vec::new(),
        }
    }

    /// Attach token usage and cost estimates.
    pub fn with_usage(mut self, tokens: TokenUsage, cost: f64) -> Self {
        self.tokens_used = Some(tokens);
        self.cost = cost;
        self
    }

    /// Attach what was read out of the answer text.
    pub fn with_analysis(
        mut self,
        summary: String,
        indicators: Vec<ConfidenceIndicator>,
        sources: Vec<String>,
    ) -> Self {
        self.verification_summary = Some(summary);
        self.confidence_indicators = indicators;
        self.sources_mentioned = sources;
        self
    }

    pub fn is_success(&self) -> bool {
        self.state == AssignmentState::Succeeded
    }
}
