//! Combined Verdict
//!
//! Outbound shape of `execute`.

use serde::{Deserialize, Serialize};

use cyrano_verify_core::{ModelResult, ProviderStrategy, VerificationMode, VerificationStatus};

use super::preferences::ResolutionSource;

/// Which pass produced the verdict's confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceSource {
    Ai,
    Heuristic,
}

/// Output of the local structural analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeuristicReport {
    pub confidence: f64,
    pub status: VerificationStatus,
    /// Human-readable findings, analyzer-specific
    #[serde(default)]
    pub details: Vec<String>,
}

impl HeuristicReport {
    /// Build a report whose status is derived from the shared threshold table.
    pub fn from_confidence(confidence: f64, details: Vec<String>) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            confidence,
            status: VerificationStatus::from_confidence(confidence),
            details,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerdictMetadata {
    /// Assignments that succeeded
    pub models_executed: usize,
    pub models_failed: usize,
    pub elapsed_ms: u64,
    /// Mode came from a saved preference or user defaults
    pub was_user_preference: bool,
    pub mode: VerificationMode,
    pub provider_strategy: ProviderStrategy,
    pub preference_source: ResolutionSource,
    /// Deduplicated, in execution order
    pub providers_used: Vec<String>,
    /// Estimated USD across all calls
    pub total_cost: f64,
    pub confidence_source: ConfidenceSource,
}

/// Final answer for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedVerdict {
    pub combined_confidence: f64,
    pub status: VerificationStatus,
    pub per_role_results: Vec<ModelResult>,
    pub heuristic: HeuristicReport,
    pub metadata: VerdictMetadata,
}
