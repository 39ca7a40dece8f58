//! Confidence Aggregator
//!
//! Weighted mean of succeeded results, renormalized over the weights that
//! actually succeeded.

use cyrano_verify_core::{ModelResult, VerificationStatus};

/// Aggregated confidence and its status.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregate {
    pub confidence: f64,
    pub status: VerificationStatus,
    pub succeeded: usize,
    pub failed: usize,
}

/// `Σ(wᵢ·cᵢ) / Σ(wᵢ)` over succeeded results; 0 when nothing succeeded or the
/// succeeded weights sum to zero. Always within [0, 1].
pub fn combine(results: &[ModelResult]) -> Aggregate {
    let (weighted, total_weight, succeeded) = results
        .iter()
        .filter(|r| r.is_success())
        .fold((0.0_f64, 0.0_f64, 0usize), |(sum, weight, n), r| {
            (sum + r.weight * r.confidence, weight + r.weight, n + 1)
        });

    let confidence = if total_weight > 0.0 {
        (weighted / total_weight).clamp(0.0, 1.0)
    } else {
        0.0
    };

    Aggregate {
        confidence,
        status: VerificationStatus::from_confidence(confidence),
        succeeded,
        failed: results.len() - succeeded,
    }
}
