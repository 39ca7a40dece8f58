//! Fallback Controller
//!
//! Decides how the local heuristic pass combines with the AI verdict:
//!
//! - no provider configured in simple mode: the heuristic is the verdict
//! - simple mode whose only call failed: the heuristic is the verdict
//! - multi-model with every call failed: the aggregator's 0 stands
//! - otherwise: the AI confidence stands
//!
//! The heuristic report is attached to every verdict and never blended into
//! the AI confidence.

use cyrano_verify_core::{VerificationMode, VerificationStatus};

use super::aggregator::Aggregate;
use crate::models::request::VerificationRequest;
use crate::models::verdict::{ConfidenceSource, HeuristicReport};

/// Local structural analyzer. Must not fail and must not do I/O.
pub trait HeuristicAnalyzer: Send + Sync {
    fn analyze(&self, text: &str, context: Option<&str>) -> HeuristicReport;
}

/// Confidence and status chosen for the verdict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merged {
    pub confidence: f64,
    pub status: VerificationStatus,
    pub source: ConfidenceSource,
}

pub struct FallbackController<'a> {
    analyzer: &'a dyn HeuristicAnalyzer,
}

impl<'a> FallbackController<'a> {
    pub fn new(analyzer: &'a dyn HeuristicAnalyzer) -> Self {
        Self { analyzer }
    }

    /// Run the heuristic pass; its report is normalized through the shared
    /// status table so both paths agree on status for equal confidence.
    pub fn analyze(&self, request: &VerificationRequest) -> HeuristicReport {
        let report = self
            .analyzer
            .analyze(&request.claim, request.context.as_deref());
        HeuristicReport::from_confidence(report.confidence, report.details)
    }

    /// Verdict when no AI call is made at all.
    pub fn heuristic_only(heuristic: &HeuristicReport) -> Merged {
        tracing::warn!("No AI provider available; using heuristic analysis only");
        Merged {
            confidence: heuristic.confidence,
            status: heuristic.status,
            source: ConfidenceSource::Heuristic,
        }
    }

    /// Combine the aggregate with the heuristic report for `mode`.
    pub fn merge(mode: VerificationMode, aggregate: &Aggregate, heuristic: &HeuristicReport) -> Merged {
        if mode == VerificationMode::Simple && aggregate.succeeded == 0 {
            tracing::warn!("Simple verification call failed; falling back to heuristic analysis");
            return Merged {
                confidence: heuristic.confidence,
                status: heuristic.status,
                source: ConfidenceSource::Heuristic,
            };
        }
        if aggregate.succeeded == 0 {
            tracing::error!(
                "All {} model calls failed; verdict confidence is 0",
                aggregate.failed
            );
        }
        Merged {
            confidence: aggregate.confidence,
            status: aggregate.status,
            source: ConfidenceSource::Ai,
        }
    }
}
