//! Verification Status
//!
//! The single confidence → status threshold table. Both the single-model and
//! the multi-model paths map confidence through [`VerificationStatus::from_confidence`];
//! downstream consumers branch on the rendered status string.

use serde::{Deserialize, Serialize};

/// Verdict status derived from a confidence in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    Verified,
    LikelyTrue,
    Uncertain,
    LikelyFalse,
    Unverified,
}

/// Lower bounds of each status band, highest first.
pub const STATUS_THRESHOLDS: [(f64, VerificationStatus); 4] = [
    (0.8, VerificationStatus::Verified),
    (0.6, VerificationStatus::LikelyTrue),
    (0.4, VerificationStatus::Uncertain),
    (0.2, VerificationStatus::LikelyFalse),
];

impl VerificationStatus {
    /// Map a confidence to its status. Monotonic in `confidence`; NaN maps to
    /// `Unverified`.
    pub fn from_confidence(confidence: f64) -> Self {
        STATUS_THRESHOLDS
            .iter()
            .find(|(threshold, _)| confidence >= *threshold)
            .map(|(_, status)| *status)
            .unwrap_or(VerificationStatus::Unverified)
    }

    /// Status string as consumed by tool layers.
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Verified => "VERIFIED",
            VerificationStatus::LikelyTrue => "LIKELY_TRUE",
            VerificationStatus::Uncertain => "UNCERTAIN",
            VerificationStatus::LikelyFalse => "LIKELY_FALSE",
            VerificationStatus::Unverified => "UNVERIFIED",
        }
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
