//! Verification Modes and Strategies
//!
//! Closed enums for verification depth (`VerificationMode`), provider mixing
//! (`ProviderStrategy`) and prompt thoroughness (`VerificationLevel`).

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Verification depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationMode {
    /// One model (fact check only)
    Simple,
    /// Two models (fact check + trust chain)
    Standard,
    /// Three models (fact check + trust chain + reasoning)
    Comprehensive,
    /// User-defined assignment set
    Custom,
}

impl VerificationMode {
    /// Return all modes.
    pub fn all() -> Vec<VerificationMode> {
        vec![
            VerificationMode::Simple,
            VerificationMode::Standard,
            VerificationMode::Comprehensive,
            VerificationMode::Custom,
        ]
    }

    /// Whether the mode runs through the multi-model path.
    pub fn is_multi_model(&self) -> bool {
        !matches!(self, VerificationMode::Simple)
    }
}

impl Default for VerificationMode {
    fn default() -> Self {
        VerificationMode::Standard
    }
}

impl std::fmt::Display for VerificationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerificationMode::Simple => write!(f, "simple"),
            VerificationMode::Standard => write!(f, "standard"),
            VerificationMode::Comprehensive => write!(f, "comprehensive"),
            VerificationMode::Custom => write!(f, "custom"),
        }
    }
}

impl FromStr for VerificationMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(VerificationMode::Simple),
            "standard" => Ok(VerificationMode::Standard),
            "comprehensive" => Ok(VerificationMode::Comprehensive),
            "custom" => Ok(VerificationMode::Custom),
            other => Err(CoreError::parse(format!("unknown verification mode: {}", other))),
        }
    }
}

/// Whether all roles share one provider or may use different ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderStrategy {
    /// One resolved provider pinned across every role
    Single,
    /// Each role resolves its provider independently
    Mixed,
}

impl Default for ProviderStrategy {
    fn default() -> Self {
        ProviderStrategy::Single
    }
}

impl std::fmt::Display for ProviderStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderStrategy::Single => write!(f, "single"),
            ProviderStrategy::Mixed => write!(f, "mixed"),
        }
    }
}

impl FromStr for ProviderStrategy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(ProviderStrategy::Single),
            "mixed" => Ok(ProviderStrategy::Mixed),
            other => Err(CoreError::parse(format!("unknown provider strategy: {}", other))),
        }
    }
}

/// Prompt thoroughness requested from the fact-check role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationLevel {
    Basic,
    Thorough,
    Exhaustive,
}

impl Default for VerificationLevel {
    fn default() -> Self {
        VerificationLevel::Thorough
    }
}

impl std::fmt::Display for VerificationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerificationLevel::Basic => write!(f, "basic"),
            VerificationLevel::Thorough => write!(f, "thorough"),
            VerificationLevel::Exhaustive => write!(f, "exhaustive"),
        }
    }
}
