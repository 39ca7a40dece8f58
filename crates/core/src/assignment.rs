//! Model Assignments
//!
//! A `ModelAssignment` is one unit of work: which provider/model runs which
//! role, and how much its confidence counts. Providers are carried as their
//! lowercase identifier here; the llm crate owns the closed provider enum.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::mode::ProviderStrategy;

/// Purpose of a model call within one verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelRole {
    /// Direct fact-checking of the claim
    FactCheck,
    /// Source credibility / provenance analysis
    TrustChain,
    /// Socratic reasoning over the claim's logic
    Reasoning,
}

impl ModelRole {
    /// Return all roles in canonical execution order.
    pub fn all() -> Vec<ModelRole> {
        vec![ModelRole::FactCheck, ModelRole::TrustChain, ModelRole::Reasoning]
    }
}

impl std::fmt::Display for ModelRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelRole::FactCheck => write!(f, "fact_check"),
            ModelRole::TrustChain => write!(f, "trust_chain"),
            ModelRole::Reasoning => write!(f, "reasoning"),
        }
    }
}

impl FromStr for ModelRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fact_check" => Ok(ModelRole::FactCheck),
            "trust_chain" => Ok(ModelRole::TrustChain),
            "reasoning" => Ok(ModelRole::Reasoning),
            other => Err(CoreError::parse(format!("unknown model role: {}", other))),
        }
    }
}

/// One (provider, model, role, weight) tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelAssignment {
    /// Provider identifier (e.g. "openai", "perplexity")
    pub provider: String,
    /// Model name passed through to the gateway
    pub model: String,
    /// Role this call plays in the verification
    pub role: ModelRole,
    /// Aggregation weight in [0, 1]
    pub weight: f64,
}

impl ModelAssignment {
    pub fn new(
        provider: impl Into<String>,
        model: impl Into<String>,
        role: ModelRole,
        weight: f64,
    ) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            role,
            weight,
        }
    }

    /// Check the weight and non-empty identifiers.
    pub fn validate(&self) -> CoreResult<()> {
        if !(0.0..=1.0).contains(&self.weight) {
            return Err(CoreError::validation(format!(
                "weight {} for role {} must be within [0, 1]",
                self.weight, self.role
            )));
        }
        if self.provider.trim().is_empty() {
            return Err(CoreError::validation(format!("provider missing for role {}", self.role)));
        }
        if self.model.trim().is_empty() {
            return Err(CoreError::validation(format!("model missing for role {}", self.role)));
        }
        Ok(())
    }
}

/// Named, reusable assignment set owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomModelConfig {
    /// Stable identifier referenced by saved preferences
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Display name
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Strategy the user picked when saving this config
    #[serde(default)]
    pub provider_strategy: ProviderStrategy,
    /// Assignments executed in custom mode
    pub assignments: Vec<ModelAssignment>,
}

impl CustomModelConfig {
    /// Validate every assignment and require at least one.
    pub fn validate(&self) -> CoreResult<()> {
        if self.assignments.is_empty() {
            return Err(CoreError::validation(format!(
                "custom config '{}' has no assignments",
                self.id
            )));
        }
        self.assignments.iter().try_for_each(ModelAssignment::validate)
    }
}
