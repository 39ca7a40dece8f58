//! Provider/Model Selector
//!
//! Turns (mode, strategy, task profile) into an ordered list of model
//! assignments. Provider choice is a pure function of the task profile and
//! the availability snapshot: providers are scored, then picked by the
//! profile's quality/speed balance, with ties going to the earlier provider
//! in declaration order.

use serde::{Deserialize, Serialize};

use cyrano_verify_core::{ModelAssignment, ModelRole, ProviderStrategy, VerificationMode};
use cyrano_verify_llm::catalog::{default_latency_ms, default_model};
use cyrano_verify_llm::{ProviderAvailability, ProviderKind};

use crate::utils::error::{VerificationError, VerificationResult};

/// Every available provider starts from this score.
pub const BASE_SCORE: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Balance {
    /// Highest score
    Quality,
    /// Lowest estimated latency
    Speed,
    /// Highest score per second of latency
    #[default]
    Balanced,
}

impl std::fmt::Display for Balance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Balance::Quality => write!(f, "quality"),
            Balance::Speed => write!(f, "speed"),
            Balance::Balanced => write!(f, "balanced"),
        }
    }
}

/// What a task needs from a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskProfile {
    #[serde(default)]
    pub requires_real_time_data: bool,
    #[serde(default)]
    pub requires_safety: bool,
    #[serde(default)]
    pub requires_long_context: bool,
    #[serde(default)]
    pub requires_code_generation: bool,
    #[serde(default)]
    pub complexity: Complexity,
    #[serde(default, rename = "balanceQualitySpeed")]
    pub balance: Balance,
}

impl TaskProfile {
    /// Built-in profile used for `role` when no provider is pinned.
    pub fn for_role(role: ModelRole) -> Self {
        match role {
            ModelRole::FactCheck => Self {
                requires_real_time_data: true,
                balance: Balance::Quality,
                ..Default::default()
            },
            ModelRole::TrustChain => Self {
                requires_safety: true,
                balance: Balance::Quality,
                ..Default::default()
            },
            ModelRole::Reasoning => Self {
                complexity: Complexity::High,
                balance: Balance::Quality,
                ..Default::default()
            },
        }
    }

    /// `balanced` leans to quality for high complexity and to speed for low.
    pub fn effective_balance(&self) -> Balance {
        match (self.balance, self.complexity) {
            (Balance::Balanced, Complexity::High) => Balance::Quality,
            (Balance::Balanced, Complexity::Low) => Balance::Speed,
            (balance, _) => balance,
        }
    }
}

/// Requirement-weighted score for `provider`.
pub fn score_provider(provider: ProviderKind, profile: &TaskProfile) -> u32 {
    let mut score = BASE_SCORE;
    if profile.requires_real_time_data && provider == ProviderKind::Perplexity {
        score += 20;
    }
    if profile.requires_safety && provider == ProviderKind::Anthropic {
        score += 15;
    }
    if profile.requires_code_generation && provider == ProviderKind::OpenAI {
        score += 10;
    }
    if profile.requires_long_context && provider == ProviderKind::Google {
        score += 10;
    }
    score
}

/// Every configured provider with its metric for `profile`, best first.
///
/// Larger metric is better for every balance. Equal metrics keep provider
/// declaration order, so the ranking is a pure function of its inputs.
pub fn rank_providers(
    profile: &TaskProfile,
    availability: &ProviderAvailability,
) -> Vec<(ProviderKind, f64)> {
    let balance = profile.effective_balance();

    let metric = |provider: ProviderKind| -> f64 {
        let score = score_provider(provider, profile) as f64;
        let latency_ms = default_latency_ms(provider) as f64;
        match balance {
            Balance::Quality => score,
            // Negated so that "larger is better" holds for every balance
            Balance::Speed => -latency_ms,
            Balance::Balanced => score / (latency_ms / 1000.0),
        }
    };

    let mut ranked: Vec<(ProviderKind, f64)> = availability
        .available()
        .into_iter()
        .map(|provider| (provider, metric(provider)))
        .collect();
    // Stable sort keeps declaration order among ties
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

/// Pick one provider for `profile` out of `availability`.
///
/// Returns `None` only when nothing is configured.
pub fn select_provider(
    profile: &TaskProfile,
    availability: &ProviderAvailability,
) -> Option<ProviderKind> {
    rank_providers(profile, availability)
        .first()
        .map(|(provider, _)| *provider)
}

/// Preset (role, weight) list for a mode; `None` for custom.
pub fn preset_roles(mode: VerificationMode) -> Option<Vec<(ModelRole, f64)>> {
    match mode {
        VerificationMode::Simple => Some(vec![(ModelRole::FactCheck, 1.0)]),
        VerificationMode::Standard => Some(vec![
            (ModelRole::FactCheck, 0.6),
            (ModelRole::TrustChain, 0.4),
        ]),
        VerificationMode::Comprehensive => Some(vec![
            (ModelRole::FactCheck, 0.5),
            (ModelRole::TrustChain, 0.25),
            (ModelRole::Reasoning, 0.25),
        ]),
        VerificationMode::Custom => None,
    }
}

/// Selector bound to one availability snapshot.
pub struct ProviderSelector<'a> {
    availability: &'a ProviderAvailability,
    /// Replaces the fact-check profile when resolving a `single` provider
    profile: Option<TaskProfile>,
}

impl<'a> ProviderSelector<'a> {
    pub fn new(availability: &'a ProviderAvailability) -> Self {
        Self {
            availability,
            profile: None,
        }
    }

    pub fn with_profile(mut self, profile: TaskProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Parse and check a caller-named provider.
    pub fn validate_provider(&self, name: &str) -> VerificationResult<ProviderKind> {
        let provider: ProviderKind = name
            .parse()
            .map_err(|e: cyrano_verify_core::CoreError| {
                VerificationError::provider_validation(name, e.to_string())
            })?;
        self.availability
            .validate(provider)
            .map_err(|reason| VerificationError::provider_validation(provider.to_string(), reason))?;
        Ok(provider)
    }

    /// Build the assignment list for a resolved mode.
    ///
    /// `custom` is only read in custom mode and must already be non-empty.
    pub fn select_assignments(
        &self,
        mode: VerificationMode,
        strategy: ProviderStrategy,
        pinned: Option<&str>,
        custom: &[ModelAssignment],
    ) -> VerificationResult<Vec<ModelAssignment>> {
        if self.availability.is_empty() {
            return Err(VerificationError::no_provider(
                "no AI provider has a valid API key",
            ));
        }

        let roles = match preset_roles(mode) {
            Some(roles) => roles,
            None => {
                if let Some(name) = pinned {
                    tracing::debug!(
                        "Ignoring pinned provider {} in custom mode; assignments name their own",
                        name
                    );
                }
                return self.validate_custom(custom);
            }
        };

        let pinned = pinned.map(|name| self.validate_provider(name)).transpose()?;

        let assignments = match strategy {
            ProviderStrategy::Single => {
                let provider = match pinned {
                    Some(p) => p,
                    None => {
                        let profile = self
                            .profile
                            .unwrap_or_else(|| TaskProfile::for_role(ModelRole::FactCheck));
                        self.pick(&profile)?
                    }
                };
                tracing::info!("Selected provider {} for all roles", provider);
                roles
                    .into_iter()
                    .map(|(role, weight)| {
                        ModelAssignment::new(provider.as_str(), default_model(provider, role), role, weight)
                    })
                    .collect::<Vec<_>>()
            }
            ProviderStrategy::Mixed => {
                let mut assignments = Vec::with_capacity(roles.len());
                for (role, weight) in roles {
                    let provider = match (role, pinned) {
                        (ModelRole::FactCheck, Some(p)) => p,
                        _ => self.pick(&TaskProfile::for_role(role))?,
                    };
                    tracing::info!("Selected provider {} for role {}", provider, role);
                    assignments.push(ModelAssignment::new(
                        provider.as_str(),
                        default_model(provider, role),
                        role,
                        weight,
                    ));
                }
                assignments
            }
        };

        Ok(assignments)
    }

    fn pick(&self, profile: &TaskProfile) -> VerificationResult<ProviderKind> {
        select_provider(profile, self.availability)
            .ok_or_else(|| VerificationError::no_provider("no AI provider has a valid API key"))
    }

    fn validate_custom(&self, custom: &[ModelAssignment]) -> VerificationResult<Vec<ModelAssignment>> {
        if custom.is_empty() {
            return Err(VerificationError::invalid_mode(
                "custom mode requires at least one model assignment",
            ));
        }
        custom
            .iter()
            .map(|assignment| -> VerificationResult<ModelAssignment> {
                let provider = self.validate_provider(&assignment.provider)?;
                assignment.validate()?;
                // Normalize aliases such as "claude" to the canonical id
                Ok(ModelAssignment {
                    provider: provider.as_str().to_string(),
                    ..assignment.clone()
                })
            })
            .collect()
    }
}
