//! Mode Resolver
//!
//! Decides the effective (mode, strategy) for a request. Each value is taken
//! from the request when present, else from the stored (user, tool)
//! preference, else from the user's defaults, else `(standard, single)`.

use cyrano_verify_core::{ModelAssignment, ProviderStrategy, VerificationMode};

use crate::models::preferences::{EffectivePreference, ResolutionSource};
use crate::storage::preferences::PreferenceRepository;
use crate::utils::error::{VerificationError, VerificationResult};

/// Outcome of resolution for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMode {
    pub mode: VerificationMode,
    pub provider_strategy: ProviderStrategy,
    /// Where the mode came from
    pub source: ResolutionSource,
    pub strategy_source: ResolutionSource,
    /// Assignments to run in custom mode; empty otherwise
    pub custom_assignments: Vec<ModelAssignment>,
    /// Saved config the custom assignments were loaded from
    pub custom_config_id: Option<String>,
}

impl ResolvedMode {
    pub fn was_user_preference(&self) -> bool {
        self.source.is_user_preference()
    }
}

pub struct ModeResolver<'a> {
    store: &'a dyn PreferenceRepository,
}

impl<'a> ModeResolver<'a> {
    pub fn new(store: &'a dyn PreferenceRepository) -> Self {
        Self { store }
    }

    /// Resolve mode and strategy for (`user_id`, `tool_name`).
    ///
    /// Fails with `InvalidMode` when the mode resolves to custom and neither
    /// `custom_models` nor a saved custom config supplies assignments.
    pub fn resolve(
        &self,
        request_mode: Option<VerificationMode>,
        request_strategy: Option<ProviderStrategy>,
        custom_models: &[ModelAssignment],
        user_id: &str,
        tool_name: &str,
    ) -> VerificationResult<ResolvedMode> {
        let needs_custom_lookup =
            request_mode == Some(VerificationMode::Custom) && custom_models.is_empty();
        let stored = if request_mode.is_none() || request_strategy.is_none() || needs_custom_lookup {
            self.store.get(user_id, tool_name)?
        } else {
            EffectivePreference::system_default()
        };

        let (mode, source) = match request_mode {
            Some(mode) => (mode, ResolutionSource::Explicit),
            None => (stored.mode, stored.source),
        };
        let (provider_strategy, strategy_source) = match request_strategy {
            Some(strategy) => (strategy, ResolutionSource::Explicit),
            None => (stored.provider_strategy, stored.source),
        };

        let mut resolved = ResolvedMode {
            mode,
            provider_strategy,
            source,
            strategy_source,
            custom_assignments: Vec::new(),
            custom_config_id: None,
        };

        if mode == VerificationMode::Custom {
            if !custom_models.is_empty() {
                resolved.custom_assignments = custom_models.to_vec();
            } else {
                let config_id = stored.custom_config_id.ok_or_else(|| {
                    VerificationError::invalid_mode(
                        "custom mode requires customModels or a saved custom configuration",
                    )
                })?;
                let config = self
                    .store
                    .get_custom_config(user_id, &config_id)?
                    .filter(|c| !c.assignments.is_empty())
                    .ok_or_else(|| {
                        VerificationError::invalid_mode(format!(
                            "saved custom configuration '{}' not found or empty",
                            config_id
                        ))
                    })?;
                resolved.custom_assignments = config.assignments;
                resolved.custom_config_id = Some(config.id);
            }
        }

        tracing::debug!(
            "Resolved mode {} ({}) strategy {} ({}) for {}/{}",
            resolved.mode,
            resolved.source,
            resolved.provider_strategy,
            resolved.strategy_source,
            user_id,
            tool_name
        );
        Ok(resolved)
    }
}
