//! Verification Engine
//!
//! The `execute` entry point: resolve mode, select providers, fan out model
//! calls, aggregate, merge with the heuristic pass, and optionally persist the
//! resolved preference.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, error, info};

use cyrano_verify_core::{CustomModelConfig, ModelAssignment, ProviderStrategy, VerificationMode};
use cyrano_verify_llm::{ProviderAvailability, ProviderGateway};

use super::aggregator::combine;
use super::executor::ModelExecutor;
use super::fallback::{FallbackController, HeuristicAnalyzer};
use super::phase::{PhaseTracker, RequestPhase};
use super::resolver::{ModeResolver, ResolvedMode};
use super::selector::{ProviderSelector, TaskProfile};
use crate::models::preferences::{EffectivePreference, UserDefaults};
use crate::models::request::VerificationRequest;
use crate::models::settings::EngineConfig;
use crate::models::verdict::{CombinedVerdict, VerdictMetadata};
use crate::storage::preferences::PreferenceRepository;
use crate::utils::error::{VerificationError, VerificationResult};

/// Orchestrates one verification per `execute` call. Cheap to share: every
/// collaborator is behind an `Arc`.
#[derive(Clone)]
pub struct VerificationEngine {
    gateway: Arc<dyn ProviderGateway>,
    analyzer: Arc<dyn HeuristicAnalyzer>,
    store: Arc<dyn PreferenceRepository>,
    availability: ProviderAvailability,
    config: EngineConfig,
    task_profile: Option<TaskProfile>,
}

impl VerificationEngine {
    /// Engine with default config and an availability snapshot taken from
    /// the process environment.
    pub fn new(
        gateway: Arc<dyn ProviderGateway>,
        analyzer: Arc<dyn HeuristicAnalyzer>,
        store: Arc<dyn PreferenceRepository>,
    ) -> Self {
        Self {
            gateway,
            analyzer,
            store,
            availability: ProviderAvailability::from_env(),
            config: EngineConfig::default(),
            task_profile: None,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> VerificationResult<Self> {
        config.validate().map_err(VerificationError::config)?;
        self.config = config;
        Ok(self)
    }

    pub fn with_availability(mut self, availability: ProviderAvailability) -> Self {
        self.availability = availability;
        self
    }

    /// Profile used to resolve the provider under the `single` strategy.
    pub fn with_task_profile(mut self, profile: TaskProfile) -> Self {
        self.task_profile = Some(profile);
        self
    }

    pub fn availability(&self) -> &ProviderAvailability {
        &self.availability
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn tool_name<'r>(&'r self, request: &'r VerificationRequest) -> &'r str {
        request
            .tool_name
            .as_deref()
            .unwrap_or(self.config.default_tool_name.as_str())
    }

    /// Verify one claim or document.
    ///
    /// Configuration problems (bad request, unresolvable custom mode, missing
    /// providers) fail before any model call. Individual call failures are
    /// recorded on their results and never fail the request.
    pub async fn execute(&self, request: VerificationRequest) -> VerificationResult<CombinedVerdict> {
        let started = Instant::now();
        let request_id = uuid::Uuid::new_v4().to_string();
        let mut phases = PhaseTracker::new(&request_id);

        request.validate()?;
        let tool_name = self.tool_name(&request).to_string();

        // RESOLVING_MODE
        let resolved = ModeResolver::new(self.store.as_ref()).resolve(
            request.mode,
            request.provider_strategy,
            &request.custom_models,
            &request.user_id,
            &tool_name,
        )?;
        info!(
            "[{}] Verifying for {}/{} in {} mode ({} strategy, from {})",
            request_id,
            request.user_id,
            tool_name,
            resolved.mode,
            resolved.provider_strategy,
            resolved.source
        );

        // SELECTING_PROVIDERS
        phases.advance(RequestPhase::SelectingProviders);
        let fallback = FallbackController::new(self.analyzer.as_ref());

        if self.availability.is_empty() && resolved.mode == VerificationMode::Simple {
            if let Some(provider) = request.provider.as_deref() {
                debug!("Ignoring pinned provider {}; no provider is configured", provider);
            }
            phases.advance(RequestPhase::FallbackMerge);
            let heuristic = fallback.analyze(&request);
            let merged = FallbackController::heuristic_only(&heuristic);
            let verdict = CombinedVerdict {
                combined_confidence: merged.confidence,
                status: merged.status,
                per_role_results: Vec::new(),
                heuristic,
                metadata: Self::metadata(&resolved, &[], started, merged.source),
            };
            self.persist(&request, &tool_name, &resolved, &[]);
            phases.advance(RequestPhase::Done);
            return Ok(verdict);
        }

        let mut selector = ProviderSelector::new(&self.availability);
        if let Some(profile) = self.task_profile {
            selector = selector.with_profile(profile);
        }
        let assignments = selector.select_assignments(
            resolved.mode,
            resolved.provider_strategy,
            request.provider.as_deref(),
            &resolved.custom_assignments,
        )?;

        // EXECUTING
        phases.advance(RequestPhase::Executing);
        let deadline = started + Duration::from_millis(self.config.request_timeout_ms);
        let results = ModelExecutor::new(self.gateway.as_ref(), &self.config)
            .execute_all(&request, &assignments, deadline)
            .await;

        // AGGREGATING
        phases.advance(RequestPhase::Aggregating);
        let aggregate = combine(&results);

        // FALLBACK_MERGE
        phases.advance(RequestPhase::FallbackMerge);
        let heuristic = fallback.analyze(&request);
        let merged = FallbackController::merge(resolved.mode, &aggregate, &heuristic);

        let verdict = CombinedVerdict {
            combined_confidence: merged.confidence,
            status: merged.status,
            metadata: Self::metadata(&resolved, &results, started, merged.source),
            per_role_results: results,
            heuristic,
        };

        self.persist(&request, &tool_name, &resolved, &assignments);
        phases.advance(RequestPhase::Done);

        info!(
            "[{}] Verdict {} ({:.2}) from {} model(s) in {}ms",
            request_id,
            verdict.status,
            verdict.combined_confidence,
            verdict.metadata.models_executed,
            verdict.metadata.elapsed_ms
        );
        Ok(verdict)
    }

    fn metadata(
        resolved: &ResolvedMode,
        results: &[cyrano_verify_core::ModelResult],
        started: Instant,
        confidence_source: crate::models::verdict::ConfidenceSource,
    ) -> VerdictMetadata {
        let mut providers_used: Vec<String> = Vec::new();
        for result in results.iter().filter(|r| r.is_success()) {
            if !providers_used.contains(&result.provider) {
                providers_used.push(result.provider.clone());
            }
        }
        let models_executed = results.iter().filter(|r| r.is_success()).count();

        VerdictMetadata {
            models_executed,
            models_failed: results.len() - models_executed,
            elapsed_ms: started.elapsed().as_millis() as u64,
            was_user_preference: resolved.was_user_preference(),
            mode: resolved.mode,
            provider_strategy: resolved.provider_strategy,
            preference_source: resolved.source,
            providers_used,
            total_cost: results.iter().map(|r| r.cost).sum(),
            confidence_source,
        }
    }

    /// Store the resolved mode/strategy when the request asked for it. A
    /// storage failure is logged; the verdict is still returned.
    fn persist(
        &self,
        request: &VerificationRequest,
        tool_name: &str,
        resolved: &ResolvedMode,
        assignments: &[ModelAssignment],
    ) {
        if !request.save_preference {
            return;
        }
        match self.store_resolved(&request.user_id, tool_name, resolved, assignments) {
            Ok(()) => info!(
                "Saved preference {}/{} for {}/{}",
                resolved.mode, resolved.provider_strategy, request.user_id, tool_name
            ),
            Err(e) => error!(
                "Failed to save preference for {}/{}: {}",
                request.user_id, tool_name, e
            ),
        }
    }

    /// A stored custom preference must point at a saved config. Assignments
    /// that came with the request are saved as a new config first.
    fn store_resolved(
        &self,
        user_id: &str,
        tool_name: &str,
        resolved: &ResolvedMode,
        assignments: &[ModelAssignment],
    ) -> VerificationResult<()> {
        let custom_config_id = match (resolved.mode, &resolved.custom_config_id) {
            (VerificationMode::Custom, Some(id)) => Some(id.clone()),
            (VerificationMode::Custom, None) => {
                let config = self.store.save_custom_config(CustomModelConfig {
                    id: String::new(),
                    user_id: user_id.to_string(),
                    name: format!("{} custom models", tool_name),
                    description: Some("Saved from a verification request".to_string()),
                    provider_strategy: resolved.provider_strategy,
                    assignments: assignments.to_vec(),
                })?;
                info!(
                    "Saved {} request assignment(s) as custom config {}",
                    config.assignments.len(),
                    config.id
                );
                Some(config.id)
            }
            _ => None,
        };
        self.store.save_preference(
            user_id,
            tool_name,
            resolved.mode,
            resolved.provider_strategy,
            custom_config_id,
        )
    }

    // ========================================================================
    // Preference operations
    // ========================================================================

    pub fn save_preference(
        &self,
        user_id: &str,
        tool_name: &str,
        mode: VerificationMode,
        provider_strategy: ProviderStrategy,
        custom_config_id: Option<String>,
    ) -> VerificationResult<()> {
        if mode == VerificationMode::Custom {
            let config_id = custom_config_id.as_deref().ok_or_else(|| {
                VerificationError::invalid_mode("custom mode preference requires a customConfigId")
            })?;
            if self.store.get_custom_config(user_id, config_id)?.is_none() {
                return Err(VerificationError::invalid_mode(format!(
                    "custom configuration '{}' not found",
                    config_id
                )));
            }
        }
        self.store
            .save_preference(user_id, tool_name, mode, provider_strategy, custom_config_id)
    }

    pub fn get_preference(&self, user_id: &str, tool_name: &str) -> VerificationResult<EffectivePreference> {
        self.store.get(user_id, tool_name)
    }

    pub fn save_custom_config(&self, config: CustomModelConfig) -> VerificationResult<CustomModelConfig> {
        self.store.save_custom_config(config)
    }

    pub fn get_custom_config(
        &self,
        user_id: &str,
        config_id: &str,
    ) -> VerificationResult<Option<CustomModelConfig>> {
        self.store.get_custom_config(user_id, config_id)
    }

    pub fn list_custom_configs(&self, user_id: &str) -> VerificationResult<Vec<CustomModelConfig>> {
        self.store.list_custom_configs(user_id)
    }

    pub fn delete_custom_config(&self, user_id: &str, config_id: &str) -> VerificationResult<bool> {
        self.store.delete_custom_config(user_id, config_id)
    }

    pub fn set_user_defaults(&self, defaults: UserDefaults) -> VerificationResult<()> {
        self.store.set_user_defaults(defaults)
    }

    pub fn clear_preferences(&self, user_id: &str) -> VerificationResult<()> {
        self.store.clear_user(user_id)
    }
}

impl std::fmt::Debug for VerificationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationEngine")
            .field("availability", &self.availability)
            .field("config", &self.config)
            .field("task_profile", &self.task_profile)
            .finish()
    }
}
