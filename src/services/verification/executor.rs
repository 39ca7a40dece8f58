//! Model Executor
//!
//! Runs every assignment against the provider gateway as a bounded fan-out.
//! Each assignment ends in exactly one `ModelResult`; a failing call is
//! recorded on its own result and never cancels its siblings.

use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use cyrano_verify_core::{AssignmentState, ModelAssignment, ModelResult};
use cyrano_verify_llm::catalog::{estimate_cost, estimate_usage};
use cyrano_verify_llm::{GatewayError, ProviderGateway, ProviderKind};

use super::analysis::analyze_response;
use super::confidence::extract_confidence;
use super::prompts::{call_options, role_prompt};
use crate::models::request::VerificationRequest;
use crate::models::settings::EngineConfig;
use crate::utils::error::VerificationError;

/// Executes assignments for one request.
pub struct ModelExecutor<'a> {
    gateway: &'a dyn ProviderGateway,
    config: &'a EngineConfig,
}

impl<'a> ModelExecutor<'a> {
    pub fn new(gateway: &'a dyn ProviderGateway, config: &'a EngineConfig) -> Self {
        Self { gateway, config }
    }

    /// Run all assignments, at most `max_concurrent_calls` at a time, and
    /// return their results in assignment order once every call has ended.
    ///
    /// No call outlives `deadline`.
    pub async fn execute_all(
        &self,
        request: &VerificationRequest,
        assignments: &[ModelAssignment],
        deadline: Instant,
    ) -> Vec<ModelResult> {
        let semaphore = Semaphore::new(self.config.max_concurrent_calls.max(1));
        let futures = assignments
            .iter()
            .map(|assignment| self.execute_one(request, assignment, &semaphore, deadline));

        let results = futures_util::future::join_all(futures).await;

        let failed = results.iter().filter(|r| !r.is_success()).count();
        info!(
            "Executed {} assignments ({} succeeded, {} failed)",
            results.len(),
            results.len() - failed,
            failed
        );
        results
    }

    async fn execute_one(
        &self,
        request: &VerificationRequest,
        assignment: &ModelAssignment,
        semaphore: &Semaphore,
        deadline: Instant,
    ) -> ModelResult {
        let mut state = AssignmentState::Pending;
        let queued_at = Instant::now();

        let provider: ProviderKind = match assignment.provider.parse() {
            Ok(p) => p,
            Err(e) => return Self::fail(assignment, &mut state, e.to_string(), 0),
        };

        let _permit = match tokio::time::timeout_at(deadline, semaphore.acquire()).await {
            Ok(Ok(permit)) => permit,
            Ok(Err(_)) => {
                return Self::fail(assignment, &mut state, "executor shut down", 0);
            }
            Err(_) => {
                let waited = queued_at.elapsed().as_millis() as u64;
                let err = GatewayError::Timeout { after_ms: waited };
                return Self::fail(assignment, &mut state, err.to_string(), waited);
            }
        };

        let prompt = role_prompt(request, assignment.role);
        let options = call_options(self.config, assignment.role, request.verification_level);

        state = AssignmentState::Running;
        debug!(
            "Assignment {} {}/{} is {}",
            assignment.role, provider, assignment.model, state
        );

        let started = Instant::now();
        let call_deadline = std::cmp::min(
            started + Duration::from_millis(self.config.call_timeout_ms),
            deadline,
        );
        let outcome = tokio::time::timeout_at(
            call_deadline,
            self.gateway
                .call(provider, &assignment.model, &prompt, &options),
        )
        .await;
        let latency_ms = started.elapsed().as_millis() as u64;

        let response = match outcome {
            Ok(Ok(text)) if !text.trim().is_empty() => text,
            Ok(Ok(_)) => {
                let err = GatewayError::MalformedResponse {
                    message: "empty response".to_string(),
                };
                return Self::fail(assignment, &mut state, err.to_string(), latency_ms);
            }
            Ok(Err(err)) => return Self::fail(assignment, &mut state, err.to_string(), latency_ms),
            Err(_) => {
                let err = GatewayError::Timeout {
                    after_ms: latency_ms,
                };
                return Self::fail(assignment, &mut state, err.to_string(), latency_ms);
            }
        };

        let confidence = extract_confidence(&response);
        let analysis = analyze_response(&response);
        let usage = estimate_usage(&prompt, options.system_prompt.as_deref(), &response);
        let cost = estimate_cost(provider, &usage);

        state = AssignmentState::Succeeded;
        debug!(
            "Assignment {} {}/{} {} in {}ms with confidence {:.2}",
            assignment.role, provider, assignment.model, state, latency_ms, confidence
        );
        ModelResult::succeeded(assignment, response, confidence, latency_ms)
            .with_usage(usage, cost)
            .with_analysis(analysis.summary, analysis.indicators, analysis.sources)
    }

    fn fail(
        assignment: &ModelAssignment,
        state: &mut AssignmentState,
        message: impl Into<String>,
        latency_ms: u64,
    ) -> ModelResult {
        let err = VerificationError::assignment(message);
        warn!(
            "Assignment {} {}/{} failed after {}ms (was {}): {}",
            assignment.role, assignment.provider, assignment.model, latency_ms, state, err
        );
        *state = AssignmentState::Failed;
        ModelResult::failed(assignment, err.to_string(), latency_ms)
    }
}
