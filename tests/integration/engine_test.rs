//! Engine Integration Tests
//!
//! Drives `VerificationEngine::execute` end to end with a scripted gateway.
//! No network access; every provider reply is canned.

use std::sync::Arc;
use std::time::Duration;

use cyrano_verify::{
    AssignmentState, ConfidenceIndicator, ConfidenceSource, GatewayError,
    InMemoryPreferenceRepository, ModelAssignment, ModelRole, PreferenceRepository, ProviderKind,
    ProviderStrategy, ResolutionSource, VerificationError, VerificationMode, VerificationRequest,
    VerificationStatus,
};

use crate::support::{engine, engine_with, Reply, ScriptedGateway};

const CLAIM: &str = "The contract was signed in 2020.";

// ============================================================================
// End to end
// ============================================================================

#[tokio::test]
async fn test_standard_single_end_to_end() {
    let gateway = Arc::new(
        ScriptedGateway::new()
            .reply("gpt-4o", Reply::Text("VERIFIED. Confidence: 0.9"))
            .reply("gpt-4o-mini", Reply::Text("Sources look reliable. Confidence: 0.7")),
    );
    let engine = engine(gateway.clone(), &[ProviderKind::OpenAI]);

    let request = VerificationRequest::new(CLAIM)
        .with_mode(VerificationMode::Standard)
        .with_strategy(ProviderStrategy::Single);
    let verdict = engine.execute(request).await.unwrap();

    assert!((verdict.combined_confidence - 0.82).abs() < 1e-9);
    assert_eq!(verdict.status, VerificationStatus::Verified);
    assert_eq!(verdict.per_role_results.len(), 2);
    assert_eq!(verdict.per_role_results[0].role, ModelRole::FactCheck);
    assert_eq!(verdict.per_role_results[1].role, ModelRole::TrustChain);
    let fact_check = &verdict.per_role_results[0];
    assert_eq!(fact_check.verification_summary.as_deref(), Some("VERIFIED."));
    assert_eq!(
        fact_check.confidence_indicators,
        vec![ConfidenceIndicator::SupportingEvidence]
    );
    assert_eq!(verdict.metadata.models_executed, 2);
    assert_eq!(verdict.metadata.models_failed, 0);
    assert_eq!(verdict.metadata.providers_used, vec!["openai".to_string()]);
    assert_eq!(verdict.metadata.confidence_source, ConfidenceSource::Ai);
    assert!(verdict.metadata.total_cost > 0.0);
    assert_eq!(gateway.call_count(), 2);
}

#[tokio::test]
async fn test_verdict_serializes_camel_case() {
    let gateway = Arc::new(ScriptedGateway::new().otherwise(Reply::Text("Confidence: 0.5")));
    let engine = engine(gateway, &[ProviderKind::Anthropic]);

    let verdict = engine
        .execute(VerificationRequest::new(CLAIM).with_mode(VerificationMode::Simple))
        .await
        .unwrap();
    let json = serde_json::to_value(&verdict).unwrap();

    assert_eq!(json["status"], "UNCERTAIN");
    assert!(json["combinedConfidence"].is_number());
    assert_eq!(json["metadata"]["wasUserPreference"], false);
    assert_eq!(json["perRoleResults"][0]["provider"], "anthropic");
}

#[tokio::test]
async fn test_confidence_always_in_unit_range() {
    let gateway = Arc::new(
        ScriptedGateway::new()
            .reply("llama-3.1-sonar-large-128k-online", Reply::Text("Confidence: 150%"))
            .reply("claude-3-5-haiku-20241022", Reply::Text("Confidence level: 9.5"))
            .otherwise(Reply::Text("no number here")),
    );
    let engine = engine(gateway, &ProviderKind::all());

    for mode in [
        VerificationMode::Simple,
        VerificationMode::Standard,
        VerificationMode::Comprehensive,
    ] {
        for strategy in [ProviderStrategy::Single, ProviderStrategy::Mixed] {
            let request = VerificationRequest::new(CLAIM)
                .with_mode(mode)
                .with_strategy(strategy);
            let verdict = engine.execute(request).await.unwrap();
            assert!(
                (0.0..=1.0).contains(&verdict.combined_confidence),
                "{} / {} gave {}",
                mode,
                strategy,
                verdict.combined_confidence
            );
            for result in &verdict.per_role_results {
                assert!((0.0..=1.0).contains(&result.confidence));
            }
        }
    }
}

#[tokio::test]
async fn test_equal_confidence_gives_equal_status_on_every_path() {
    let gateway = Arc::new(ScriptedGateway::new().otherwise(Reply::Text("Confidence: 0.65")));
    let engine = engine(gateway, &[ProviderKind::OpenAI]);

    let simple = engine
        .execute(VerificationRequest::new(CLAIM).with_mode(VerificationMode::Simple))
        .await
        .unwrap();
    let standard = engine
        .execute(VerificationRequest::new(CLAIM).with_mode(VerificationMode::Standard))
        .await
        .unwrap();

    assert_eq!(simple.status, VerificationStatus::LikelyTrue);
    assert_eq!(simple.status, standard.status);
    // The fixed analyzer also reports 0.65
    assert_eq!(simple.heuristic.status, simple.status);
}

// ============================================================================
// Custom mode
// ============================================================================

#[tokio::test]
async fn test_custom_mode_without_assignments_is_invalid() {
    let gateway = Arc::new(ScriptedGateway::new().otherwise(Reply::Text("Confidence: 0.9")));
    let engine = engine(gateway.clone(), &[ProviderKind::OpenAI]);

    let err = engine
        .execute(VerificationRequest::new(CLAIM).with_mode(VerificationMode::Custom))
        .await
        .unwrap_err();

    assert!(matches!(err, VerificationError::InvalidMode(_)));
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn test_failed_assignment_weight_is_renormalized() {
    let gateway = Arc::new(
        ScriptedGateway::new()
            .reply(
                "gpt-4o",
                Reply::Fail(GatewayError::ServerError {
                    message: "overloaded".to_string(),
                    status: Some(503),
                }),
            )
            .reply("claude-3-5-haiku-20241022", Reply::Text("Confidence: 0.7")),
    );
    let engine = engine(gateway, &[ProviderKind::OpenAI, ProviderKind::Anthropic]);

    let request = VerificationRequest::new(CLAIM)
        .with_mode(VerificationMode::Custom)
        .with_custom_models(vec![
            ModelAssignment::new("openai", "gpt-4o", ModelRole::FactCheck, 0.6),
            ModelAssignment::new("claude", "claude-3-5-haiku-20241022", ModelRole::TrustChain, 0.4),
        ]);
    let verdict = engine.execute(request).await.unwrap();

    assert!((verdict.combined_confidence - 0.7).abs() < 1e-9);
    assert_eq!(verdict.status, VerificationStatus::LikelyTrue);
    assert_eq!(verdict.per_role_results[0].state, AssignmentState::Failed);
    assert!(verdict.per_role_results[0]
        .error
        .as_deref()
        .unwrap()
        .contains("overloaded"));
    assert_eq!(verdict.per_role_results[1].provider, "anthropic");
    assert_eq!(verdict.metadata.models_executed, 1);
    assert_eq!(verdict.metadata.models_failed, 1);
    assert_eq!(verdict.metadata.providers_used, vec!["anthropic".to_string()]);
}

#[tokio::test]
async fn test_custom_assignment_with_unconfigured_provider_rejected() {
    let gateway = Arc::new(ScriptedGateway::new().otherwise(Reply::Text("Confidence: 0.9")));
    let engine = engine(gateway.clone(), &[ProviderKind::OpenAI]);

    let request = VerificationRequest::new(CLAIM)
        .with_mode(VerificationMode::Custom)
        .with_custom_models(vec![ModelAssignment::new("xai", "grok-beta", ModelRole::Reasoning, 1.0)]);
    let err = engine.execute(request).await.unwrap_err();

    assert!(matches!(err, VerificationError::ProviderValidation { .. }));
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn test_saved_custom_config_drives_assignments() {
    let gateway = Arc::new(ScriptedGateway::new().otherwise(Reply::Text("Confidence: 0.85")));
    let engine = engine(gateway.clone(), &[ProviderKind::DeepSeek]);

    let config = engine
        .save_custom_config(cyrano_verify::CustomModelConfig {
            id: String::new(),
            user_id: "alice".to_string(),
            name: "cheap reasoning".to_string(),
            description: None,
            provider_strategy: ProviderStrategy::Mixed,
            assignments: vec![ModelAssignment::new(
                "deepseek",
                "deepseek-reasoner",
                ModelRole::Reasoning,
                1.0,
            )],
        })
        .unwrap();
    engine
        .save_preference(
            "alice",
            "fact_checker",
            VerificationMode::Custom,
            ProviderStrategy::Mixed,
            Some(config.id.clone()),
        )
        .unwrap();

    let verdict = engine
        .execute(VerificationRequest::new(CLAIM).with_user("alice"))
        .await
        .unwrap();

    assert_eq!(verdict.metadata.mode, VerificationMode::Custom);
    assert!(verdict.metadata.was_user_preference);
    assert_eq!(verdict.per_role_results.len(), 1);
    assert_eq!(verdict.per_role_results[0].model, "deepseek-reasoner");
    assert_eq!(verdict.status, VerificationStatus::Verified);
}

// ============================================================================
// Preferences
// ============================================================================

#[tokio::test]
async fn test_saved_preference_used_when_request_omits_mode() {
    let store = Arc::new(InMemoryPreferenceRepository::new());
    store
        .save_preference(
            "bob",
            "fact_checker",
            VerificationMode::Comprehensive,
            ProviderStrategy::Mixed,
            None,
        )
        .unwrap();
    let gateway = Arc::new(ScriptedGateway::new().otherwise(Reply::Text("Confidence: 0.8")));
    let engine = engine_with(gateway, store, &ProviderKind::all());

    let verdict = engine
        .execute(VerificationRequest::new(CLAIM).with_user("bob"))
        .await
        .unwrap();

    assert_eq!(verdict.metadata.mode, VerificationMode::Comprehensive);
    assert_eq!(verdict.metadata.provider_strategy, ProviderStrategy::Mixed);
    assert!(verdict.metadata.was_user_preference);
    assert_eq!(verdict.metadata.preference_source, ResolutionSource::StoredPreference);
    let providers: Vec<&str> = verdict
        .per_role_results
        .iter()
        .map(|r| r.provider.as_str())
        .collect();
    assert_eq!(providers, vec!["perplexity", "anthropic", "openai"]);
}

#[tokio::test]
async fn test_explicit_mode_overrides_saved_preference() {
    let store = Arc::new(InMemoryPreferenceRepository::new());
    store
        .save_preference(
            "bob",
            "fact_checker",
            VerificationMode::Comprehensive,
            ProviderStrategy::Mixed,
            None,
        )
        .unwrap();
    let gateway = Arc::new(ScriptedGateway::new().otherwise(Reply::Text("Confidence: 0.8")));
    let engine = engine_with(gateway, store.clone(), &ProviderKind::all());

    let verdict = engine
        .execute(
            VerificationRequest::new(CLAIM)
                .with_user("bob")
                .with_mode(VerificationMode::Simple),
        )
        .await
        .unwrap();

    assert_eq!(verdict.metadata.mode, VerificationMode::Simple);
    assert_eq!(verdict.per_role_results.len(), 1);
    assert!(!verdict.metadata.was_user_preference);
    assert_eq!(verdict.metadata.preference_source, ResolutionSource::Explicit);

    // Not saved, so the stored record is untouched
    let stored = store.find("bob", "fact_checker").unwrap().unwrap();
    assert_eq!(stored.mode, VerificationMode::Comprehensive);
}

#[tokio::test]
async fn test_save_preference_persists_resolved_values() {
    let store = Arc::new(InMemoryPreferenceRepository::new());
    let gateway = Arc::new(ScriptedGateway::new().otherwise(Reply::Text("Confidence: 0.8")));
    let engine = engine_with(gateway, store.clone(), &[ProviderKind::OpenAI]);

    engine
        .execute(
            VerificationRequest::new(CLAIM)
                .with_user("carol")
                .with_tool("document_verifier")
                .with_mode(VerificationMode::Comprehensive)
                .saving_preference(),
        )
        .await
        .unwrap();

    let stored = store.find("carol", "document_verifier").unwrap().unwrap();
    assert_eq!(stored.mode, VerificationMode::Comprehensive);
    assert_eq!(stored.provider_strategy, ProviderStrategy::Single);
    assert!(store.find("carol", "fact_checker").unwrap().is_none());

    let verdict = engine
        .execute(
            VerificationRequest::new(CLAIM)
                .with_user("carol")
                .with_tool("document_verifier"),
        )
        .await
        .unwrap();
    assert_eq!(verdict.metadata.mode, VerificationMode::Comprehensive);
    assert!(verdict.metadata.was_user_preference);
}

#[tokio::test]
async fn test_saving_request_custom_models_keeps_next_request_resolvable() {
    let store = Arc::new(InMemoryPreferenceRepository::new());
    let gateway = Arc::new(ScriptedGateway::new().otherwise(Reply::Text("Confidence: 0.9")));
    let engine = engine_with(gateway, store.clone(), &[ProviderKind::OpenAI]);

    engine
        .execute(
            VerificationRequest::new(CLAIM)
                .with_user("pat")
                .with_mode(VerificationMode::Custom)
                .with_custom_models(vec![ModelAssignment::new("openai", "gpt-4o", ModelRole::FactCheck, 1.0)])
                .saving_preference(),
        )
        .await
        .unwrap();

    let stored = store.find("pat", "fact_checker").unwrap().unwrap();
    assert_eq!(stored.mode, VerificationMode::Custom);
    let config_id = stored.custom_config_id.expect("custom preference points at a config");
    let config = store.get_custom_config("pat", &config_id).unwrap().unwrap();
    assert_eq!(config.assignments.len(), 1);
    assert_eq!(config.assignments[0].model, "gpt-4o");

    let verdict = engine
        .execute(VerificationRequest::new(CLAIM).with_user("pat"))
        .await
        .unwrap();
    assert_eq!(verdict.metadata.mode, VerificationMode::Custom);
    assert!(verdict.metadata.was_user_preference);
    assert_eq!(verdict.per_role_results.len(), 1);
    assert_eq!(verdict.per_role_results[0].model, "gpt-4o");
}

#[tokio::test]
async fn test_saving_loaded_custom_config_reuses_its_id() {
    let store = Arc::new(InMemoryPreferenceRepository::new());
    let gateway = Arc::new(ScriptedGateway::new().otherwise(Reply::Text("Confidence: 0.9")));
    let engine = engine_with(gateway, store.clone(), &[ProviderKind::OpenAI]);

    let config = engine
        .save_custom_config(cyrano_verify::CustomModelConfig {
            id: "quick".to_string(),
            user_id: "quinn".to_string(),
            name: "quick".to_string(),
            description: None,
            provider_strategy: ProviderStrategy::Single,
            assignments: vec![ModelAssignment::new("openai", "gpt-4o-mini", ModelRole::FactCheck, 1.0)],
        })
        .unwrap();
    engine
        .save_preference("quinn", "fact_checker", VerificationMode::Custom, ProviderStrategy::Single, Some(config.id))
        .unwrap();

    engine
        .execute(VerificationRequest::new(CLAIM).with_user("quinn").saving_preference())
        .await
        .unwrap();

    let stored = store.find("quinn", "fact_checker").unwrap().unwrap();
    assert_eq!(stored.custom_config_id.as_deref(), Some("quick"));
    assert_eq!(engine.list_custom_configs("quinn").unwrap().len(), 1);
}

// ============================================================================
// Fallback and failures
// ============================================================================

#[tokio::test]
async fn test_zero_providers_simple_uses_heuristic() {
    let gateway = Arc::new(ScriptedGateway::new());
    let engine = engine(gateway.clone(), &[]);

    let verdict = engine
        .execute(VerificationRequest::new(CLAIM).with_mode(VerificationMode::Simple))
        .await
        .unwrap();

    assert_eq!(verdict.status, VerificationStatus::LikelyTrue);
    assert_eq!(verdict.combined_confidence, 0.65);
    assert_eq!(verdict.metadata.confidence_source, ConfidenceSource::Heuristic);
    assert!(verdict.per_role_results.is_empty());
    assert!(verdict.metadata.providers_used.is_empty());
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn test_zero_providers_simple_ignores_pinned_provider() {
    let gateway = Arc::new(ScriptedGateway::new());
    let engine = engine(gateway.clone(), &[]);

    let verdict = engine
        .execute(
            VerificationRequest::new(CLAIM)
                .with_mode(VerificationMode::Simple)
                .with_provider("openai"),
        )
        .await
        .unwrap();

    assert_eq!(verdict.metadata.confidence_source, ConfidenceSource::Heuristic);
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn test_zero_providers_multi_model_fails() {
    let engine = engine(Arc::new(ScriptedGateway::new()), &[]);

    let err = engine
        .execute(VerificationRequest::new(CLAIM).with_mode(VerificationMode::Standard))
        .await
        .unwrap_err();

    assert!(matches!(err, VerificationError::NoProviderConfigured(_)));
}

#[tokio::test]
async fn test_simple_call_failure_falls_back_to_heuristic() {
    let gateway = Arc::new(ScriptedGateway::new().otherwise(Reply::Fail(GatewayError::RateLimited {
        message: "slow down".to_string(),
        retry_after: Some(30),
    })));
    let engine = engine(gateway, &[ProviderKind::OpenAI]);

    let verdict = engine
        .execute(VerificationRequest::new(CLAIM).with_mode(VerificationMode::Simple))
        .await
        .unwrap();

    assert_eq!(verdict.metadata.confidence_source, ConfidenceSource::Heuristic);
    assert_eq!(verdict.status, VerificationStatus::LikelyTrue);
    assert_eq!(verdict.per_role_results.len(), 1);
    assert_eq!(verdict.metadata.models_failed, 1);
}

#[tokio::test]
async fn test_multi_model_all_failed_is_unverified() {
    let gateway = Arc::new(ScriptedGateway::new().otherwise(Reply::Fail(GatewayError::NetworkError {
        message: "dns".to_string(),
    })));
    let engine = engine(gateway, &[ProviderKind::OpenAI]);

    let verdict = engine
        .execute(VerificationRequest::new(CLAIM).with_mode(VerificationMode::Comprehensive))
        .await
        .unwrap();

    assert_eq!(verdict.combined_confidence, 0.0);
    assert_eq!(verdict.status, VerificationStatus::Unverified);
    assert_eq!(verdict.metadata.confidence_source, ConfidenceSource::Ai);
    assert_eq!(verdict.heuristic.status, VerificationStatus::LikelyTrue);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_is_isolated() {
    let gateway = Arc::new(
        ScriptedGateway::new()
            .reply("gpt-4o", Reply::Slow(Duration::from_secs(120), "Confidence: 0.99"))
            .reply("gpt-4o-mini", Reply::Text("Confidence: 0.7")),
    );
    let engine = engine(gateway, &[ProviderKind::OpenAI]);

    let verdict = engine
        .execute(VerificationRequest::new(CLAIM).with_mode(VerificationMode::Standard))
        .await
        .unwrap();

    let fact_check = &verdict.per_role_results[0];
    assert_eq!(fact_check.state, AssignmentState::Failed);
    assert!(fact_check.error.as_deref().unwrap().contains("Timed out"));
    assert_eq!(verdict.per_role_results[1].state, AssignmentState::Succeeded);
    assert!((verdict.combined_confidence - 0.7).abs() < 1e-9);
    assert!(verdict.metadata.elapsed_ms < 90_000);
}

#[tokio::test]
async fn test_pinned_provider_not_configured() {
    let engine = engine(Arc::new(ScriptedGateway::new()), &[ProviderKind::OpenAI]);

    let err = engine
        .execute(VerificationRequest::new(CLAIM).with_provider("perplexity"))
        .await
        .unwrap_err();

    match err {
        VerificationError::ProviderValidation { provider, .. } => assert_eq!(provider, "perplexity"),
        other => panic!("unexpected error: {:?}", other),
    }
}
