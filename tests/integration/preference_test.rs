//! Preference Integration Tests
//!
//! The engine backed by the SQLite repository: preferences and custom
//! configs written through one engine are visible to the next one opened on
//! the same database file.

use std::sync::Arc;

use cyrano_verify::{
    CustomModelConfig, Database, ModelAssignment, ModelRole, PreferenceRepository, ProviderKind,
    ProviderStrategy, ResolutionSource, SqlitePreferenceRepository, UserDefaults,
    VerificationError, VerificationMode, VerificationRequest,
};

use crate::support::{engine_with, Reply, ScriptedGateway};

fn sqlite_store(path: &std::path::Path) -> Arc<SqlitePreferenceRepository> {
    Arc::new(SqlitePreferenceRepository::new(Database::open(path).unwrap()))
}

fn gateway() -> Arc<ScriptedGateway> {
    Arc::new(ScriptedGateway::new().otherwise(Reply::Text("Confidence: 0.75")))
}

// ============================================================================
// Durability
// ============================================================================

#[tokio::test]
async fn test_saved_preference_survives_reopen() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("data.db");

    {
        let engine = engine_with(gateway(), sqlite_store(&db_path), &ProviderKind::all());
        engine
            .execute(
                VerificationRequest::new("Water boils at 100C at sea level.")
                    .with_user("dana")
                    .with_mode(VerificationMode::Comprehensive)
                    .with_strategy(ProviderStrategy::Mixed)
                    .saving_preference(),
            )
            .await
            .unwrap();
    }

    let engine = engine_with(gateway(), sqlite_store(&db_path), &ProviderKind::all());
    let verdict = engine
        .execute(VerificationRequest::new("Water boils at 100C at sea level.").with_user("dana"))
        .await
        .unwrap();

    assert_eq!(verdict.metadata.mode, VerificationMode::Comprehensive);
    assert_eq!(verdict.metadata.provider_strategy, ProviderStrategy::Mixed);
    assert!(verdict.metadata.was_user_preference);
}

#[tokio::test]
async fn test_custom_config_round_trip_through_engine() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("data.db");
    let engine = engine_with(gateway(), sqlite_store(&db_path), &ProviderKind::all());

    let saved = engine
        .save_custom_config(CustomModelConfig {
            id: String::new(),
            user_id: "erin".to_string(),
            name: "two opinions".to_string(),
            description: Some("perplexity then claude".to_string()),
            provider_strategy: ProviderStrategy::Mixed,
            assignments: vec![
                ModelAssignment::new("perplexity", "llama-3.1-sonar-large-128k-online", ModelRole::FactCheck, 0.5),
                ModelAssignment::new("anthropic", "claude-sonnet-4-20250514", ModelRole::Reasoning, 0.5),
            ],
        })
        .unwrap();
    assert!(!saved.id.is_empty());

    let listed = engine.list_custom_configs("erin").unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].assignments.len(), 2);

    engine
        .save_preference(
            "erin",
            "fact_checker",
            VerificationMode::Custom,
            ProviderStrategy::Mixed,
            Some(saved.id.clone()),
        )
        .unwrap();

    let verdict = engine
        .execute(VerificationRequest::new("The bridge opened in 1937.").with_user("erin"))
        .await
        .unwrap();
    assert_eq!(verdict.metadata.mode, VerificationMode::Custom);
    let models: Vec<&str> = verdict.per_role_results.iter().map(|r| r.model.as_str()).collect();
    assert_eq!(models, vec!["llama-3.1-sonar-large-128k-online", "claude-sonnet-4-20250514"]);

    assert!(engine.delete_custom_config("erin", &saved.id).unwrap());
    let err = engine
        .execute(VerificationRequest::new("The bridge opened in 1937.").with_user("erin"))
        .await
        .unwrap_err();
    assert!(matches!(err, VerificationError::InvalidMode(_)));
}

// ============================================================================
// Defaults and isolation
// ============================================================================

#[tokio::test]
async fn test_user_defaults_apply_to_unsaved_tools() {
    let store = Arc::new(SqlitePreferenceRepository::new(Database::new_in_memory().unwrap()));
    let engine = engine_with(gateway(), store.clone(), &[ProviderKind::OpenAI]);

    engine
        .set_user_defaults(UserDefaults {
            user_id: "frank".to_string(),
            mode: VerificationMode::Simple,
            provider_strategy: ProviderStrategy::Single,
        })
        .unwrap();

    let effective = engine.get_preference("frank", "document_verifier").unwrap();
    assert_eq!(effective.mode, VerificationMode::Simple);
    assert_eq!(effective.source, ResolutionSource::UserDefault);

    let verdict = engine
        .execute(
            VerificationRequest::new("Paris is the capital of France.")
                .with_user("frank")
                .with_tool("document_verifier"),
        )
        .await
        .unwrap();
    assert_eq!(verdict.metadata.mode, VerificationMode::Simple);
    assert_eq!(verdict.metadata.preference_source, ResolutionSource::UserDefault);
    assert!(verdict.metadata.was_user_preference);

    let other = engine.get_preference("grace", "document_verifier").unwrap();
    assert_eq!(other.mode, VerificationMode::Standard);
    assert_eq!(other.source, ResolutionSource::SystemDefault);
}

#[tokio::test]
async fn test_clear_preferences_resets_to_system_default() {
    let store = Arc::new(SqlitePreferenceRepository::new(Database::new_in_memory().unwrap()));
    let engine = engine_with(gateway(), store.clone(), &[ProviderKind::OpenAI]);

    engine
        .save_preference("henry", "fact_checker", VerificationMode::Comprehensive, ProviderStrategy::Single, None)
        .unwrap();
    assert!(store.find("henry", "fact_checker").unwrap().is_some());

    engine.clear_preferences("henry").unwrap();

    let effective = engine.get_preference("henry", "fact_checker").unwrap();
    assert_eq!(effective.mode, VerificationMode::Standard);
    assert_eq!(effective.provider_strategy, ProviderStrategy::Single);
    assert_eq!(effective.source, ResolutionSource::SystemDefault);
}
