//! Engine Config Integration Tests

use std::sync::Arc;
use std::time::Duration;

use cyrano_verify::{
    AssignmentState, ConfigService, EngineConfigUpdate, ProviderKind, VerificationError,
    VerificationMode, VerificationRequest,
};

use crate::support::{engine, Reply, ScriptedGateway};

#[test]
fn test_config_file_created_with_defaults() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("verification.json");

    let service = ConfigService::open(&path).unwrap();
    assert!(path.exists());
    assert_eq!(service.get_config().call_timeout_ms, 30_000);
    assert_eq!(service.get_config().default_tool_name, "fact_checker");

    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["maxConcurrentCalls"], 3);
}

#[test]
fn test_partial_config_file_fills_defaults() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("verification.json");
    std::fs::write(&path, r#"{ "callTimeoutMs": 5000 }"#).unwrap();

    let service = ConfigService::open(&path).unwrap();
    assert_eq!(service.get_config().call_timeout_ms, 5_000);
    assert_eq!(service.get_config().request_timeout_ms, 90_000);
}

#[test]
fn test_invalid_update_rejected_and_not_applied() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("verification.json");
    let mut service = ConfigService::open(&path).unwrap();

    let err = service
        .update_config(EngineConfigUpdate {
            max_concurrent_calls: Some(0),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, VerificationError::Config(_)));
    assert_eq!(service.get_config().max_concurrent_calls, 3);
}

#[tokio::test(start_paused = true)]
async fn test_loaded_call_timeout_applies_to_engine() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("verification.json");
    let mut service = ConfigService::open(&path).unwrap();
    service
        .update_config(EngineConfigUpdate {
            call_timeout_ms: Some(2_000),
            ..Default::default()
        })
        .unwrap();

    let gateway = Arc::new(
        ScriptedGateway::new().otherwise(Reply::Slow(Duration::from_secs(5), "Confidence: 0.9")),
    );
    let engine = engine(gateway, &[ProviderKind::OpenAI])
        .with_config(service.get_config_clone())
        .unwrap();

    let verdict = engine
        .execute(VerificationRequest::new("Mount Everest is 8849m tall.").with_mode(VerificationMode::Standard))
        .await
        .unwrap();

    assert!(verdict
        .per_role_results
        .iter()
        .all(|r| r.state == AssignmentState::Failed));
    assert!(verdict.metadata.elapsed_ms < 5_000);
}
