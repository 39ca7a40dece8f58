//! Cyrano Verify - Verification Orchestration Engine
//!
//! Verifies a claim or document by fanning it out to one or more AI models
//! under assigned roles and combining their confidences into one verdict.
//! It includes:
//! - Mode resolution against stored per-(user, tool) preferences
//! - Provider selection and the bounded model-call executor
//! - Weighted confidence aggregation with a heuristic fallback
//! - Storage layer (SQLite preference store, JSON engine config)
//! - Data models and utilities
//!
//! Model transport and heuristic text analysis are supplied by the host
//! through [`ProviderGateway`] and [`HeuristicAnalyzer`].

pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

pub use cyrano_verify_core::{
    AssignmentState, ConfidenceIndicator, CustomModelConfig, ModelAssignment, ModelResult, ModelRole,
    ProviderStrategy, TokenUsage, VerificationLevel, VerificationMode, VerificationStatus,
};
pub use cyrano_verify_llm::{
    CallOptions, GatewayError, GatewayResult, ProviderAvailability, ProviderGateway, ProviderKind,
};

pub use models::preferences::{EffectivePreference, ResolutionSource, UserDefaults, UserPreference};
pub use models::request::VerificationRequest;
pub use models::settings::{EngineConfig, EngineConfigUpdate};
pub use models::verdict::{CombinedVerdict, ConfidenceSource, HeuristicReport, VerdictMetadata};
pub use services::verification::{HeuristicAnalyzer, TaskProfile, VerificationEngine};
pub use storage::{ConfigService, Database, InMemoryPreferenceRepository, PreferenceRepository, SqlitePreferenceRepository};
pub use utils::error::{VerificationError, VerificationResult};
