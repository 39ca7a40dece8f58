//! Cyrano Verify Core
//!
//! Domain types shared by every crate in the verification workspace: modes,
//! strategies, roles, assignments, per-model results, the status threshold
//! table, and the core error type. This crate has no dependency on provider
//! transport, storage, or async runtimes.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `mode` - `VerificationMode`, `ProviderStrategy`, `VerificationLevel`
//! - `assignment` - `ModelRole`, `ModelAssignment`, `CustomModelConfig`
//! - `result` - `ModelResult`, `AssignmentState`, `TokenUsage`, `ConfidenceIndicator`
//! - `status` - `VerificationStatus` and the shared threshold table

pub mod assignment;
pub mod error;
pub mod mode;
pub mod result;
pub mod status;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Modes ──────────────────────────────────────────────────────────────
pub use mode::{ProviderStrategy, VerificationLevel, VerificationMode};

// ── Assignments & Results ──────────────────────────────────────────────
pub use assignment::{CustomModelConfig, ModelAssignment, ModelRole};
pub use result::{AssignmentState, ConfidenceIndicator, ModelResult, TokenUsage};

// ── Status ─────────────────────────────────────────────────────────────
pub use status::{VerificationStatus, STATUS_THRESHOLDS};
