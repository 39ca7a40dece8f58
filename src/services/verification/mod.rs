//! Verification Orchestration
//!
//! Per-request pipeline behind [`VerificationEngine::execute`]:
//!
//! 1. `resolver` - explicit request values, stored preference, user defaults
//! 2. `selector` - preset roles and weights, provider scoring
//! 3. `executor` - bounded concurrent model calls with per-call timeouts
//! 4. `aggregator` - weighted confidence over succeeded results
//! 5. `fallback` - heuristic pass and the rules for substituting it
//!
//! `phase` tracks the request through these steps; `confidence`, `analysis`
//! and `prompts` are the text helpers the executor uses.

pub mod aggregator;
pub mod analysis;
pub mod confidence;
pub mod engine;
pub mod executor;
pub mod fallback;
pub mod phase;
pub mod prompts;
pub mod resolver;
pub mod selector;

pub use aggregator::{combine, Aggregate};
pub use analysis::{analyze_response, ResponseAnalysis};
pub use confidence::extract_confidence;
pub use engine::VerificationEngine;
pub use executor::ModelExecutor;
pub use fallback::{FallbackController, HeuristicAnalyzer, Merged};
pub use phase::{PhaseTracker, RequestPhase};
pub use resolver::{ModeResolver, ResolvedMode};
pub use selector::{Balance, Complexity, ProviderSelector, TaskProfile};
