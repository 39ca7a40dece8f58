//! Cyrano Verify LLM
//!
//! Provider-facing layer of the verification workspace:
//! - `ProviderKind` for the supported vendors (OpenAI, Anthropic, Perplexity,
//!   Google, xAI, DeepSeek)
//! - `ProviderGateway`, the async trait the engine calls models through
//! - `ProviderAvailability`, an API-key snapshot used for selection
//! - the static model catalog (default models, latency, pricing)
//!
//! No HTTP transport lives here; concrete gateways are supplied by the host.

pub mod availability;
pub mod catalog;
pub mod provider;
pub mod types;

// Re-export main types
pub use availability::ProviderAvailability;
pub use provider::ProviderGateway;
pub use types::*;
