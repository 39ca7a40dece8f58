//! Provider Gateway Trait
//!
//! Defines the boundary to the network transport that actually talks to AI
//! vendors. The verification engine only ever sees this trait; concrete
//! transports live outside this workspace.

use async_trait::async_trait;

use super::types::{CallOptions, GatewayResult, ProviderKind};

/// Trait that every provider transport must implement.
///
/// Implementations are expected to be cheap to share across concurrent calls
/// (`Send + Sync`), and to map their own failures onto
/// [`GatewayError`](crate::types::GatewayError).
#[async_trait]
pub trait ProviderGateway: Send + Sync {
    /// Run one completion and return the model's raw text.
    ///
    /// # Arguments
    /// * `provider` - Vendor to call
    /// * `model` - Model name understood by that vendor
    /// * `prompt` - User prompt
    /// * `options` - System prompt, temperature and token budget
    async fn call(
        &self,
        provider: ProviderKind,
        model: &str,
        prompt: &str,
        options: &CallOptions,
    ) -> GatewayResult<String>;
}
