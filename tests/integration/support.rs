//! Shared test doubles.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cyrano_verify::{
    CallOptions, GatewayError, GatewayResult, HeuristicAnalyzer, HeuristicReport,
    InMemoryPreferenceRepository, PreferenceRepository, ProviderAvailability, ProviderGateway,
    ProviderKind, VerificationEngine,
};

/// One scripted reply.
#[derive(Clone)]
pub enum Reply {
    Text(&'static str),
    Fail(GatewayError),
    /// Sleep, then reply with the text
    Slow(Duration, &'static str),
}

/// Gateway that answers by model name and records every call.
#[derive(Default)]
pub struct ScriptedGateway {
    replies: HashMap<String, Reply>,
    fallback: Option<Reply>,
    pub calls: Mutex<Vec<(ProviderKind, String)>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, model: &str, reply: Reply) -> Self {
        self.replies.insert(model.to_string(), reply);
        self
    }

    /// Reply for any model without its own script.
    pub fn otherwise(mut self, reply: Reply) -> Self {
        self.fallback = Some(reply);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ProviderGateway for ScriptedGateway {
    async fn call(
        &self,
        provider: ProviderKind,
        model: &str,
        _prompt: &str,
        _options: &CallOptions,
    ) -> GatewayResult<String> {
        self.calls
            .lock()
            .unwrap()
            .push((provider, model.to_string()));

        let reply = self
            .replies
            .get(model)
            .cloned()
            .or_else(|| self.fallback.clone())
            .unwrap_or(Reply::Fail(GatewayError::Other {
                message: format!("no script for {}", model),
            }));

        match reply {
            Reply::Text(text) => Ok(text.to_string()),
            Reply::Fail(err) => Err(err),
            Reply::Slow(delay, text) => {
                tokio::time::sleep(delay).await;
                Ok(text.to_string())
            }
        }
    }
}

/// Analyzer that always reports the same confidence.
pub struct FixedAnalyzer(pub f64);

impl HeuristicAnalyzer for FixedAnalyzer {
    fn analyze(&self, text: &str, _context: Option<&str>) -> HeuristicReport {
        HeuristicReport::from_confidence(self.0, vec![format!("{} chars analyzed", text.len())])
    }
}

pub fn engine_with(
    gateway: Arc<ScriptedGateway>,
    store: Arc<dyn PreferenceRepository>,
    providers: &[ProviderKind],
) -> VerificationEngine {
    VerificationEngine::new(gateway, Arc::new(FixedAnalyzer(0.65)), store)
        .with_availability(ProviderAvailability::with_providers(providers.iter().copied()))
}

pub fn engine(gateway: Arc<ScriptedGateway>, providers: &[ProviderKind]) -> VerificationEngine {
    engine_with(gateway, Arc::new(InMemoryPreferenceRepository::new()), providers)
}
