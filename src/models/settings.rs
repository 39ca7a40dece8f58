//! Engine Settings
//!
//! Tunables stored in ~/.cyrano/verification.json.

use serde::{Deserialize, Serialize};

use cyrano_verify_core::ModelRole;

/// Per-role completion budgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleTokenLimits {
    #[serde(default = "default_fact_check_tokens")]
    pub fact_check: u32,
    #[serde(default = "default_trust_chain_tokens")]
    pub trust_chain: u32,
    #[serde(default = "default_reasoning_tokens")]
    pub reasoning: u32,
}

fn default_fact_check_tokens() -> u32 {
    4000
}

fn default_trust_chain_tokens() -> u32 {
    2500
}

fn default_reasoning_tokens() -> u32 {
    4000
}

impl Default for RoleTokenLimits {
    fn default() -> Self {
        Self {
            fact_check: default_fact_check_tokens(),
            trust_chain: default_trust_chain_tokens(),
            reasoning: default_reasoning_tokens(),
        }
    }
}

impl RoleTokenLimits {
    pub fn for_role(&self, role: ModelRole) -> u32 {
        match role {
            ModelRole::FactCheck => self.fact_check,
            ModelRole::TrustChain => self.trust_chain,
            ModelRole::Reasoning => self.reasoning,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Upper bound for a single model call
    #[serde(default = "default_call_timeout_ms")]
    pub call_timeout_ms: u64,
    /// Upper bound for a whole request, shared by all calls
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Maximum model calls in flight per request
    #[serde(default = "default_max_concurrent_calls")]
    pub max_concurrent_calls: usize,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default)]
    pub max_tokens: RoleTokenLimits,
    /// Tool name used when a request does not carry one
    #[serde(default = "default_tool_name")]
    pub default_tool_name: String,
}

fn default_call_timeout_ms() -> u64 {
    30_000
}

fn default_request_timeout_ms() -> u64 {
    90_000
}

fn default_max_concurrent_calls() -> usize {
    3
}

fn default_temperature() -> f32 {
    0.3
}

pub(crate) fn default_tool_name() -> String {
    "fact_checker".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            call_timeout_ms: default_call_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            max_concurrent_calls: default_max_concurrent_calls(),
            temperature: default_temperature(),
            max_tokens: RoleTokenLimits::default(),
            default_tool_name: default_tool_name(),
        }
    }
}

/// Partial update for `EngineConfig`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfigUpdate {
    pub call_timeout_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
    pub max_concurrent_calls: Option<usize>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<RoleTokenLimits>,
    pub default_tool_name: Option<String>,
}

impl EngineConfig {
    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: EngineConfigUpdate) {
        if let Some(ms) = update.call_timeout_ms {
            self.call_timeout_ms = ms;
        }
        if let Some(ms) = update.request_timeout_ms {
            self.request_timeout_ms = ms;
        }
        if let Some(n) = update.max_concurrent_calls {
            self.max_concurrent_calls = n;
        }
        if let Some(t) = update.temperature {
            self.temperature = t;
        }
        if let Some(limits) = update.max_tokens {
            self.max_tokens = limits;
        }
        if let Some(name) = update.default_tool_name {
            self.default_tool_name = name;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.call_timeout_ms == 0 {
            return Err("callTimeoutMs must be greater than 0".to_string());
        }
        if self.request_timeout_ms == 0 {
            return Err("requestTimeoutMs must be greater than 0".to_string());
        }
        if self.max_concurrent_calls == 0 || self.max_concurrent_calls > 16 {
            return Err(format!(
                "maxConcurrentCalls must be between 1 and 16, got {}",
                self.max_concurrent_calls
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "temperature must be between 0 and 2, got {}",
                self.temperature
            ));
        }
        for role in ModelRole::all() {
            if self.max_tokens.for_role(role) == 0 {
                return Err(format!("maxTokens for {} must be greater than 0", role));
            }
        }
        if self.default_tool_name.trim().is_empty() {
            return Err("defaultToolName cannot be empty".to_string());
        }
        Ok(())
    }
}
