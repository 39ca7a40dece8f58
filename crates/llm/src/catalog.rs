//! Model Catalog
//!
//! Static per-provider facts: default model per role, typical latency, and
//! list pricing used for cost estimates.

use cyrano_verify_core::{ModelRole, TokenUsage};

use super::types::ProviderKind;

/// Default model for `provider` when it plays `role`.
pub fn default_model(provider: ProviderKind, role: ModelRole) -> &'static str {
    match (provider, role) {
        (ProviderKind::OpenAI, ModelRole::TrustChain) => "gpt-4o-mini",
        (ProviderKind::OpenAI, _) => "gpt-4o",
        (ProviderKind::Anthropic, ModelRole::TrustChain) => "claude-3-5-haiku-20241022",
        (ProviderKind::Anthropic, _) => "claude-sonnet-4-20250514",
        (ProviderKind::Perplexity, ModelRole::TrustChain) => "llama-3.1-sonar-small-128k-online",
        (ProviderKind::Perplexity, _) => "llama-3.1-sonar-large-128k-online",
        (ProviderKind::Google, _) => "gemini-2.0-flash-exp",
        (ProviderKind::Xai, _) => "grok-beta",
        (ProviderKind::DeepSeek, ModelRole::Reasoning) => "deepseek-reasoner",
        (ProviderKind::DeepSeek, _) => "deepseek-chat",
    }
}

/// Typical round-trip latency in milliseconds.
pub fn default_latency_ms(provider: ProviderKind) -> u64 {
    match provider {
        ProviderKind::OpenAI => 1500,
        ProviderKind::Anthropic => 2000,
        ProviderKind::Perplexity => 2000,
        ProviderKind::Google => 1800,
        ProviderKind::Xai => 2500,
        ProviderKind::DeepSeek => 1500,
    }
}

/// (input, output) price in USD per one million tokens.
pub fn price_per_million(provider: ProviderKind) -> (f64, f64) {
    match provider {
        ProviderKind::OpenAI => (5.0, 15.0),
        ProviderKind::Anthropic => (15.0, 75.0),
        ProviderKind::Perplexity => (0.2, 1.0),
        ProviderKind::Google => (0.075, 0.3),
        ProviderKind::Xai => (2.0, 10.0),
        ProviderKind::DeepSeek => (0.14, 0.28),
    }
}

/// Rough token count: one token per four characters, rounded up.
pub fn estimate_tokens(text: &str) -> u32 {
    let chars = text.chars().count() as u32;
    chars.div_ceil(4)
}

/// Estimate token usage for a prompt/response pair.
pub fn estimate_usage(prompt: &str, system_prompt: Option<&str>, response: &str) -> TokenUsage {
    TokenUsage {
        input: estimate_tokens(prompt) + system_prompt.map(estimate_tokens).unwrap_or(0),
        output: estimate_tokens(response),
    }
}

/// Estimated cost in USD.
pub fn estimate_cost(provider: ProviderKind, usage: &TokenUsage) -> f64 {
    let (input_price, output_price) = price_per_million(provider);
    (usage.input as f64 * input_price + usage.output as f64 * output_price) / 1_000_000.0
}
