//! Provider Types
//!
//! Core types for provider gateway interactions.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use cyrano_verify_core::CoreError;

/// Supported AI providers.
///
/// Declaration order is the deterministic tie-break order used by the
/// provider selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAI,
    Anthropic,
    Perplexity,
    Google,
    Xai,
    DeepSeek,
}

impl ProviderKind {
    /// Return all providers in tie-break order.
    pub fn all() -> Vec<ProviderKind> {
        vec![
            ProviderKind::OpenAI,
            ProviderKind::Anthropic,
            ProviderKind::Perplexity,
            ProviderKind::Google,
            ProviderKind::Xai,
            ProviderKind::DeepSeek,
        ]
    }

    /// Lowercase identifier used on the wire and in assignments.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Perplexity => "perplexity",
            ProviderKind::Google => "google",
            ProviderKind::Xai => "xai",
            ProviderKind::DeepSeek => "deepseek",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = CoreError;

    /// Accepts the canonical identifiers plus the common aliases users type
    /// (`claude`, `gemini`, `grok`, `gpt-4`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" | "gpt-4" | "gpt-4o" => Ok(ProviderKind::OpenAI),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "perplexity" => Ok(ProviderKind::Perplexity),
            "google" | "gemini" => Ok(ProviderKind::Google),
            "xai" | "grok" => Ok(ProviderKind::Xai),
            "deepseek" => Ok(ProviderKind::DeepSeek),
            other => Err(CoreError::parse(format!(
                "unknown AI provider: {}. Supported providers: openai, anthropic, perplexity, google, xai, deepseek",
                other
            ))),
        }
    }
}

/// Per-call options passed to the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    4000
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            system_prompt: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Error types for gateway calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GatewayError {
    /// Authentication failed (invalid API key)
    AuthenticationFailed { message: String },
    /// Rate limit exceeded
    RateLimited {
        message: String,
        retry_after: Option<u32>,
    },
    /// Call did not complete within its budget
    Timeout { after_ms: u64 },
    /// Network/connection error
    NetworkError { message: String },
    /// Server error from the provider
    ServerError {
        message: String,
        status: Option<u16>,
    },
    /// Response could not be interpreted
    MalformedResponse { message: String },
    /// Provider not configured or not reachable
    ProviderUnavailable { message: String },
    /// Other error
    Other { message: String },
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayError::AuthenticationFailed { message } => {
                write!(f, "Authentication failed: {}", message)
            }
            GatewayError::RateLimited { message, .. } => {
                write!(f, "Rate limited: {}", message)
            }
            GatewayError::Timeout { after_ms } => {
                write!(f, "Timed out after {}ms", after_ms)
            }
            GatewayError::NetworkError { message } => {
                write!(f, "Network error: {}", message)
            }
            GatewayError::ServerError { message, status } => {
                if let Some(s) = status {
                    write!(f, "Server error ({}): {}", s, message)
                } else {
                    write!(f, "Server error: {}", message)
                }
            }
            GatewayError::MalformedResponse { message } => {
                write!(f, "Malformed response: {}", message)
            }
            GatewayError::ProviderUnavailable { message } => {
                write!(f, "Provider unavailable: {}", message)
            }
            GatewayError::Other { message } => {
                write!(f, "Error: {}", message)
            }
        }
    }
}

impl std::error::Error for GatewayError {}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
