//! Provider Availability
//!
//! Snapshot of which providers have a usable API key. The snapshot is a plain
//! value: build it once (usually from the process environment), then hand it
//! to the selector. Nothing here performs network calls.

use std::collections::{BTreeMap, BTreeSet};

use super::types::ProviderKind;

/// Environment variables consulted for each provider, in lookup order.
pub fn env_vars(provider: ProviderKind) -> &'static [&'static str] {
    match provider {
        ProviderKind::OpenAI => &["OPENAI_API_KEY"],
        ProviderKind::Anthropic => &["ANTHROPIC_API_KEY"],
        ProviderKind::Perplexity => &["PERPLEXITY_API_KEY"],
        ProviderKind::Google => &["GEMINI_API_KEY", "GOOGLE_API_KEY"],
        ProviderKind::Xai => &["XAI_API_KEY"],
        ProviderKind::DeepSeek => &["DEEPSEEK_API_KEY"],
    }
}

/// Required key prefix, if the provider's keys have a recognizable shape.
pub fn key_prefix(provider: ProviderKind) -> Option<&'static str> {
    match provider {
        ProviderKind::OpenAI => Some("sk-"),
        ProviderKind::Anthropic => Some("sk-ant-"),
        ProviderKind::Perplexity => Some("pplx-"),
        ProviderKind::Xai => Some("xai-"),
        ProviderKind::DeepSeek => Some("sk-"),
        ProviderKind::Google => None,
    }
}

/// Check one key against the provider's format rules.
pub fn check_key(provider: ProviderKind, key: Option<&str>) -> Result<(), String> {
    let key = match key.map(str::trim).filter(|k| !k.is_empty()) {
        Some(k) => k,
        None => {
            return Err(format!(
                "{} environment variable is required for {} integration",
                env_vars(provider).join(" or "),
                provider
            ))
        }
    };
    match key_prefix(provider) {
        Some(prefix) if !key.starts_with(prefix) => Err(format!(
            "Invalid {} API key format (must start with {})",
            provider, prefix
        )),
        _ => Ok(()),
    }
}

/// Which providers may be used for a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderAvailability {
    configured: BTreeSet<ProviderKind>,
    /// Why each unconfigured provider was rejected
    rejected: BTreeMap<ProviderKind, String>,
}

impl ProviderAvailability {
    /// Snapshot with no providers configured.
    pub fn none() -> Self {
        Self::default()
    }

    /// Snapshot where exactly `providers` are configured.
    pub fn with_providers(providers: impl IntoIterator<Item = ProviderKind>) -> Self {
        let configured: BTreeSet<ProviderKind> = providers.into_iter().collect();
        let rejected = ProviderKind::all()
            .into_iter()
            .filter(|p| !configured.contains(p))
            .map(|p| (p, format!("{} is not configured", p)))
            .collect();
        Self {
            configured,
            rejected,
        }
    }

    /// Build the snapshot from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the snapshot from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut snapshot = Self::default();
        for provider in ProviderKind::all() {
            let key = env_vars(provider)
                .iter()
                .filter_map(|name| lookup(name))
                .find(|value| !value.trim().is_empty());
            match check_key(provider, key.as_deref()) {
                Ok(()) => {
                    snapshot.configured.insert(provider);
                }
                Err(reason) => {
                    tracing::debug!("Provider {} unavailable: {}", provider, reason);
                    snapshot.rejected.insert(provider, reason);
                }
            }
        }
        snapshot
    }

    pub fn is_configured(&self, provider: ProviderKind) -> bool {
        self.configured.contains(&provider)
    }

    /// Ok when configured, otherwise the rejection reason.
    pub fn validate(&self, provider: ProviderKind) -> Result<(), String> {
        if self.is_configured(provider) {
            return Ok(());
        }
        Err(self
            .rejected
            .get(&provider)
            .cloned()
            .unwrap_or_else(|| format!("{} is not configured", provider)))
    }

    /// Configured providers in declaration order.
    pub fn available(&self) -> Vec<ProviderKind> {
        self.configured.iter().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.configured.is_empty()
    }
}
