//! Preference Models
//!
//! Stored per-(user, tool) verification settings and per-user defaults.

use serde::{Deserialize, Serialize};

use cyrano_verify_core::{ProviderStrategy, VerificationMode};

/// Where a resolved mode came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// Set on the request itself
    Explicit,
    /// Saved (user, tool) preference
    StoredPreference,
    /// The user's tool-independent defaults
    UserDefault,
    /// Built-in `(standard, single)`
    SystemDefault,
}

impl ResolutionSource {
    /// True when the value came from something the user saved.
    pub fn is_user_preference(&self) -> bool {
        matches!(
            self,
            ResolutionSource::StoredPreference | ResolutionSource::UserDefault
        )
    }
}

impl std::fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionSource::Explicit => write!(f, "explicit"),
            ResolutionSource::StoredPreference => write!(f, "stored_preference"),
            ResolutionSource::UserDefault => write!(f, "user_default"),
            ResolutionSource::SystemDefault => write!(f, "system_default"),
        }
    }
}

/// Saved verification settings for one (user, tool) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreference {
    pub user_id: String,
    pub tool_name: String,
    pub mode: VerificationMode,
    pub provider_strategy: ProviderStrategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_config_id: Option<String>,
    /// RFC 3339 timestamp of the last save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl UserPreference {
    pub fn new(
        user_id: impl Into<String>,
        tool_name: impl Into<String>,
        mode: VerificationMode,
        provider_strategy: ProviderStrategy,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            tool_name: tool_name.into(),
            mode,
            provider_strategy,
            custom_config_id: None,
            updated_at: None,
        }
    }

    pub fn with_custom_config(mut self, config_id: impl Into<String>) -> Self {
        self.custom_config_id = Some(config_id.into());
        self
    }
}

/// Tool-independent defaults for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDefaults {
    pub user_id: String,
    #[serde(default)]
    pub mode: VerificationMode,
    #[serde(default)]
    pub provider_strategy: ProviderStrategy,
}

/// What `get` returns: the stored record, or the defaults standing in for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectivePreference {
    pub mode: VerificationMode,
    pub provider_strategy: ProviderStrategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_config_id: Option<String>,
    pub source: ResolutionSource,
}

impl EffectivePreference {
    pub fn system_default() -> Self {
        Self {
            mode: VerificationMode::default(),
            provider_strategy: ProviderStrategy::default(),
            custom_config_id: None,
            source: ResolutionSource::SystemDefault,
        }
    }
}

impl From<UserPreference> for EffectivePreference {
    fn from(pref: UserPreference) -> Self {
        Self {
            mode: pref.mode,
            provider_strategy: pref.provider_strategy,
            custom_config_id: pref.custom_config_id,
            source: ResolutionSource::StoredPreference,
        }
    }
}

impl From<UserDefaults> for EffectivePreference {
    fn from(defaults: UserDefaults) -> Self {
        Self {
            mode: defaults.mode,
            provider_strategy: defaults.provider_strategy,
            custom_config_id: None,
            source: ResolutionSource::UserDefault,
        }
    }
}
