//! Verification Request
//!
//! Inbound shape of `execute`.

use serde::{Deserialize, Serialize};

use cyrano_verify_core::{ModelAssignment, ProviderStrategy, VerificationLevel, VerificationMode};

use crate::utils::error::{VerificationError, VerificationResult};

/// User id applied when a request carries none.
pub const DEFAULT_USER_ID: &str = "default";

fn default_user_id() -> String {
    DEFAULT_USER_ID.to_string()
}

/// A claim or document to verify, plus how to verify it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    /// Claim or document text
    #[serde(alias = "document")]
    pub claim: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
    /// Explicit mode; falls back to stored preference, then default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<VerificationMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_strategy: Option<ProviderStrategy>,
    /// Explicit assignments for custom mode
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_models: Vec<ModelAssignment>,
    #[serde(default = "default_user_id")]
    pub user_id: String,
    /// Tool the preference is scoped to; engine default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    /// Pin a specific provider instead of letting the selector choose
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default)]
    pub verification_level: VerificationLevel,
    /// Store the resolved mode/strategy after a successful run
    #[serde(default)]
    pub save_preference: bool,
}

impl VerificationRequest {
    pub fn new(claim: impl Into<String>) -> Self {
        Self {
            claim: claim.into(),
            context: None,
            sources: Vec::new(),
            mode: None,
            provider_strategy: None,
            custom_models: Vec::new(),
            user_id: default_user_id(),
            tool_name: None,
            provider: None,
            verification_level: VerificationLevel::default(),
            save_preference: false,
        }
    }

    pub fn with_mode(mut self, mode: VerificationMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_strategy(mut self, strategy: ProviderStrategy) -> Self {
        self.provider_strategy = Some(strategy);
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn with_tool(mut self, tool_name: impl Into<String>) -> Self {
        self.tool_name = Some(tool_name.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_sources(mut self, sources: Vec<String>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_custom_models(mut self, assignments: Vec<ModelAssignment>) -> Self {
        self.custom_models = assignments;
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn with_level(mut self, level: VerificationLevel) -> Self {
        self.verification_level = level;
        self
    }

    pub fn saving_preference(mut self) -> Self {
        self.save_preference = true;
        self
    }

    /// Reject requests that cannot be verified at all.
    pub fn validate(&self) -> VerificationResult<()> {
        if self.claim.trim().is_empty() {
            return Err(VerificationError::invalid_request(
                "claim text must not be empty",
            ));
        }
        if self.user_id.trim().is_empty() {
            return Err(VerificationError::invalid_request("userId must not be empty"));
        }
        if let Some(tool) = &self.tool_name {
            if tool.trim().is_empty() {
                return Err(VerificationError::invalid_request("toolName must not be empty"));
            }
        }
        Ok(())
    }
}
