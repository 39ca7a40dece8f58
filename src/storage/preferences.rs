//! Preference Repository
//!
//! Key-value contract for per-(user, tool) preferences, user defaults and
//! named custom model configs, with an in-memory and a SQLite backend.

use std::collections::HashMap;
use std::sync::RwLock;

use cyrano_verify_core::{CustomModelConfig, ProviderStrategy, VerificationMode};

use super::database::Database;
use crate::models::preferences::{EffectivePreference, UserDefaults, UserPreference};
use crate::utils::error::{VerificationError, VerificationResult};

/// Fresh identifier for a custom config.
pub fn new_config_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Durable storage for verification preferences.
///
/// Writes are last-write-wins; a read returns a complete record or nothing.
pub trait PreferenceRepository: Send + Sync {
    /// Stored (user, tool) record, without falling back to defaults.
    fn find(&self, user_id: &str, tool_name: &str) -> VerificationResult<Option<UserPreference>>;

    /// Overwrite the (user, tool) record.
    fn save(&self, preference: UserPreference) -> VerificationResult<()>;

    fn get_user_defaults(&self, user_id: &str) -> VerificationResult<Option<UserDefaults>>;

    fn set_user_defaults(&self, defaults: UserDefaults) -> VerificationResult<()>;

    fn get_custom_config(
        &self,
        user_id: &str,
        config_id: &str,
    ) -> VerificationResult<Option<CustomModelConfig>>;

    /// Insert or replace a config. An empty id is replaced with a new one.
    fn save_custom_config(&self, config: CustomModelConfig)
        -> VerificationResult<CustomModelConfig>;

    fn list_custom_configs(&self, user_id: &str) -> VerificationResult<Vec<CustomModelConfig>>;

    fn delete_custom_config(&self, user_id: &str, config_id: &str) -> VerificationResult<bool>;

    /// Drop every preference, default and config the user owns.
    fn clear_user(&self, user_id: &str) -> VerificationResult<()>;

    /// Stored record, else the user's defaults, else `(standard, single)`.
    fn get(&self, user_id: &str, tool_name: &str) -> VerificationResult<EffectivePreference> {
        if let Some(pref) = self.find(user_id, tool_name)? {
            return Ok(pref.into());
        }
        if let Some(defaults) = self.get_user_defaults(user_id)? {
            return Ok(defaults.into());
        }
        Ok(EffectivePreference::system_default())
    }

    /// Convenience wrapper around `save`.
    fn save_preference(
        &self,
        user_id: &str,
        tool_name: &str,
        mode: VerificationMode,
        provider_strategy: ProviderStrategy,
        custom_config_id: Option<String>,
    ) -> VerificationResult<()> {
        let mut preference = UserPreference::new(user_id, tool_name, mode, provider_strategy);
        preference.custom_config_id = custom_config_id;
        self.save(preference)
    }
}

fn prepare_config(mut config: CustomModelConfig) -> VerificationResult<CustomModelConfig> {
    if config.id.trim().is_empty() {
        config.id = new_config_id();
    }
    config.validate()?;
    Ok(config)
}

// ============================================================================
// In-memory backend
// ============================================================================

#[derive(Debug, Default)]
struct MemoryState {
    preferences: HashMap<(String, String), UserPreference>,
    defaults: HashMap<String, UserDefaults>,
    configs: HashMap<String, CustomModelConfig>,
}

/// Process-local repository guarded by a single `RwLock`.
#[derive(Debug, Default)]
pub struct InMemoryPreferenceRepository {
    state: RwLock<MemoryState>,
}

impl InMemoryPreferenceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> VerificationResult<std::sync::RwLockReadGuard<'_, MemoryState>> {
        self.state
            .read()
            .map_err(|_| VerificationError::internal("preference store lock poisoned"))
    }

    fn write(&self) -> VerificationResult<std::sync::RwLockWriteGuard<'_, MemoryState>> {
        self.state
            .write()
            .map_err(|_| VerificationError::internal("preference store lock poisoned"))
    }
}

impl PreferenceRepository for InMemoryPreferenceRepository {
    fn find(&self, user_id: &str, tool_name: &str) -> VerificationResult<Option<UserPreference>> {
        let state = self.read()?;
        Ok(state
            .preferences
            .get(&(user_id.to_string(), tool_name.to_string()))
            .cloned())
    }

    fn save(&self, mut preference: UserPreference) -> VerificationResult<()> {
        preference.updated_at = Some(chrono::Utc::now().to_rfc3339());
        let key = (preference.user_id.clone(), preference.tool_name.clone());
        self.write()?.preferences.insert(key, preference);
        Ok(())
    }

    fn get_user_defaults(&self, user_id: &str) -> VerificationResult<Option<UserDefaults>> {
        Ok(self.read()?.defaults.get(user_id).cloned())
    }

    fn set_user_defaults(&self, defaults: UserDefaults) -> VerificationResult<()> {
        self.write()?
            .defaults
            .insert(defaults.user_id.clone(), defaults);
        Ok(())
    }

    fn get_custom_config(
        &self,
        user_id: &str,
        config_id: &str,
    ) -> VerificationResult<Option<CustomModelConfig>> {
        Ok(self
            .read()?
            .configs
            .get(config_id)
            .filter(|c| c.user_id == user_id)
            .cloned())
    }

    fn save_custom_config(
        &self,
        config: CustomModelConfig,
    ) -> VerificationResult<CustomModelConfig> {
        let config = prepare_config(config)?;
        let mut state = self.write()?;
        if let Some(existing) = state.configs.get(&config.id) {
            if existing.user_id != config.user_id {
                return Err(VerificationError::invalid_request(format!(
                    "custom config '{}' belongs to another user",
                    config.id
                )));
            }
        }
        state.configs.insert(config.id.clone(), config.clone());
        Ok(config)
    }

    fn list_custom_configs(&self, user_id: &str) -> VerificationResult<Vec<CustomModelConfig>> {
        let mut configs: Vec<CustomModelConfig> = self
            .read()?
            .configs
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        configs.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(configs)
    }

    fn delete_custom_config(&self, user_id: &str, config_id: &str) -> VerificationResult<bool> {
        let mut state = self.write()?;
        let owned = state
            .configs
            .get(config_id)
            .is_some_and(|c| c.user_id == user_id);
        if owned {
            state.configs.remove(config_id);
        }
        Ok(owned)
    }

    fn clear_user(&self, user_id: &str) -> VerificationResult<()> {
        let mut state = self.write()?;
        state.preferences.retain(|(user, _), _| user != user_id);
        state.defaults.remove(user_id);
        state.configs.retain(|_, c| c.user_id != user_id);
        Ok(())
    }
}

// ============================================================================
// SQLite backend
// ============================================================================

/// Repository backed by the pooled SQLite database.
#[derive(Debug, Clone)]
pub struct SqlitePreferenceRepository {
    db: Database,
}

impl SqlitePreferenceRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl PreferenceRepository for SqlitePreferenceRepository {
    fn find(&self, user_id: &str, tool_name: &str) -> VerificationResult<Option<UserPreference>> {
        self.db.get_preference(user_id, tool_name)
    }

    fn save(&self, mut preference: UserPreference) -> VerificationResult<()> {
        preference.updated_at = None;
        self.db.upsert_preference(&preference)
    }

    fn get_user_defaults(&self, user_id: &str) -> VerificationResult<Option<UserDefaults>> {
        self.db.get_user_defaults(user_id)
    }

    fn set_user_defaults(&self, defaults: UserDefaults) -> VerificationResult<()> {
        self.db.upsert_user_defaults(&defaults)
    }

    fn get_custom_config(
        &self,
        user_id: &str,
        config_id: &str,
    ) -> VerificationResult<Option<CustomModelConfig>> {
        self.db.get_custom_config(user_id, config_id)
    }

    fn save_custom_config(
        &self,
        config: CustomModelConfig,
    ) -> VerificationResult<CustomModelConfig> {
        let config = prepare_config(config)?;
        // A config id is global; the upsert refuses another user's row.
        if !self.db.upsert_custom_config(&config)? {
            return Err(VerificationError::invalid_request(format!(
                "custom config '{}' belongs to another user",
                config.id
            )));
        }
        Ok(config)
    }

    fn list_custom_configs(&self, user_id: &str) -> VerificationResult<Vec<CustomModelConfig>> {
        self.db.list_custom_configs(user_id)
    }

    fn delete_custom_config(&self, user_id: &str, config_id: &str) -> VerificationResult<bool> {
        self.db.delete_custom_config(user_id, config_id)
    }

    fn clear_user(&self, user_id: &str) -> VerificationResult<()> {
        self.db.clear_user(user_id)
    }
}
