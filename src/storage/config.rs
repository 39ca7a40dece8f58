//! JSON Configuration Management
//!
//! Reads and writes ~/.cyrano/verification.json.

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::settings::{EngineConfig, EngineConfigUpdate};
use crate::utils::error::{VerificationError, VerificationResult};
use crate::utils::paths::{config_path, ensure_cyrano_dir};

/// Configuration service for the engine settings file
#[derive(Debug)]
pub struct ConfigService {
    config_path: PathBuf,
    config: EngineConfig,
}

impl ConfigService {
    /// Load the user's config file, creating it with defaults on first run
    pub fn new() -> VerificationResult<Self> {
        ensure_cyrano_dir()?;
        Self::open(config_path()?)
    }

    /// Load (or create) the config file at `path`
    pub fn open(path: impl Into<PathBuf>) -> VerificationResult<Self> {
        let config_path = path.into();
        let config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            let default_config = EngineConfig::default();
            Self::save_to_file(&config_path, &default_config)?;
            default_config
        };

        tracing::debug!("Loaded engine config from {}", config_path.display());
        Ok(Self {
            config_path,
            config,
        })
    }

    fn load_from_file(path: &Path) -> VerificationResult<EngineConfig> {
        let content = fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        config.validate().map_err(VerificationError::config)?;
        Ok(config)
    }

    fn save_to_file(path: &Path, config: &EngineConfig) -> VerificationResult<()> {
        config.validate().map_err(VerificationError::config)?;
        let content = serde_json::to_string_pretty(config)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn get_config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn get_config_clone(&self) -> EngineConfig {
        self.config.clone()
    }

    /// Apply a partial update and persist it. The in-memory config is left
    /// untouched when the update does not validate.
    pub fn update_config(&mut self, update: EngineConfigUpdate) -> VerificationResult<EngineConfig> {
        let mut next = self.config.clone();
        next.apply_update(update);
        Self::save_to_file(&self.config_path, &next)?;
        self.config = next;
        Ok(self.config.clone())
    }

    pub fn save(&self) -> VerificationResult<()> {
        Self::save_to_file(&self.config_path, &self.config)
    }

    pub fn reload(&mut self) -> VerificationResult<()> {
        self.config = Self::load_from_file(&self.config_path)?;
        Ok(())
    }

    /// Reset configuration to defaults
    pub fn reset(&mut self) -> VerificationResult<()> {
        self.config = EngineConfig::default();
        self.save()
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }
}
