//! Path Utilities
//!
//! Resolves the engine's data directory (~/.cyrano/) and the files in it.

use std::path::{Path, PathBuf};

use crate::utils::error::{VerificationError, VerificationResult};

/// Get the user's home directory
pub fn home_dir() -> VerificationResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| VerificationError::config("Could not determine home directory"))
}

/// Get the Cyrano directory (~/.cyrano/)
pub fn cyrano_dir() -> VerificationResult<PathBuf> {
    Ok(home_dir()?.join(".cyrano"))
}

/// Get the engine config path (~/.cyrano/verification.json)
pub fn config_path() -> VerificationResult<PathBuf> {
    Ok(cyrano_dir()?.join("verification.json"))
}

/// Get the preference database path (~/.cyrano/data.db)
pub fn database_path() -> VerificationResult<PathBuf> {
    Ok(cyrano_dir()?.join("data.db"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> VerificationResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Get the Cyrano directory, creating if it doesn't exist
pub fn ensure_cyrano_dir() -> VerificationResult<PathBuf> {
    let path = cyrano_dir()?;
    ensure_dir(&path)?;
    Ok(path)
}
