//! SQLite Database
//!
//! Durable preference storage using rusqlite with r2d2 connection pooling.
//! Every record is a single row written by one upsert statement, so readers
//! see either the previous or the new record, never a partial one.

use std::path::Path;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

use cyrano_verify_core::{CustomModelConfig, ModelAssignment, ProviderStrategy, VerificationMode};

use crate::models::preferences::{UserDefaults, UserPreference};
use crate::utils::error::{VerificationError, VerificationResult};
use crate::utils::paths::database_path;

/// Raw preference row from the database
#[derive(Debug, Clone)]
pub struct PreferenceRow {
    pub user_id: String,
    pub tool_name: String,
    pub mode: String,
    pub provider_strategy: String,
    pub custom_config_id: Option<String>,
    pub updated_at: Option<String>,
}

/// Raw custom config row from the database
#[derive(Debug, Clone)]
pub struct CustomConfigRow {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub provider_strategy: String,
    pub assignments: String,
}

impl TryFrom<PreferenceRow> for UserPreference {
    type Error = VerificationError;

    fn try_from(row: PreferenceRow) -> VerificationResult<Self> {
        Ok(UserPreference {
            mode: parse_column::<VerificationMode>("mode", &row.mode)?,
            provider_strategy: parse_column::<ProviderStrategy>(
                "provider_strategy",
                &row.provider_strategy,
            )?,
            user_id: row.user_id,
            tool_name: row.tool_name,
            custom_config_id: row.custom_config_id,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<CustomConfigRow> for CustomModelConfig {
    type Error = VerificationError;

    fn try_from(row: CustomConfigRow) -> VerificationResult<Self> {
        let assignments: Vec<ModelAssignment> = serde_json::from_str(&row.assignments)?;
        Ok(CustomModelConfig {
            provider_strategy: parse_column::<ProviderStrategy>(
                "provider_strategy",
                &row.provider_strategy,
            )?,
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            description: row.description,
            assignments,
        })
    }
}

fn parse_column<T>(column: &str, value: &str) -> VerificationResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| VerificationError::database(format!("Corrupt {} column: {}", column, e)))
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Type alias for the connection pool
pub type DbPool = Pool<SqliteConnectionManager>;

/// Database service for preference persistence
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Create an in-memory database for testing.
    pub fn new_in_memory() -> VerificationResult<Self> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e| {
                VerificationError::database(format!("Failed to create connection pool: {}", e))
            })?;

        let db = Self { pool };
        db.init_schema()?;
        Ok(db)
    }

    /// Open the database at ~/.cyrano/data.db
    pub fn new() -> VerificationResult<Self> {
        Self::open(database_path()?)
    }

    /// Open (or create) a database file at `db_path`
    pub fn open(db_path: impl AsRef<Path>) -> VerificationResult<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let manager = SqliteConnectionManager::file(db_path);
        let pool = Pool::builder()
            .max_size(10)
            .build(manager)
            .map_err(|e| {
                VerificationError::database(format!("Failed to create connection pool: {}", e))
            })?;

        let db = Self { pool };
        db.init_schema()?;
        tracing::info!("Opened preference database at {}", db_path.display());
        Ok(db)
    }

    fn init_schema(&self) -> VerificationResult<()> {
        let conn = self.get_connection()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS verification_preferences (
                user_id TEXT NOT NULL,
                tool_name TEXT NOT NULL,
                mode TEXT NOT NULL,
                provider_strategy TEXT NOT NULL,
                custom_config_id TEXT,
                created_at TEXT DEFAULT CURRENT_TIMESTAMP,
                updated_at TEXT,
                PRIMARY KEY (user_id, tool_name)
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS custom_model_configs (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                description TEXT,
                provider_strategy TEXT NOT NULL,
                assignments TEXT NOT NULL,
                created_at TEXT DEFAULT CURRENT_TIMESTAMP,
                updated_at TEXT
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_custom_model_configs_user
             ON custom_model_configs(user_id)",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS user_defaults (
                user_id TEXT PRIMARY KEY,
                mode TEXT NOT NULL,
                provider_strategy TEXT NOT NULL,
                updated_at TEXT
            )",
            [],
        )?;

        Ok(())
    }

    /// Get a connection from the pool
    pub fn get_connection(
        &self,
    ) -> VerificationResult<r2d2::PooledConnection<SqliteConnectionManager>> {
        self.pool
            .get()
            .map_err(|e| VerificationError::database(format!("Failed to get connection: {}", e)))
    }

    /// Check if the database is healthy
    pub fn is_healthy(&self) -> bool {
        if let Ok(conn) = self.pool.get() {
            conn.query_row("SELECT 1", [], |_| Ok(())).is_ok()
        } else {
            false
        }
    }

    // ========================================================================
    // Preference Operations
    // ========================================================================

    pub fn get_preference(
        &self,
        user_id: &str,
        tool_name: &str,
    ) -> VerificationResult<Option<UserPreference>> {
        let conn = self.get_connection()?;
        let result = conn.query_row(
            "SELECT user_id, tool_name, mode, provider_strategy, custom_config_id, updated_at
             FROM verification_preferences WHERE user_id = ?1 AND tool_name = ?2",
            params![user_id, tool_name],
            |row| {
                Ok(PreferenceRow {
                    user_id: row.get(0)?,
                    tool_name: row.get(1)?,
                    mode: row.get(2)?,
                    provider_strategy: row.get(3)?,
                    custom_config_id: row.get(4)?,
                    updated_at: row.get(5)?,
                })
            },
        );

        match result {
            Ok(row) => Ok(Some(UserPreference::try_from(row)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(VerificationError::database(e.to_string())),
        }
    }

    /// Insert or overwrite the preference for (user, tool)
    pub fn upsert_preference(&self, pref: &UserPreference) -> VerificationResult<()> {
        let conn = self.get_connection()?;
        let updated_at = pref.updated_at.clone().unwrap_or_else(now_rfc3339);
        conn.execute(
            "INSERT INTO verification_preferences
                (user_id, tool_name, mode, provider_strategy, custom_config_id, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(user_id, tool_name) DO UPDATE SET
                mode = ?3, provider_strategy = ?4, custom_config_id = ?5, updated_at = ?6",
            params![
                pref.user_id,
                pref.tool_name,
                pref.mode.to_string(),
                pref.provider_strategy.to_string(),
                pref.custom_config_id,
                updated_at,
            ],
        )?;
        Ok(())
    }

    // ========================================================================
    // User Default Operations
    // ========================================================================

    pub fn get_user_defaults(&self, user_id: &str) -> VerificationResult<Option<UserDefaults>> {
        let conn = self.get_connection()?;
        let result = conn.query_row(
            "SELECT mode, provider_strategy FROM user_defaults WHERE user_id = ?1",
            params![user_id],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        );

        match result {
            Ok((mode, strategy)) => Ok(Some(UserDefaults {
                user_id: user_id.to_string(),
                mode: parse_column("mode", &mode)?,
                provider_strategy: parse_column("provider_strategy", &strategy)?,
            })),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(VerificationError::database(e.to_string())),
        }
    }

    pub fn upsert_user_defaults(&self, defaults: &UserDefaults) -> VerificationResult<()> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO user_defaults (user_id, mode, provider_strategy, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(user_id) DO UPDATE SET
                mode = ?2, provider_strategy = ?3, updated_at = ?4",
            params![
                defaults.user_id,
                defaults.mode.to_string(),
                defaults.provider_strategy.to_string(),
                now_rfc3339(),
            ],
        )?;
        Ok(())
    }

    // ========================================================================
    // Custom Config Operations
    // ========================================================================

    pub fn get_custom_config(
        &self,
        user_id: &str,
        config_id: &str,
    ) -> VerificationResult<Option<CustomModelConfig>> {
        let conn = self.get_connection()?;
        let result = conn.query_row(
            "SELECT id, user_id, name, description, provider_strategy, assignments
             FROM custom_model_configs WHERE user_id = ?1 AND id = ?2",
            params![user_id, config_id],
            Self::row_to_custom_config,
        );

        match result {
            Ok(row) => Ok(Some(CustomModelConfig::try_from(row)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(VerificationError::database(e.to_string())),
        }
    }

    pub fn list_custom_configs(&self, user_id: &str) -> VerificationResult<Vec<CustomModelConfig>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, name, description, provider_strategy, assignments
             FROM custom_model_configs WHERE user_id = ?1 ORDER BY name, id",
        )?;
        let rows = stmt
            .query_map(params![user_id], Self::row_to_custom_config)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(CustomModelConfig::try_from).collect()
    }

    /// Insert or update a custom config. Returns `false` without writing when
    /// the id already belongs to another user.
    pub fn upsert_custom_config(&self, config: &CustomModelConfig) -> VerificationResult<bool> {
        let conn = self.get_connection()?;
        let assignments = serde_json::to_string(&config.assignments)?;
        let changed = conn.execute(
            "INSERT INTO custom_model_configs
                (id, user_id, name, description, provider_strategy, assignments, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(id) DO UPDATE SET
                name = ?3, description = ?4, provider_strategy = ?5,
                assignments = ?6, updated_at = ?7
             WHERE custom_model_configs.user_id = excluded.user_id",
            params![
                config.id,
                config.user_id,
                config.name,
                config.description,
                config.provider_strategy.to_string(),
                assignments,
                now_rfc3339(),
            ],
        )?;
        Ok(changed > 0)
    }

    /// Delete a custom config; returns whether a row was removed
    pub fn delete_custom_config(&self, user_id: &str, config_id: &str) -> VerificationResult<bool> {
        let conn = self.get_connection()?;
        let removed = conn.execute(
            "DELETE FROM custom_model_configs WHERE user_id = ?1 AND id = ?2",
            params![user_id, config_id],
        )?;
        Ok(removed > 0)
    }

    /// Remove every record owned by `user_id`
    pub fn clear_user(&self, user_id: &str) -> VerificationResult<()> {
        let mut conn = self.get_connection()?;
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM verification_preferences WHERE user_id = ?1",
            params![user_id],
        )?;
        tx.execute(
            "DELETE FROM custom_model_configs WHERE user_id = ?1",
            params![user_id],
        )?;
        tx.execute("DELETE FROM user_defaults WHERE user_id = ?1", params![user_id])?;
        tx.commit()?;
        Ok(())
    }

    fn row_to_custom_config(row: &rusqlite::Row) -> rusqlite::Result<CustomConfigRow> {
        Ok(CustomConfigRow {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            provider_strategy: row.get(4)?,
            assignments: row.get(5)?,
        })
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("pool_size", &self.pool.state().connections)
            .finish()
    }
}
