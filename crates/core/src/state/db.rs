//! # Pokedex Database
//!
//! Single SQLite database backing durable client state.
//! Values are stored as text under fixed keys in a `kv_store` table.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};

use super::io::ensure_parent_dir;

/// Schema version for migrations
const SCHEMA_VERSION: i32 = 1;

/// Database manager for Pokedex state
pub struct PokedexDb {
    conn: Arc<Mutex<Connection>>,
}

impl PokedexDb {
    /// Create the parent directory if needed, then open the database
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        ensure_parent_dir(&path).await?;

        tokio::task::spawn_blocking(move || Self::open_at(path))
            .await
            .context("Database open task panicked")?
    }

    /// Open database at a specific path whose directory already exists
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref()).context("Failed to open pokedex database")?;
        Self::from_connection(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.run_migrations()?;

        Ok(db)
    }

    /// Get a shared connection for use by other modules
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    /// Run schema migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY)",
            [],
        )?;

        let current_version: i32 = conn
            .query_row(
                "SELECT COALESCE(MAX(version), 0) FROM schema_version",
                [],
                |row| row.get(0),
            )
            .unwrap_or(0);

        if current_version < 1 {
            Self::migrate_v1(&conn)?;
            conn.execute(
                "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
                [1],
            )?;
        }

        Ok(())
    }

    /// Migration to version 1 - key/value table
    fn migrate_v1(conn: &Connection) -> Result<()> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
            "#,
            [],
        )?;

        tracing::info!(
            "PokedexDb initialized with schema version {}",
            SCHEMA_VERSION
        );

        Ok(())
    }

    // =========================================================================
    // Key/Value Methods
    // =========================================================================

    /// Read the value stored under `key`, if any
    pub fn get_value(&self, key: &str) -> Result<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        conn.query_row(
            "SELECT value FROM kv_store WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .with_context(|| format!("Failed to read key '{}'", key))
    }

    /// Store `value` under `key` (upsert)
    pub fn set_value(&self, key: &str, value: &str) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        conn.execute(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = ?2,
                updated_at = datetime('now')
            "#,
            params![key, value],
        )
        .with_context(|| format!("Failed to write key '{}'", key))?;

        tracing::debug!("Stored {} bytes under '{}'", value.len(), key);
        Ok(())
    }
}
