//! Mirror storage implementations.

use chrono::{DateTime, Utc};
use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::traits::{MirrorSnapshot, MirrorStorage};
use crate::remote::User;

/// Slot name used when none is configured
pub const DEFAULT_SLOT: &str = "users";

/// Storage implementation that doesn't persist anything.
/// Used when the mirror is disabled - all operations are no-ops.
pub struct NoopMirror;

impl MirrorStorage for NoopMirror {
  fn save(&self, _users: &[User]) -> Result<()> {
    Ok(()) // Discard
  }

  fn load(&self) -> Result<Option<MirrorSnapshot>> {
    Ok(None) // Always miss
  }
}

/// SQLite-based mirror: one row per slot, JSON array in `data`.
pub struct SqliteMirror {
  conn: Mutex<Connection>,
  slot: String,
}

/// Schema for the mirror table.
const MIRROR_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS mirror (
    slot TEXT PRIMARY KEY,
    data TEXT NOT NULL,
    saved_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

impl SqliteMirror {
  /// Open the mirror at `path`, or at the default location.
  pub fn open(path: Option<&Path>, slot: &str) -> Result<Self> {
    let path = match path {
      Some(p) => p.to_path_buf(),
      None => Self::default_path()?,
    };

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create mirror directory: {}", e))?;
    }

    let conn = Connection::open(&path)
      .map_err(|e| eyre!("Failed to open mirror database at {}: {}", path.display(), e))?;

    tracing::debug!(path = %path.display(), slot, "opened mirror");
    Self::with_connection(conn, slot)
  }

  fn with_connection(conn: Connection, slot: &str) -> Result<Self> {
    let mirror = Self {
      conn: Mutex::new(conn),
      slot: slot.to_string(),
    };
    mirror.run_migrations()?;
    Ok(mirror)
  }

  /// Get the default database path.
  pub fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("u9s").join("mirror.db"))
  }

  fn run_migrations(&self) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute_batch(MIRROR_SCHEMA)
      .map_err(|e| eyre!("Failed to run mirror migrations: {}", e))?;

    Ok(())
  }
}

impl MirrorStorage for SqliteMirror {
  fn save(&self, users: &[User]) -> Result<()> {
    let data =
      serde_json::to_string(users).map_err(|e| eyre!("Failed to serialize users: {}", e))?;

    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    // Single statement, so the slot is replaced atomically
    conn
      .execute(
        "INSERT OR REPLACE INTO mirror (slot, data, saved_at) VALUES (?, ?, datetime('now'))",
        params![self.slot, data],
      )
      .map_err(|e| eyre!("Failed to write mirror slot {}: {}", self.slot, e))?;

    tracing::debug!(slot = %self.slot, count = users.len(), "saved mirror");
    Ok(())
  }

  fn load(&self) -> Result<Option<MirrorSnapshot>> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    let row: Option<(String, String)> = conn
      .query_row(
        "SELECT data, saved_at FROM mirror WHERE slot = ?",
        params![self.slot],
        |row| Ok((row.get(0)?, row.get(1)?)),
      )
      .optional()
      .map_err(|e| eyre!("Failed to read mirror slot {}: {}", self.slot, e))?;

    let Some((data, saved_at)) = row else {
      return Ok(None);
    };

    let users: Vec<User> = serde_json::from_str(&data)
      .map_err(|e| eyre!("Mirror slot {} is corrupt: {}", self.slot, e))?;

    Ok(Some(MirrorSnapshot {
      users,
      saved_at: parse_datetime(&saved_at)?,
    }))
  }
}

/// Parse a datetime string from SQLite format.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
  // SQLite stores as "YYYY-MM-DD HH:MM:SS"
  chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
    .map(|dt| dt.and_utc())
    .map_err(|e| eyre!("Failed to parse datetime '{}': {}", s, e))
}
