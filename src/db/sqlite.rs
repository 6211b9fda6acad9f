use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{Context, Result};
use chrono::Utc;
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};

use super::{migrations::run_migrations, SlotStorage};

/// Slots kept in a single SQLite table.
pub struct SqliteSlots {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqliteSlots {
    pub fn open(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }

        let mut conn = Connection::open(&db_path)
            .with_context(|| format!("failed to open SQLite database {}", db_path.display()))?;

        if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
            error!("Failed to enable WAL mode: {err}");
        }

        run_migrations(&mut conn).context("failed to run database migrations")?;

        info!("Slot database initialized at {}", db_path.display());

        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
        })
    }

    pub fn path(&self) -> &Path {
        self.db_path.as_path()
    }

    fn with_conn<T>(&self, task: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let guard = match self.conn.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        task(&guard)
    }
}

impl SlotStorage for SqliteSlots {
    fn read(&self, key: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT value FROM slots WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("failed to read slot {key}"))
        })
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO slots (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, Utc::now().to_rfc3339()],
            )
            .with_context(|| format!("failed to write slot {key}"))?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{LANGUAGE_KEY, MATCHES_KEY};

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("slots.sqlite3");

        {
            let slots = SqliteSlots::open(path.clone()).unwrap();
            slots.write(MATCHES_KEY, r#"{"matches":[]}"#).unwrap();
            slots.write(MATCHES_KEY, r#"{"matches":[1]}"#).unwrap();
            slots.write(LANGUAGE_KEY, "fi").unwrap();
        }

        let slots = SqliteSlots::open(path).unwrap();
        assert_eq!(
            slots.read(MATCHES_KEY).unwrap().as_deref(),
            Some(r#"{"matches":[1]}"#)
        );
        assert_eq!(slots.read(LANGUAGE_KEY).unwrap().as_deref(), Some("fi"));
        assert_eq!(slots.read("missing").unwrap(), None);
    }
}
