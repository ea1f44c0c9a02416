//! Key/value rows of the `app_config` table.

use std::collections::HashMap;

use rusqlite::Row;
use serde::{Deserialize, Serialize};

use crate::{Database, DbError};

/// One configuration row. `key_name` is unique, `id` is assigned by SQLite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub id: i64,
    pub key_name: String,
    pub key_value: String,
    pub is_hidden: bool,
}

/// A staged value change addressed by surrogate id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigUpdate {
    pub id: i64,
    pub key_value: String,
}

/// A row to seed when its key is not present yet.
#[derive(Debug, Clone, Copy)]
pub struct NewEntry<'a> {
    pub key_name: &'a str,
    pub key_value: &'a str,
    pub is_hidden: bool,
}

const ENTRY_COLUMNS: &str = "id, key_name, key_value, is_hidden";

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<ConfigEntry> {
    Ok(ConfigEntry {
        id: row.get(0)?,
        key_name: row.get(1)?,
        key_value: row.get(2)?,
        is_hidden: row.get(3)?,
    })
}

impl Database {
    /// Every key name mapped to its id, hidden rows included.
    pub fn config_key_ids(&self) -> Result<HashMap<String, i64>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT key_name, id FROM app_config")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            let mut map = HashMap::new();
            for row in rows {
                let (k, id) = row?;
                map.insert(k, id);
            }
            Ok(map)
        })
    }

    pub fn visible_config_entries(&self) -> Result<Vec<ConfigEntry>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ENTRY_COLUMNS} FROM app_config WHERE is_hidden = 0 ORDER BY id"
            ))?;
            let rows = stmt.query_map([], entry_from_row)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        })
    }

    pub fn visible_config_values(&self) -> Result<HashMap<String, String>, DbError> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT key_name, key_value FROM app_config WHERE is_hidden = 0")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;
            let mut map = HashMap::new();
            for row in rows {
                let (k, v) = row?;
                map.insert(k, v);
            }
            Ok(map)
        })
    }

    /// Exact lookup by key name. A missing row is `DbError::NotFound`.
    pub fn get_config_entry(&self, key_name: &str) -> Result<ConfigEntry, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ENTRY_COLUMNS} FROM app_config WHERE key_name = ?1"
            ))?;
            match stmt.query_row([key_name], entry_from_row) {
                Ok(entry) => Ok(entry),
                Err(rusqlite::Error::QueryReturnedNoRows) => {
                    Err(DbError::NotFound(format!("config key {key_name}")))
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    /// Every row, hidden ones included, ordered by id.
    pub fn all_config_entries(&self) -> Result<Vec<ConfigEntry>, DbError> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {ENTRY_COLUMNS} FROM app_config ORDER BY id"))?;
            let rows = stmt.query_map([], entry_from_row)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        })
    }

    /// Apply every update in one transaction. If any id has no row the whole
    /// batch is rolled back.
    pub fn update_config_values_by_id(&self, updates: &[ConfigUpdate]) -> Result<(), DbError> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "UPDATE app_config SET key_value = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
                )?;
                for update in updates {
                    let changed = stmt.execute(rusqlite::params![update.key_value, update.id])?;
                    if changed == 0 {
                        tracing::warn!(id = update.id, "Config batch rolled back: no row for id");
                        return Err(DbError::NotFound(format!("config id {}", update.id)));
                    }
                }
            }
            tx.commit()?;
            Ok(())
        })
    }

    pub fn insert_config_entry(
        &self,
        key_name: &str,
        key_value: &str,
        is_hidden: bool,
    ) -> Result<ConfigEntry, DbError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO app_config (key_name, key_value, is_hidden, updated_at) VALUES (?1, ?2, ?3, CURRENT_TIMESTAMP)",
                rusqlite::params![key_name, key_value, is_hidden],
            )?;
            let id = conn.last_insert_rowid();
            let mut stmt = conn.prepare(&format!(
                "SELECT {ENTRY_COLUMNS} FROM app_config WHERE id = ?1"
            ))?;
            stmt.query_row([id], entry_from_row).map_err(Into::into)
        })
    }

    /// Insert rows whose key does not exist yet; existing values are kept.
    /// Returns how many rows were created.
    pub fn insert_missing_config_entries(&self, entries: &[NewEntry<'_>]) -> Result<usize, DbError> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let mut inserted = 0;
            {
                let mut stmt = tx.prepare(
                    "INSERT OR IGNORE INTO app_config (key_name, key_value, is_hidden, updated_at) VALUES (?1, ?2, ?3, CURRENT_TIMESTAMP)",
                )?;
                for entry in entries {
                    inserted +=
                        stmt.execute(rusqlite::params![entry.key_name, entry.key_value, entry.is_hidden])?;
                }
            }
            tx.commit()?;
            Ok(inserted)
        })
    }

    pub fn delete_config_entry(&self, key_name: &str) -> Result<(), DbError> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM app_config WHERE key_name = ?1", [key_name])?;
            Ok(())
        })
    }
}
