//! The persistence seam behind every configuration read and write.

use std::collections::HashMap;

use config_db::{ConfigEntry, ConfigUpdate, Database, DbError, NewEntry};

/// Flat key/value table of configuration rows. Implementations read and write
/// straight through to storage; nothing is cached.
pub trait ConfigStore {
    /// Every key name mapped to its surrogate id.
    fn all_key_ids(&self) -> Result<HashMap<String, i64>, DbError>;

    /// Non-hidden rows ordered by id.
    fn list_visible(&self) -> Result<Vec<ConfigEntry>, DbError>;

    /// Key name to value over non-hidden rows.
    fn key_values(&self) -> Result<HashMap<String, String>, DbError>;

    /// Exact lookup; a missing row is `DbError::NotFound`.
    fn lookup_by_key(&self, key_name: &str) -> Result<ConfigEntry, DbError>;

    /// Every row, hidden ones included, ordered by id.
    fn list_all(&self) -> Result<Vec<ConfigEntry>, DbError>;

    /// Apply all updates or none of them.
    fn upsert_batch(&self, updates: &[ConfigUpdate]) -> Result<(), DbError>;

    fn insert_missing(&self, entries: &[NewEntry<'_>]) -> Result<usize, DbError>;
}

impl ConfigStore for Database {
    fn all_key_ids(&self) -> Result<HashMap<String, i64>, DbError> {
        self.config_key_ids()
    }

    fn list_visible(&self) -> Result<Vec<ConfigEntry>, DbError> {
        self.visible_config_entries()
    }

    fn key_values(&self) -> Result<HashMap<String, String>, DbError> {
        self.visible_config_values()
    }

    fn lookup_by_key(&self, key_name: &str) -> Result<ConfigEntry, DbError> {
        self.get_config_entry(key_name)
    }

    fn list_all(&self) -> Result<Vec<ConfigEntry>, DbError> {
        self.all_config_entries()
    }

    fn upsert_batch(&self, updates: &[ConfigUpdate]) -> Result<(), DbError> {
        self.update_config_values_by_id(updates)
    }

    fn insert_missing(&self, entries: &[NewEntry<'_>]) -> Result<usize, DbError> {
        self.insert_missing_config_entries(entries)
    }
}
