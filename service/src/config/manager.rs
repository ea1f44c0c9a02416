//! ConfigService: the read and write surface over an injected [`ConfigStore`].

use std::collections::HashMap;

use config_db::{ConfigEntry, Database, NewEntry};

use super::FeatureStatus;
use super::assembler::{
    DirectoryServiceConfig, ObjectStorageConfig, build_directory_config,
    build_object_storage_config,
};
use super::batch::{MASKED_PLACEHOLDER, apply_batch_update};
use super::defaults::{
    FLAG_ENABLED, LDAP_ENABLED, MEMBER_DEFAULT_AVATAR, MINIO_ACCESS_KEY, MINIO_BUCKET,
    MINIO_ENDPOINT, MINIO_SECRET_KEY, SETTING_DEFS, is_secret,
};
use super::env::{Environment, ProcessEnv};
use super::error::ConfigError;
use super::store::ConfigStore;

/// Holds no state of its own beyond the store and environment handles.
pub struct ConfigService<S = Database, E = ProcessEnv> {
    store: S,
    env: E,
}

impl ConfigService<Database, ProcessEnv> {
    pub fn new(db: Database) -> Self {
        Self::with_env(db, ProcessEnv)
    }
}

impl<S: ConfigStore, E: Environment> ConfigService<S, E> {
    pub fn with_env(store: S, env: E) -> Self {
        Self { store, env }
    }

    pub fn all_key_ids(&self) -> Result<HashMap<String, i64>, ConfigError> {
        Ok(self.store.all_key_ids()?)
    }

    pub fn visible_entries(&self) -> Result<Vec<ConfigEntry>, ConfigError> {
        Ok(self.store.list_visible()?)
    }

    /// Visible entries with every non-empty secret replaced by
    /// [`MASKED_PLACEHOLDER`]. Posting this listing back is a no-op for secrets.
    pub fn visible_entries_masked(&self) -> Result<Vec<ConfigEntry>, ConfigError> {
        let mut entries = self.store.list_visible()?;
        for entry in &mut entries {
            if is_secret(&entry.key_name) && !entry.key_value.is_empty() {
                entry.key_value = MASKED_PLACEHOLDER.to_string();
            }
        }
        Ok(entries)
    }

    pub fn key_values(&self) -> Result<HashMap<String, String>, ConfigError> {
        Ok(self.store.key_values()?)
    }

    pub fn object_storage_config(&self) -> Result<ObjectStorageConfig, ConfigError> {
        let values = self.store.key_values()?;
        Ok(build_object_storage_config(&values, &self.env))
    }

    pub fn directory_config(&self) -> Result<DirectoryServiceConfig, ConfigError> {
        let values = self.store.key_values()?;
        build_directory_config(&values).inspect_err(|e| {
            tracing::warn!("Directory service config rejected: {e}");
        })
    }

    /// The `ldap.enabled` row is seeded at install time; a missing row is an
    /// error, not "disabled".
    pub fn is_directory_login_enabled(&self) -> Result<bool, ConfigError> {
        let entry = self.store.lookup_by_key(LDAP_ENABLED)?;
        Ok(entry.key_value == FLAG_ENABLED)
    }

    /// Exact lookup of any row, hidden ones included.
    pub fn lookup(&self, key_name: &str) -> Result<ConfigEntry, ConfigError> {
        Ok(self.store.lookup_by_key(key_name)?)
    }

    pub fn default_avatar(&self) -> Result<String, ConfigError> {
        Ok(self.store.lookup_by_key(MEMBER_DEFAULT_AVATAR)?.key_value)
    }

    /// Returns the number of rows written (zero means no write was issued).
    pub fn apply_batch_update(
        &self,
        proposed: &HashMap<String, Option<String>>,
    ) -> Result<usize, ConfigError> {
        Ok(apply_batch_update(&self.store, proposed)?)
    }

    /// Insert catalogue rows that are missing. Existing values are kept.
    pub fn initialize_defaults(&self) -> Result<usize, ConfigError> {
        let entries: Vec<NewEntry<'_>> = SETTING_DEFS
            .iter()
            .map(|def| NewEntry {
                key_name: def.key,
                key_value: def.default,
                is_hidden: def.hidden,
            })
            .collect();
        let seeded = self.store.insert_missing(&entries)?;
        if seeded > 0 {
            tracing::info!("Seeded {seeded} default config entries");
        }
        Ok(seeded)
    }

    /// Check which features are usable with the current settings.
    pub fn feature_status(&self) -> Result<FeatureStatus, ConfigError> {
        let values = self.store.key_values()?;
        let storage = build_object_storage_config(&values, &self.env);

        let mut missing_settings: Vec<String> = [
            (MINIO_ACCESS_KEY, &storage.access_key),
            (MINIO_SECRET_KEY, &storage.secret_key),
            (MINIO_BUCKET, &storage.bucket),
            (MINIO_ENDPOINT, &storage.endpoint),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(k, _)| k.to_string())
        .collect();
        let object_storage_configured = missing_settings.is_empty();

        let (directory_enabled, directory_configured) = match build_directory_config(&values) {
            Ok(_) => (true, true),
            Err(ConfigError::DirectoryDisabled) => (false, false),
            Err(ConfigError::DirectoryNotConfigured { missing }) => {
                missing_settings.extend(missing.into_iter().map(String::from));
                (true, false)
            }
            Err(e) => return Err(e),
        };

        Ok(FeatureStatus {
            object_storage_configured,
            directory_enabled,
            directory_configured,
            missing_settings,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
