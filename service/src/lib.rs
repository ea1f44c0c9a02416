//! Runtime configuration store: stored key/values, env fallback, derived
//! object-storage and directory-service configs, and minimal-diff batch updates.

pub mod config;

use std::path::{Path, PathBuf};

use config_db::Database;

pub use config::{
    ConfigError, ConfigService, ConfigStore, DirectoryServiceConfig, Environment, FeatureStatus,
    MASKED_PLACEHOLDER, ObjectStorageConfig, ProcessEnv,
};

/// Determine the data directory for the database.
/// Priority: APPCONFIG_DATA_DIR env var > ~/.appconfig
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("APPCONFIG_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".appconfig")
}

/// Load .env from multiple candidate paths.
pub fn load_dotenv() {
    let candidates = [".env", "../.env", "../../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}

/// Open the database (default location unless `db_path` is given) and seed
/// any missing default rows.
pub fn init_foundation(db_path: Option<&Path>) -> Result<ConfigService, anyhow::Error> {
    let db_path = match db_path {
        Some(path) => path.to_path_buf(),
        None => {
            let dir = data_dir();
            std::fs::create_dir_all(&dir)?;
            dir.join("config.db")
        }
    };

    tracing::info!("Opening database at {}", db_path.display());
    let db = Database::open(&db_path)?;

    let service = ConfigService::new(db);
    service.initialize_defaults()?;

    match service.feature_status() {
        Ok(status) if !status.missing_settings.is_empty() => {
            tracing::warn!("Missing settings: {:?}", status.missing_settings);
        }
        Ok(_) => {}
        Err(e) => tracing::warn!("Failed to check feature status: {e}"),
    }

    Ok(service)
}
