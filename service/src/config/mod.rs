//! Configuration management: stored key/values, env fallback, derived configs.

pub mod assembler;
pub mod batch;
pub mod defaults;
pub mod env;
pub mod error;
pub mod manager;
pub mod store;

pub use assembler::{DirectoryServiceConfig, ObjectStorageConfig};
pub use batch::MASKED_PLACEHOLDER;
pub use env::{Environment, ProcessEnv};
pub use error::ConfigError;
pub use manager::ConfigService;
pub use store::ConfigStore;

use serde::{Deserialize, Serialize};

/// Feature availability status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureStatus {
    pub object_storage_configured: bool,
    pub directory_enabled: bool,
    pub directory_configured: bool,
    pub missing_settings: Vec<String>,
}
