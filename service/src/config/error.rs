use config_db::DbError;

/// Failures surfaced by configuration reads, builds and batch updates.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Persistence failure, including a missing seed row on single-key lookups
    /// and a rejected batch write.
    #[error(transparent)]
    Store(#[from] DbError),

    #[error("directory service is not enabled")]
    DirectoryDisabled,

    #[error("directory service is not configured (missing: {})", missing.join(", "))]
    DirectoryNotConfigured { missing: Vec<&'static str> },
}

impl ConfigError {
    /// True for user-facing "feature not set up" errors, as opposed to storage faults.
    pub fn is_not_configured(&self) -> bool {
        matches!(
            self,
            Self::DirectoryDisabled | Self::DirectoryNotConfigured { .. }
        )
    }
}
