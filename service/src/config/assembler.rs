//! Typed configuration views built from the visible key/value map plus the
//! process environment. Every build is recomputed from its inputs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::defaults::{
    ENV_MINIO_ACCESS_KEY, ENV_MINIO_BUCKET, ENV_MINIO_DOMAIN, ENV_MINIO_ENDPOINT,
    ENV_MINIO_SECRET_KEY, FLAG_ENABLED, LDAP_ADMIN_PASS, LDAP_ADMIN_USER, LDAP_BASE_DN,
    LDAP_ENABLED, LDAP_URL, MINIO_ACCESS_KEY, MINIO_BUCKET, MINIO_DOMAIN, MINIO_ENDPOINT,
    MINIO_SECRET_KEY, STORAGE_SERVICE_MINIO,
};
use super::env::{Environment, resolve};
use super::error::ConfigError;

/// Object-storage credentials and endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectStorageConfig {
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub endpoint: String,
    pub domain: String,
    pub region: String,
    pub service: String,
}

/// Directory-service (LDAP) login settings. Only constructed when enabled and
/// fully configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryServiceConfig {
    pub enabled: bool,
    pub url: String,
    pub admin_user: String,
    pub admin_pass: String,
    pub base_dn: String,
}

pub fn build_object_storage_config(
    values: &HashMap<String, String>,
    env: &impl Environment,
) -> ObjectStorageConfig {
    let field = |key: &str, var: &str| resolve(values.get(key), env, var);

    let mut config = ObjectStorageConfig {
        access_key: field(MINIO_ACCESS_KEY, ENV_MINIO_ACCESS_KEY),
        secret_key: field(MINIO_SECRET_KEY, ENV_MINIO_SECRET_KEY),
        bucket: field(MINIO_BUCKET, ENV_MINIO_BUCKET),
        endpoint: field(MINIO_ENDPOINT, ENV_MINIO_ENDPOINT),
        domain: field(MINIO_DOMAIN, ENV_MINIO_DOMAIN),
        region: String::new(),
        service: STORAGE_SERVICE_MINIO.to_string(),
    };

    if config.service == STORAGE_SERVICE_MINIO && !config.domain.trim().is_empty() {
        config.domain = bucket_domain(&config.domain, &config.bucket);
    }
    config
}

/// Drop one trailing `/`, then append `/{bucket}` unless the domain already
/// ends with the bucket name.
pub fn bucket_domain(domain: &str, bucket: &str) -> String {
    let trimmed = domain.strip_suffix('/').unwrap_or(domain);
    if trimmed.ends_with(bucket) {
        trimmed.to_string()
    } else {
        format!("{trimmed}/{bucket}")
    }
}

pub fn build_directory_config(
    values: &HashMap<String, String>,
) -> Result<DirectoryServiceConfig, ConfigError> {
    let get = |key: &str| values.get(key).cloned().unwrap_or_default();

    let config = DirectoryServiceConfig {
        enabled: values.get(LDAP_ENABLED).is_some_and(|v| v == FLAG_ENABLED),
        url: get(LDAP_URL),
        admin_user: get(LDAP_ADMIN_USER),
        admin_pass: get(LDAP_ADMIN_PASS),
        base_dn: get(LDAP_BASE_DN),
    };

    if !config.enabled {
        return Err(ConfigError::DirectoryDisabled);
    }

    let missing: Vec<&'static str> = [
        (LDAP_URL, &config.url),
        (LDAP_ADMIN_USER, &config.admin_user),
        (LDAP_ADMIN_PASS, &config.admin_pass),
        (LDAP_BASE_DN, &config.base_dn),
    ]
    .into_iter()
    .filter(|(_, v)| v.is_empty())
    .map(|(k, _)| k)
    .collect();
    if !missing.is_empty() {
        return Err(ConfigError::DirectoryNotConfigured { missing });
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_bucket_domain() {
        assert_eq!(
            bucket_domain("https://cdn.x.com/", "media"),
            "https://cdn.x.com/media"
        );
        assert_eq!(
            bucket_domain("https://cdn.x.com/media", "media"),
            "https://cdn.x.com/media"
        );
        assert_eq!(
            bucket_domain("https://cdn.x.com/media/", "media"),
            "https://cdn.x.com/media"
        );
        assert_eq!(
            bucket_domain("https://cdn.x.com", "media"),
            "https://cdn.x.com/media"
        );
        // Only one trailing separator is removed.
        assert_eq!(
            bucket_domain("https://cdn.x.com//", "media"),
            "https://cdn.x.com//media"
        );
    }

    #[test]
    fn test_object_storage_region_and_service() {
        let env: HashMap<String, String> = HashMap::new();
        let cfg = build_object_storage_config(&map(&[]), &env);
        assert_eq!(cfg.region, "");
        assert_eq!(cfg.service, "minio");
        assert_eq!(cfg.domain, "");
    }

    #[test]
    fn test_object_storage_blank_value_falls_back_to_env() {
        let values = map(&[(MINIO_ACCESS_KEY, "  "), (MINIO_BUCKET, "stored-bucket")]);
        let env = map(&[
            (ENV_MINIO_ACCESS_KEY, "env-key"),
            (ENV_MINIO_BUCKET, "env-bucket"),
        ]);
        let cfg = build_object_storage_config(&values, &env);
        assert_eq!(cfg.access_key, "env-key");
        assert_eq!(cfg.bucket, "stored-bucket");
    }

    #[test]
    fn test_directory_disabled() {
        let values = map(&[
            (LDAP_ENABLED, "0"),
            (LDAP_URL, "ldap://dir"),
            (LDAP_ADMIN_USER, "cn=admin"),
            (LDAP_ADMIN_PASS, "pw"),
            (LDAP_BASE_DN, "dc=x"),
        ]);
        let err = build_directory_config(&values).unwrap_err();
        assert!(matches!(err, ConfigError::DirectoryDisabled));
        assert!(err.is_not_configured());
    }

    #[test]
    fn test_directory_missing_enabled_row_is_disabled() {
        let err = build_directory_config(&map(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::DirectoryDisabled));
    }

    #[test]
    fn test_directory_lists_missing_fields() {
        let values = map(&[(LDAP_ENABLED, "1"), (LDAP_URL, "ldap://dir")]);
        match build_directory_config(&values).unwrap_err() {
            ConfigError::DirectoryNotConfigured { missing } => {
                assert_eq!(missing, vec![LDAP_ADMIN_USER, LDAP_ADMIN_PASS, LDAP_BASE_DN]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
