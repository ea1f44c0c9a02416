//! Known configuration keys, their seed values, and the env fallback names.
//!
//! Key names are a deployment contract: renaming one requires migrating the
//! stored rows.

use std::collections::HashMap;
use std::sync::LazyLock;

pub const MINIO_ACCESS_KEY: &str = "minio.access_key";
pub const MINIO_SECRET_KEY: &str = "minio.secret_key";
pub const MINIO_BUCKET: &str = "minio.bucket";
pub const MINIO_ENDPOINT: &str = "minio.endpoint";
pub const MINIO_DOMAIN: &str = "minio.domain";

pub const LDAP_ENABLED: &str = "ldap.enabled";
pub const LDAP_URL: &str = "ldap.url";
pub const LDAP_ADMIN_USER: &str = "ldap.admin_user";
pub const LDAP_ADMIN_PASS: &str = "ldap.admin_pass";
pub const LDAP_BASE_DN: &str = "ldap.base_dn";

pub const MEMBER_DEFAULT_AVATAR: &str = "member.default_avatar";

pub const SYSTEM_NAME: &str = "system.name";
pub const SYSTEM_API_URL: &str = "system.api_url";
pub const SYSTEM_PC_URL: &str = "system.pc_url";
pub const SYSTEM_H5_URL: &str = "system.h5_url";

/// Env fallbacks for object storage. Independent of the stored key names.
pub const ENV_MINIO_ACCESS_KEY: &str = "MINIO_USERNAME";
pub const ENV_MINIO_SECRET_KEY: &str = "MINIO_PASSWORD";
pub const ENV_MINIO_BUCKET: &str = "MINIO_BUCKET";
pub const ENV_MINIO_ENDPOINT: &str = "MINIO_ENDPOINT";
pub const ENV_MINIO_DOMAIN: &str = "MINIO_DOMAIN";

/// Backend identifier carried in every assembled object-storage config.
pub const STORAGE_SERVICE_MINIO: &str = "minio";

/// Stored value of a boolean flag that means "on".
pub const FLAG_ENABLED: &str = "1";

// (key, default, secret, hidden, description)
//
// No catalogue key is hidden: hidden rows are left out of the key/value map the
// builders read, so secrets they need stay visible and are masked on listing.
// The flag is seeded as-is for rows added by deployments.
type DefTuple = (&'static str, &'static str, bool, bool, &'static str);

const DEFS: &[DefTuple] = &[
    (MINIO_ACCESS_KEY, "", false, false, "Object storage access key"),
    (MINIO_SECRET_KEY, "", true, false, "Object storage secret key"),
    (MINIO_BUCKET, "", false, false, "Object storage bucket"),
    (MINIO_ENDPOINT, "", false, false, "Object storage API endpoint"),
    (MINIO_DOMAIN, "", false, false, "Public URL prefix for stored objects"),
    (LDAP_ENABLED, "0", false, false, "Enable directory login (1 = on)"),
    (LDAP_URL, "", false, false, "Directory server URL"),
    (LDAP_ADMIN_USER, "", false, false, "Directory bind user"),
    (LDAP_ADMIN_PASS, "", true, false, "Directory bind password"),
    (LDAP_BASE_DN, "", false, false, "Directory base DN"),
    (MEMBER_DEFAULT_AVATAR, "", false, false, "Default member avatar"),
    (SYSTEM_NAME, "PlayEdu", false, false, "Site name"),
    (SYSTEM_API_URL, "", false, false, "API base URL"),
    (SYSTEM_PC_URL, "", false, false, "Desktop site URL"),
    (SYSTEM_H5_URL, "", false, false, "Mobile site URL"),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub secret: bool,
    pub hidden: bool,
    pub description: &'static str,
}

/// Setting definitions in seed order.
pub static SETTING_DEFS: LazyLock<Vec<SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, secret, hidden, description)| SettingDef {
            key,
            default,
            secret,
            hidden,
            description,
        })
        .collect()
});

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, &'static SettingDef>> =
    LazyLock::new(|| SETTING_DEFS.iter().map(|d| (d.key, d)).collect());

pub fn is_secret(key: &str) -> bool {
    DEFAULT_SETTINGS.get(key).is_some_and(|d| d.secret)
}

/// Catalogue description of a key, `None` for keys added outside the catalogue.
pub fn description(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_lookups() {
        assert!(is_secret(MINIO_SECRET_KEY));
        assert!(is_secret(LDAP_ADMIN_PASS));
        assert!(!is_secret(MINIO_BUCKET));
        assert!(!is_secret("not.a.key"));

        assert_eq!(description(LDAP_BASE_DN), Some("Directory base DN"));
        assert_eq!(description("not.a.key"), None);
        assert_eq!(DEFAULT_SETTINGS.len(), SETTING_DEFS.len());
    }
}
