//! Batch update: diff a proposed key/value map against the stored rows and
//! write only what actually changed.

use std::collections::HashMap;

use config_db::{ConfigEntry, ConfigUpdate, DbError};

use super::store::ConfigStore;

/// Sentinel sent back in place of a masked secret. Never persisted.
pub const MASKED_PLACEHOLDER: &str = "******";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Skip {
    Absent,
    Placeholder,
    UnknownKey,
    Unchanged,
}

fn classify(
    key: &str,
    proposed: Option<&str>,
    current: &HashMap<&str, &ConfigEntry>,
) -> Result<ConfigUpdate, Skip> {
    let value = proposed.ok_or(Skip::Absent)?;
    if value == MASKED_PLACEHOLDER {
        return Err(Skip::Placeholder);
    }
    let entry = current.get(key).ok_or(Skip::UnknownKey)?;
    if entry.key_value == value {
        return Err(Skip::Unchanged);
    }
    Ok(ConfigUpdate {
        id: entry.id,
        key_value: value.to_string(),
    })
}

/// Compute the minimal set of writes for `proposed` given the current rows.
/// The result is ordered by id.
pub fn plan_batch_update(
    proposed: &HashMap<String, Option<String>>,
    current: &[ConfigEntry],
) -> Vec<ConfigUpdate> {
    let by_key: HashMap<&str, &ConfigEntry> =
        current.iter().map(|e| (e.key_name.as_str(), e)).collect();

    let mut updates: Vec<ConfigUpdate> = proposed
        .iter()
        .filter_map(
            |(key, value)| match classify(key, value.as_deref(), &by_key) {
                Ok(update) => Some(update),
                Err(reason) => {
                    tracing::debug!(key = %key, ?reason, "Skipping config entry");
                    None
                }
            },
        )
        .collect();
    updates.sort_by_key(|u| u.id);
    updates
}

/// Snapshot the stored rows, then issue at most one batch write. The snapshot
/// reads the whole table, so the size of `proposed` never reaches SQL.
/// Returns the number of rows written.
pub fn apply_batch_update<S: ConfigStore + ?Sized>(
    store: &S,
    proposed: &HashMap<String, Option<String>>,
) -> Result<usize, DbError> {
    let current = store.list_all()?;
    let updates = plan_batch_update(proposed, &current);
    if updates.is_empty() {
        tracing::debug!(proposed = proposed.len(), "Config batch update is a no-op");
        return Ok(0);
    }
    store.upsert_batch(&updates)?;
    tracing::info!(
        proposed = proposed.len(),
        written = updates.len(),
        "Applied config batch update"
    );
    Ok(updates.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, key: &str, value: &str) -> ConfigEntry {
        ConfigEntry {
            id,
            key_name: key.into(),
            key_value: value.into(),
            is_hidden: false,
        }
    }

    fn proposed(pairs: &[(&str, Option<&str>)]) -> HashMap<String, Option<String>> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect()
    }

    #[test]
    fn test_placeholder_literal() {
        assert_eq!(MASKED_PLACEHOLDER, "******");
    }

    #[test]
    fn test_plan_skips_every_no_op_kind() {
        let current = vec![
            entry(1, "a", "x"),
            entry(2, "b", "secret"),
            entry(3, "c", "old"),
        ];
        let plan = plan_batch_update(
            &proposed(&[
                ("c", None),
                ("b", Some(MASKED_PLACEHOLDER)),
                ("unknown", Some("v")),
                ("a", Some("x")),
            ]),
            &current,
        );
        assert!(plan.is_empty());
    }

    #[test]
    fn test_plan_keeps_only_changes() {
        let current = vec![entry(1, "a", "x"), entry(2, "b", "y"), entry(3, "c", "z")];
        let plan = plan_batch_update(
            &proposed(&[
                ("c", Some("z2")),
                ("a", Some("x")),
                ("b", Some(MASKED_PLACEHOLDER)),
                ("d", Some("new")),
            ]),
            &current,
        );
        assert_eq!(
            plan,
            vec![ConfigUpdate {
                id: 3,
                key_value: "z2".into()
            }]
        );
    }

    #[test]
    fn test_plan_allows_clearing_a_value() {
        let current = vec![entry(7, "a", "x")];
        let plan = plan_batch_update(&proposed(&[("a", Some(""))]), &current);
        assert_eq!(
            plan,
            vec![ConfigUpdate {
                id: 7,
                key_value: String::new()
            }]
        );
    }

    #[test]
    fn test_plan_is_ordered_by_id() {
        let current = vec![entry(5, "e", ""), entry(2, "b", ""), entry(9, "i", "")];
        let plan = plan_batch_update(
            &proposed(&[("i", Some("3")), ("e", Some("2")), ("b", Some("1"))]),
            &current,
        );
        let ids: Vec<i64> = plan.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![2, 5, 9]);
    }
}
