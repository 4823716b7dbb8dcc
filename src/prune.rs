//! Null pruning for exported mappings.

use serde_json::Value;

/// What [`prune`] removes from a mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PruneMode {
    /// Remove entries whose value is null
    #[default]
    Nulls,

    /// Remove entries whose value is null or an empty mapping
    NullsAndEmpty,
}

/// Recursively removes pruned entries from mappings, in place.
///
/// Recursion covers nested mappings and the mapping elements of lists. Lists
/// themselves are never removed for being empty, and null elements inside a
/// list are kept; only mapping entries are subject to the rule.
pub fn prune(value: &mut Value, mode: PruneMode) {
    match value {
        Value::Object(map) => {
            for entry in map.values_mut() {
                prune(entry, mode);
            }
            map.retain(|_, entry| !prunable(entry, mode));
        }

        Value::Array(items) => {
            for item in items.iter_mut() {
                if item.is_object() {
                    prune(item, mode);
                }
            }
        }

        _ => {}
    }
}

fn prunable(value: &Value, mode: PruneMode) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => mode == PruneMode::NullsAndEmpty && map.is_empty(),
        _ => false,
    }
}
