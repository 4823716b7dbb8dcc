//! Cardinality correction for list-typed fields.
//!
//! A document cannot distinguish "one child element" from "a list field that
//! happens to hold one element": both parse to a single nested mapping. This
//! pass rewrites singleton mappings at list-typed fields into one-element
//! lists, and renumbers buffered attribute paths so they keep addressing the
//! same logical element.

use crate::{Path, attr::AttributeTable};
use serde_json::Value;
use std::collections::BTreeSet;

/// Rewrites every singleton mapping at a list-typed field into a one-element
/// list, recursively, updating `table` paths to carry the new `[0]` index.
///
/// `list_fields` holds the aliases of list-typed fields, matched by name
/// alone (see [`collect_list_fields`](crate::schema::collect_list_fields)
/// for why paths are not used).
pub fn correct(value: &mut Value, list_fields: &BTreeSet<&str>, table: &mut AttributeTable) {
    correct_at(value, list_fields, table, &Path::root());
}

fn correct_at(
    value: &mut Value,
    list_fields: &BTreeSet<&str>,
    table: &mut AttributeTable,
    path: &Path,
) {
    let Value::Object(map) = value else { return };

    for (key, entry) in map.iter_mut() {
        let child_path = path.child(key);

        // Scalars are wrapped as well as mappings: a list-of-scalars field
        // with one element parses to a bare scalar and has the same ambiguity
        if list_fields.contains(key.as_str()) && !entry.is_array() && !entry.is_null() {
            table.insert_index(&child_path, 0);
            let singleton = entry.take();
            *entry = Value::Array(vec![singleton]);
        }

        match entry {
            Value::Object(_) => correct_at(entry, list_fields, table, &child_path),
            Value::Array(items) => {
                for (index, item) in items.iter_mut().enumerate() {
                    correct_at(item, list_fields, table, &path.child_indexed(key, index));
                }
            }
            _ => {}
        }
    }
}
