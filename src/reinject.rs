//! Attribute reinjection: the inverse of normalization.
//!
//! Walks an exported model mapping alongside its field schema and an
//! [`AttributeTable`], re-wrapping each attributed node so the writer
//! reproduces the original attribute placement: scalars become
//! `{ "#text": .., "@key": .. }` mappings, nested mappings and list elements
//! gain `@`-prefixed sibling keys.

use crate::{
    Path,
    attr::{Attribute, AttributeTable, TEXT_KEY},
    schema::Field,
    to_xml::scalar_text,
};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Reinjects recorded attributes into an exported model mapping, in place.
///
/// Attribute lookup per field prefers a table entry keyed by the field's
/// alias, falling back to one keyed by its declared name. Each table path is
/// applied at most once, but every record at an applied path attaches as its
/// own `@` key.
pub fn reinject(
    fields: &'static [Field],
    map: &mut Map<String, Value>,
    table: &AttributeTable,
    prefix: &Path,
) {
    let mut applied = HashSet::new();
    reinject_at(fields, map, table, prefix, &mut applied);
}

fn reinject_at(
    fields: &'static [Field],
    map: &mut Map<String, Value>,
    table: &AttributeTable,
    prefix: &Path,
    applied: &mut HashSet<Path>,
) {
    for field in fields {
        let Some(value) = map.get_mut(field.alias) else {
            continue;
        };

        match value {
            Value::Object(nested) => {
                if let Some(sub_fields) = field.kind.model_fields() {
                    reinject_at(
                        sub_fields,
                        nested,
                        table,
                        &prefix.child(field.alias),
                        applied,
                    );
                }
                if let Some(attributes) = lookup(field, prefix, None, table, applied) {
                    attach(nested, attributes);
                }
            }

            Value::Array(items) => {
                let element_fields = field.kind.list_element().and_then(|k| k.model_fields());

                for (index, item) in items.iter_mut().enumerate() {
                    match item {
                        Value::Object(nested) => {
                            if let Some(sub_fields) = element_fields {
                                reinject_at(
                                    sub_fields,
                                    nested,
                                    table,
                                    &prefix.child_indexed(field.alias, index),
                                    applied,
                                );
                            }
                            if let Some(attributes) =
                                lookup(field, prefix, Some(index), table, applied)
                            {
                                attach(nested, attributes);
                            }
                        }

                        scalar => {
                            if let Some(attributes) =
                                lookup(field, prefix, Some(index), table, applied)
                            {
                                *scalar = wrap_scalar(scalar, attributes);
                            }
                        }
                    }
                }
            }

            scalar => {
                if let Some(attributes) = lookup(field, prefix, None, table, applied) {
                    *scalar = wrap_scalar(scalar, attributes);
                }
            }
        }
    }
}

/// Finds the attribute records for a field at `prefix`, alias first, declared
/// name second. Marks the winning path as applied; a path already applied is
/// never used twice.
fn lookup<'t>(
    field: &Field,
    prefix: &Path,
    index: Option<usize>,
    table: &'t AttributeTable,
    applied: &mut HashSet<Path>,
) -> Option<&'t [Attribute]> {
    let candidates = [field.alias, field.name].map(|name| match index {
        Some(index) => prefix.child_indexed(name, index),
        None => prefix.child(name),
    });

    for path in candidates {
        if applied.contains(&path) {
            return None;
        }
        if let Some(attributes) = table.get(&path) {
            applied.insert(path);
            return Some(attributes);
        }
    }
    None
}

fn attach(map: &mut Map<String, Value>, attributes: &[Attribute]) {
    for attribute in attributes {
        map.insert(
            attribute.document_key(),
            Value::String(attribute.value().to_string()),
        );
    }
}

fn wrap_scalar(scalar: &Value, attributes: &[Attribute]) -> Value {
    let mut map = Map::new();

    // An empty scalar stays an empty element; a `#text` key, even empty,
    // would force the writer into the open/close form
    let text = scalar_text(scalar);
    if !text.is_empty() {
        map.insert(TEXT_KEY.to_string(), Value::String(text));
    }

    attach(&mut map, attributes);
    Value::Object(map)
}
