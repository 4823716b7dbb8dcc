//! Tree normalization: document tree in, clean mapping plus attribute table out.
//!
//! The parsed document tree still carries attribute keys (`@id`) and text
//! keys (`#text`) that no model schema knows about. Normalization strips
//! attributes into an [`AttributeTable`] keyed by the path of the owning
//! element, unwraps text content, and collapses empty elements to absent so
//! model defaults apply downstream.

use crate::{
    Path,
    attr::{ATTRIBUTE_MARKER, Attribute, AttributeTable, TEXT_KEY},
    error::{XmlError, XmlResult},
};
use serde_json::{Map, Value};

/// Normalizes a document tree node at `parent_path`.
///
/// Returns the cleaned value, or `None` when the node collapses to absent
/// (an element with no text and no non-attribute children), plus the table
/// of every attribute encountered below this node.
///
/// # Errors
/// Returns [`XmlError::RootAttribute`] if an attribute key appears while
/// `parent_path` is the document root; attributes must have an owning
/// element.
pub fn normalize(node: &Value, parent_path: &Path) -> XmlResult<(Option<Value>, AttributeTable)> {
    let mut table = AttributeTable::new();

    let Value::Object(map) = node else {
        return Ok((Some(node.clone()), table));
    };

    let mut cleaned = Map::new();
    for (key, value) in map {
        if let Some(attr_key) = key.strip_prefix(ATTRIBUTE_MARKER) {
            if parent_path.is_root() {
                return Err(XmlError::RootAttribute(attr_key.to_string()));
            }
            table.append(
                parent_path.clone(),
                Attribute::new(attr_key, crate::to_xml::scalar_text(value)),
            );
            continue;
        }

        if key == TEXT_KEY {
            // A text node does not recurse further; attributes collected so
            // far still apply to the owning element
            return Ok((Some(value.clone()), table));
        }

        match value {
            Value::Object(_) => {
                let (child, sub_table) = normalize(value, &parent_path.child(key))?;
                table.merge(sub_table);
                if let Some(child) = child {
                    cleaned.insert(key.clone(), child);
                }
            }

            Value::Array(items) => {
                let mut list = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    if item.is_object() {
                        let (child, sub_table) =
                            normalize(item, &parent_path.child_indexed(key, index))?;
                        table.merge(sub_table);
                        // Absent elements keep a null placeholder so sibling
                        // indices still line up with recorded attribute paths
                        list.push(child.unwrap_or(Value::Null));
                    } else {
                        list.push(item.clone());
                    }
                }
                cleaned.insert(key.clone(), Value::Array(list));
            }

            _ => {
                cleaned.insert(key.clone(), value.clone());
            }
        }
    }

    if cleaned.is_empty() {
        // An empty element is an absent value, not an empty mapping
        return Ok((None, table));
    }

    Ok((Some(Value::Object(cleaned)), table))
}
