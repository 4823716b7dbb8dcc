//! Static field schemas for bound model types.
//!
//! Conversion needs three things serde cannot tell it at runtime: the
//! document-facing alias of each field, whether a field is list-typed (for
//! cardinality correction), and the scalar type of each leaf (XML text is
//! untyped, so `12` must become a number before model construction). Each
//! model type declares this once as a static [`Field`] slice.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::collections::BTreeSet;

/// A model type that can be bound to XML.
///
/// The type's serde field renames must match the aliases declared in
/// [`XmlModel::fields`], since exported mappings are keyed by serde name.
///
/// # Example
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use xmlbind::{Field, FieldKind, XmlModel};
///
/// #[derive(Debug, Serialize, Deserialize)]
/// struct Model {
///     #[serde(rename = "Name")]
///     name: String,
///     age: i64,
/// }
///
/// impl XmlModel for Model {
///     fn root_name() -> &'static str {
///         "Model"
///     }
///
///     fn fields() -> &'static [Field] {
///         const FIELDS: &[Field] = &[
///             Field::new("name", "Name", FieldKind::String),
///             Field::new("age", "age", FieldKind::Integer),
///         ];
///         FIELDS
///     }
/// }
/// ```
pub trait XmlModel: Serialize + DeserializeOwned {
    /// The name of the document root element for this model.
    fn root_name() -> &'static str;

    /// The field schema for this model, in declaration order.
    fn fields() -> &'static [Field];
}

/// Schema entry for one model field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// The declared (Rust-side) field name
    pub name: &'static str,

    /// The document-facing alias; equal to `name` when the field is not renamed
    pub alias: &'static str,

    /// The declared type of the field
    pub kind: FieldKind,
}
impl Field {
    /// Creates a new field schema entry.
    #[must_use]
    pub const fn new(name: &'static str, alias: &'static str, kind: FieldKind) -> Self {
        Self { name, alias, kind }
    }
}

/// The declared type of a field, as far as conversion needs to know it.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// A text scalar; document text is taken as-is
    String,

    /// An integer scalar; document text is coerced with `str::parse`
    Integer,

    /// A floating-point scalar
    Float,

    /// A boolean scalar; `true`/`false` document text
    Boolean,

    /// A nested model. The function returns the nested type's field schema;
    /// indirection through a function keeps mutually-nested schemas buildable
    /// in constants.
    Model(fn() -> &'static [Field]),

    /// A repeated field holding elements of the inner kind
    List(&'static FieldKind),

    /// An optional field holding the inner kind when present
    Optional(&'static FieldKind),
}
// Not derived: deriving over the `Model` fn pointer compares addresses, which
// codegen can duplicate or merge. Address identity is still the right notion
// of "same schema" here, so the comparison goes through `fn_addr_eq`.
impl PartialEq for FieldKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::String, Self::String)
            | (Self::Integer, Self::Integer)
            | (Self::Float, Self::Float)
            | (Self::Boolean, Self::Boolean) => true,
            (Self::Model(a), Self::Model(b)) => std::ptr::fn_addr_eq(*a, *b),
            (Self::List(a), Self::List(b)) | (Self::Optional(a), Self::Optional(b)) => a == b,
            _ => false,
        }
    }
}
impl Eq for FieldKind {}

impl FieldKind {
    /// The kind with any `Optional` wrapper removed.
    #[must_use]
    pub fn unwrapped(&self) -> &FieldKind {
        match self {
            Self::Optional(inner) => inner.unwrapped(),
            other => other,
        }
    }

    /// The nested model schema, if this kind is (an optional) nested model.
    #[must_use]
    pub fn model_fields(&self) -> Option<&'static [Field]> {
        match self.unwrapped() {
            Self::Model(fields) => Some(fields()),
            _ => None,
        }
    }

    /// The element kind, if this kind is (an optional) list.
    #[must_use]
    pub fn list_element(&self) -> Option<&'static FieldKind> {
        match self.unwrapped() {
            Self::List(inner) => Some(inner),
            _ => None,
        }
    }
}

/// Collects the aliases of every list-typed field reachable from `fields`,
/// recursing into nested models.
///
/// The result is keyed by field name alone, not by path: two differently
/// nested fields sharing an alias are treated identically by the cardinality
/// corrector even if only one of them is list-typed at its position. This is
/// a deliberate, document-level heuristic; matching by full path would change
/// round-trip behavior for schemas reusing a field name in non-list contexts.
#[must_use]
pub fn collect_list_fields(fields: &'static [Field]) -> BTreeSet<&'static str> {
    let mut names = BTreeSet::new();
    let mut pending = vec![fields];
    let mut seen: Vec<*const Field> = Vec::new();

    while let Some(fields) = pending.pop() {
        // Guard against mutually-nested model schemas
        if seen.contains(&fields.as_ptr()) {
            continue;
        }
        seen.push(fields.as_ptr());

        for field in fields {
            let kind = field.kind.unwrapped();
            if let FieldKind::List(element) = kind {
                names.insert(field.alias);
                if let Some(nested) = element.model_fields() {
                    pending.push(nested);
                }
            } else if let Some(nested) = kind.model_fields() {
                pending.push(nested);
            }
        }
    }

    names
}

/// Coerces scalar text in a cleaned mapping to the types the schema declares,
/// recursing into nested models and list elements.
///
/// Text that does not parse is left untouched; model construction will then
/// surface the mismatch as a validation error.
pub fn coerce_scalars(value: &mut Value, fields: &'static [Field]) {
    let Value::Object(map) = value else { return };

    for field in fields {
        if let Some(entry) = map.get_mut(field.alias) {
            coerce_entry(entry, field.kind.unwrapped());
        }
    }
}

fn coerce_entry(value: &mut Value, kind: &FieldKind) {
    match kind {
        FieldKind::Integer => {
            if let Value::String(text) = value
                && let Ok(number) = text.parse::<i64>()
            {
                *value = Value::Number(number.into());
            }
        }

        FieldKind::Float => {
            if let Value::String(text) = value
                && let Ok(number) = text.parse::<f64>()
                && let Some(number) = serde_json::Number::from_f64(number)
            {
                *value = Value::Number(number);
            }
        }

        FieldKind::Boolean => {
            if let Value::String(text) = value
                && let Ok(flag) = text.parse::<bool>()
            {
                *value = Value::Bool(flag);
            }
        }

        FieldKind::Model(fields) => coerce_scalars(value, fields()),

        FieldKind::List(element) => {
            if let Value::Array(items) = value {
                for item in items {
                    coerce_entry(item, element.unwrapped());
                }
            }
        }

        FieldKind::Optional(inner) => coerce_entry(value, inner.unwrapped()),

        FieldKind::String => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item_fields() -> &'static [Field] {
        const FIELDS: &[Field] = &[
            Field::new("id", "id", FieldKind::Integer),
            Field::new("tags", "tags", FieldKind::List(&FieldKind::String)),
        ];
        FIELDS
    }

    fn root_fields() -> &'static [Field] {
        const FIELDS: &[Field] = &[
            Field::new("name", "Name", FieldKind::String),
            Field::new("age", "age", FieldKind::Integer),
            Field::new(
                "items",
                "Items",
                FieldKind::List(&FieldKind::Model(item_fields)),
            ),
            Field::new(
                "child",
                "Child",
                FieldKind::Optional(&FieldKind::Model(item_fields)),
            ),
        ];
        FIELDS
    }

    #[test]
    fn test_field_kind_equality() {
        assert_eq!(FieldKind::Model(item_fields), FieldKind::Model(item_fields));
        assert_ne!(FieldKind::Model(item_fields), FieldKind::Model(root_fields));
        assert_eq!(
            FieldKind::List(&FieldKind::String),
            FieldKind::List(&FieldKind::String)
        );
        assert_ne!(FieldKind::Integer, FieldKind::Optional(&FieldKind::Integer));
    }

    #[test]
    fn test_collect_list_fields() {
        let names = collect_list_fields(root_fields());
        assert!(names.contains("Items"));
        assert!(names.contains("tags"));
        assert!(!names.contains("Name"));
    }

    #[test]
    fn test_coerce_scalars() {
        let mut value = json!({
            "Name": "test",
            "age": "12",
            "Items": [{"id": "7", "tags": ["a"]}],
            "Child": {"id": "9"},
        });

        coerce_scalars(&mut value, root_fields());
        assert_eq!(
            value,
            json!({
                "Name": "test",
                "age": 12,
                "Items": [{"id": 7, "tags": ["a"]}],
                "Child": {"id": 9},
            })
        );
    }

    #[test]
    fn test_coerce_leaves_bad_text() {
        let mut value = json!({ "age": "twelve" });
        coerce_scalars(&mut value, root_fields());
        assert_eq!(value, json!({ "age": "twelve" }));
    }
}
