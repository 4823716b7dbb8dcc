//! Attribute records and the path-addressed attribute table.
//!
//! XML attributes have no place in a plain field mapping, so the normalizer
//! strips them out and records them here, keyed by the path of the element
//! that owned them. The reinjector consumes the table when the model is
//! serialized back to XML.

use crate::Path;

/// The marker prefix distinguishing attribute keys from element keys in a
/// document tree mapping.
pub const ATTRIBUTE_MARKER: char = '@';

/// The reserved mapping key holding an element's text content.
pub const TEXT_KEY: &str = "#text";

/// A single document attribute, immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    key: String,
    value: String,
}
impl Attribute {
    /// Creates a new attribute record.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// The attribute name, without the marker prefix.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The attribute value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The mapping key this attribute renders to in a document tree,
    /// e.g. `@id` for an attribute named `id`.
    #[must_use]
    pub fn document_key(&self) -> String {
        format!("{ATTRIBUTE_MARKER}{}", self.key)
    }
}

/// An ordered mapping from [`Path`] to the attributes attached at that path.
///
/// The table is built fresh per parse and consumed in full on generate.
/// Entries at one path keep first-encounter order; [`AttributeTable::append`]
/// never overwrites prior records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeTable {
    // Tables are small (one entry per attributed element), so entries are kept
    // in a flat list preserving first-encounter order.
    entries: Vec<(Path, Vec<Attribute>)>,
}
impl AttributeTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an attribute at `path`, after any records already there.
    pub fn append(&mut self, path: Path, attribute: Attribute) {
        self.records_at(path).push(attribute);
    }

    /// Returns the attributes recorded at `path`, if any.
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&[Attribute]> {
        self.entries
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, a)| a.as_slice())
    }

    /// True if any attributes are recorded at `path`.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.iter().any(|(p, _)| p == path)
    }

    /// True if the table holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The number of paths with recorded attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Folds `other` into this table. Records at a path both tables know are
    /// concatenated, not overwritten.
    pub fn merge(&mut self, other: AttributeTable) {
        for (path, attributes) in other.entries {
            self.records_at(path).extend(attributes);
        }
    }

    /// Rewrites every path at or under `prefix` to address element `index` of
    /// the field `prefix` names.
    ///
    /// Called when the cardinality corrector turns a singleton mapping into a
    /// one-element list: `sub.items` and `sub.items.id` become `sub.items[0]`
    /// and `sub.items[0].id`. Paths already carrying an index there are left
    /// alone.
    pub fn insert_index(&mut self, prefix: &Path, index: usize) {
        if prefix.is_root() {
            return;
        }

        let position = prefix.len() - 1;
        for (path, _) in &mut self.entries {
            if path.starts_with_unindexed(prefix) {
                path.set_index(position, index);
            }
        }
    }

    /// Iterates over `(path, attributes)` entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &[Attribute])> {
        self.entries.iter().map(|(p, a)| (p, a.as_slice()))
    }

    fn records_at(&mut self, path: Path) -> &mut Vec<Attribute> {
        if let Some(position) = self.entries.iter().position(|(p, _)| *p == path) {
            &mut self.entries[position].1
        } else {
            self.entries.push((path, Vec::new()));
            &mut self.entries.last_mut().expect("just pushed").1
        }
    }
}
