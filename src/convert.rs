//! The converter: parse and generate pipelines around one attribute table.
//!
//! A [`XmlConverter`] owns exactly one [`AttributeTable`]. `parse` rebuilds
//! the table wholesale from the document; `generate` consumes it read-only.
//! Keeping the table an explicit value on the converter, rather than hidden
//! state on each model instance, keeps every conversion step pure and lets
//! callers inspect or replace the table between calls.
//!
//! A converter is a single-writer, single-reader value: share one across
//! threads only behind external locking.

use crate::{
    Path, cardinality,
    attr::{Attribute, AttributeTable},
    doc,
    error::{XmlError, XmlResult},
    normalize::normalize,
    prune::{PruneMode, prune},
    reinject::reinject,
    schema::{XmlModel, coerce_scalars, collect_list_fields},
    to_xml::{self, WriteOptions},
};
use serde_json::{Map, Value};

/// Options controlling [`XmlConverter::generate`] output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Drop null fields (and mappings emptied by the drop) from the output
    pub strip_nulls: bool,

    /// Wrap the exported mapping in a root element named after the model type
    pub include_root: bool,

    /// Indent the generated XML with tabs
    pub pretty: bool,

    /// Emit an `<?xml ...?>` declaration
    pub declaration: bool,
}
impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            strip_nulls: false,
            include_root: true,
            pretty: false,
            declaration: true,
        }
    }
}
impl GenerateOptions {
    fn write_options(&self) -> WriteOptions {
        WriteOptions {
            declaration: self.declaration,
            indent: self.pretty.then(|| "\t".to_string()),
        }
    }
}

/// Converts between XML documents and model values, carrying the attribute
/// table between the two directions.
///
/// # Example
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use xmlbind::{Field, FieldKind, GenerateOptions, XmlConverter, XmlModel};
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
///
/// let xml = r#"<Model><Name id="123">test</Name><age>12</age></Model>"#;
///
/// let mut converter = XmlConverter::new();
/// let model: Model = converter.parse(xml).unwrap();
/// assert_eq!(model.name, "test");
/// assert_eq!(model.age, 12);
///
/// let out = converter
///     .generate_xml(&model, &GenerateOptions { declaration: false, ..Default::default() })
///     .unwrap();
/// assert_eq!(out, xml);
/// ```
#[derive(Debug, Clone, Default)]
pub struct XmlConverter {
    attributes: AttributeTable,
}
impl XmlConverter {
    /// Creates a converter with an empty attribute table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an XML document into a model value, replacing the converter's
    /// attribute table with the attributes found in the document.
    ///
    /// # Errors
    /// Returns a structural error for malformed documents or attributes at
    /// the document root, and a validation error when the cleaned mapping
    /// does not satisfy the model.
    pub fn parse<M: XmlModel>(&mut self, raw: &str) -> XmlResult<M> {
        let document = doc::parse_document(raw)?;

        // The root element is a wrapper; its children are the model fields
        let (cleaned, mut table) = normalize(&document.root, &Path::root())?;

        // An empty root element (`<Model/>`) collapses to absent; model
        // defaults apply just as they do for absent fields
        let mut value = match cleaned {
            Some(Value::Null) | None => Value::Object(Map::new()),
            Some(value) => value,
        };

        let list_fields = collect_list_fields(M::fields());
        cardinality::correct(&mut value, &list_fields, &mut table);

        prune(&mut value, PruneMode::Nulls);
        coerce_scalars(&mut value, M::fields());

        let model = serde_json::from_value(value)?;
        self.attributes = table;
        Ok(model)
    }

    /// Exports a model to a document tree, reinjecting recorded attributes.
    ///
    /// With `include_root` the result is `{ root_name: mapping }`, ready for
    /// the writer; without it, the mapping itself.
    ///
    /// # Errors
    /// Returns a validation error if the model fails to export, and
    /// [`XmlError::NotAMapping`] if it exports to a non-mapping value.
    pub fn generate<M: XmlModel>(&self, model: &M, options: &GenerateOptions) -> XmlResult<Value> {
        let mut map = match serde_json::to_value(model)? {
            Value::Object(map) => map,
            other => return Err(XmlError::NotAMapping(value_kind(&other))),
        };

        reinject(M::fields(), &mut map, &self.attributes, &Path::root());

        let mut value = Value::Object(map);
        if options.strip_nulls {
            prune(&mut value, PruneMode::NullsAndEmpty);
        }

        if options.include_root {
            let mut root = Map::new();
            root.insert(M::root_name().to_string(), value);
            value = Value::Object(root);
        }

        Ok(value)
    }

    /// Generates the XML string for a model. The document is always rooted
    /// at [`XmlModel::root_name`]; `options.include_root` is ignored here.
    ///
    /// Deterministic for the same model state and attribute table.
    ///
    /// # Errors
    /// See [`XmlConverter::generate`].
    pub fn generate_xml<M: XmlModel>(
        &self,
        model: &M,
        options: &GenerateOptions,
    ) -> XmlResult<String> {
        let body = self.generate(
            model,
            &GenerateOptions {
                include_root: false,
                ..options.clone()
            },
        )?;

        let xml = to_xml::to_xml_string(M::root_name(), &body, &options.write_options())?;
        Ok(xml)
    }

    /// Appends an attribute at `path`. Prior records at the same path are
    /// kept; the new record attaches after them.
    pub fn set_attribute(&mut self, path: Path, attribute: Attribute) {
        self.attributes.append(path, attribute);
    }

    /// The converter's current attribute table.
    #[must_use]
    pub fn attributes(&self) -> &AttributeTable {
        &self.attributes
    }

    /// Replaces the attribute table wholesale.
    pub fn set_attributes(&mut self, attributes: AttributeTable) {
        self.attributes = attributes;
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    use crate::schema::{Field, FieldKind};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Model {
        #[serde(rename = "Name")]
        name: String,
        age: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    }

    impl XmlModel for Model {
        fn root_name() -> &'static str {
            "Model"
        }

        fn fields() -> &'static [Field] {
            const FIELDS: &[Field] = &[
                Field::new("name", "Name", FieldKind::String),
                Field::new("age", "age", FieldKind::Integer),
                Field::new("note", "note", FieldKind::Optional(&FieldKind::String)),
            ];
            FIELDS
        }
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sparse {
        #[serde(default)]
        note: Option<String>,
    }

    impl XmlModel for Sparse {
        fn root_name() -> &'static str {
            "Sparse"
        }

        fn fields() -> &'static [Field] {
            const FIELDS: &[Field] =
                &[Field::new("note", "note", FieldKind::Optional(&FieldKind::String))];
            FIELDS
        }
    }

    #[test]
    fn test_parse_empty_root() {
        let mut converter = XmlConverter::new();

        let model: Sparse = converter.parse("<Sparse/>").unwrap();
        assert_eq!(model.note, None);

        let model: Sparse = converter.parse("<Sparse></Sparse>").unwrap();
        assert_eq!(model.note, None);
    }

    #[test]
    fn test_parse_builds_table() {
        let mut converter = XmlConverter::new();
        let model: Model = converter
            .parse(r#"<Model><Name id="123">test</Name><age custom="value">12</age></Model>"#)
            .unwrap();

        assert_eq!(model.name, "test");
        assert_eq!(model.age, 12);
        assert_eq!(model.note, None);

        let table = converter.attributes();
        assert_eq!(
            table.get(&Path::field("Name")),
            Some(&[Attribute::new("id", "123")][..])
        );
        assert_eq!(
            table.get(&Path::field("age")),
            Some(&[Attribute::new("custom", "value")][..])
        );
    }

    #[test]
    fn test_parse_replaces_table() {
        let mut converter = XmlConverter::new();
        converter.set_attribute(Path::field("stale"), Attribute::new("k", "v"));

        let _model: Model = converter
            .parse("<Model><Name>a</Name><age>1</age></Model>")
            .unwrap();
        assert!(!converter.attributes().contains(&Path::field("stale")));
    }

    #[test]
    fn test_parse_validation_error() {
        let mut converter = XmlConverter::new();
        let result: XmlResult<Model> = converter.parse("<Model><Name>a</Name></Model>");
        assert!(matches!(result, Err(XmlError::Validation(_))));
    }

    #[test]
    fn test_parse_root_attribute_error() {
        let mut converter = XmlConverter::new();
        let result: XmlResult<Model> =
            converter.parse(r#"<Model id="1"><Name>a</Name><age>1</age></Model>"#);
        assert!(matches!(result, Err(XmlError::RootAttribute(_))));
    }

    #[test]
    fn test_generate_document_node() {
        let model = Model {
            name: "test".to_string(),
            age: 12,
            note: None,
        };

        let converter = XmlConverter::new();
        let value = converter
            .generate(&model, &GenerateOptions::default())
            .unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "Model": { "Name": "test", "age": 12 } })
        );

        let body = converter
            .generate(
                &model,
                &GenerateOptions {
                    include_root: false,
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(body, serde_json::json!({ "Name": "test", "age": 12 }));
    }

    #[test]
    fn test_set_attribute_appends() {
        let mut converter = XmlConverter::new();
        converter.set_attribute(Path::field("Name"), Attribute::new("a", "1"));
        converter.set_attribute(Path::field("Name"), Attribute::new("a", "2"));

        let records = converter.attributes().get(&Path::field("Name")).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_generate_deterministic() {
        let mut converter = XmlConverter::new();
        let model: Model = converter
            .parse(r#"<Model><Name id="123">test</Name><age>12</age></Model>"#)
            .unwrap();

        let first = converter
            .generate_xml(&model, &GenerateOptions::default())
            .unwrap();
        let second = converter
            .generate_xml(&model, &GenerateOptions::default())
            .unwrap();
        assert_eq!(first, second);
    }
}
