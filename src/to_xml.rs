//! XML formatting module
//!
//! Renders a document tree value back to XML text: `@`-prefixed keys as
//! element attributes in mapping order, the reserved `#text` key as text
//! content, lists as repeated sibling elements, and null as an empty element.

use crate::attr::{ATTRIBUTE_MARKER, TEXT_KEY};
use htmlentity::entity::ICodedDataTrait;
use htmlentity::entity::{CharacterSet, EncodeType, encode};
use serde_json::{Map, Value};

const TAB: &str = "\t";

/// Formatting options for [`write_xml`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Emit an `<?xml ...?>` declaration before the root element
    pub declaration: bool,

    /// Indent nested elements with the given string; `None` writes the whole
    /// document on one line
    pub indent: Option<String>,
}
impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            declaration: true,
            indent: None,
        }
    }
}
impl WriteOptions {
    /// Options for a pretty-printed document, indented with tabs.
    #[must_use]
    pub fn pretty() -> Self {
        Self {
            declaration: true,
            indent: Some(TAB.to_string()),
        }
    }
}

/// Writes a document tree as XML using the given writer.
///
/// `name` is the root element name; `value` its tree value.
///
/// # Errors
/// This function will return an error if the writer fails, or if a string in
/// the document cannot be entity encoded.
pub fn write_xml(
    writer: &mut dyn std::io::Write,
    name: &str,
    value: &Value,
    options: &WriteOptions,
) -> std::io::Result<()> {
    if options.declaration {
        writer.write_all(br#"<?xml version="1.0" encoding="utf-8"?>"#)?;
        if options.indent.is_some() {
            writer.write_all(b"\n")?;
        }
    }

    write_element(writer, name, value, options.indent.as_deref(), 0)?;
    Ok(())
}

/// Convenience wrapper around [`write_xml`] producing a `String`.
///
/// # Errors
/// See [`write_xml`].
pub fn to_xml_string(name: &str, value: &Value, options: &WriteOptions) -> std::io::Result<String> {
    let mut buffer = vec![];
    write_xml(&mut buffer, name, value, options)?;

    let buffer = String::from_utf8(buffer).map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Failed to convert to UTF-8: {e}"),
        )
    })?;
    Ok(buffer)
}

fn write_element(
    writer: &mut dyn std::io::Write,
    name: &str,
    value: &Value,
    indent: Option<&str>,
    depth: usize,
) -> std::io::Result<()> {
    // A list at element position means repeated siblings of the same name
    if let Value::Array(items) = value {
        for item in items {
            write_element(writer, name, item, indent, depth)?;
        }
        return Ok(());
    }

    let tab = indent.map(|t| t.repeat(depth)).unwrap_or_default();
    let encoded_name = encode_entities(name)?;
    writer.write_all(format!("{tab}<{encoded_name}").as_bytes())?;

    let (attributes, text, children) = match value {
        Value::Object(map) => split_entries(map),
        // Null is an empty element, not an element with empty text; it must
        // take the self-closing branch below
        Value::Null => (vec![], None, vec![]),
        other => (vec![], Some(scalar_text(other)), vec![]),
    };

    for (key, value) in attributes {
        let key = encode_entities(key)?;
        let value = encode_entities(&scalar_text(value))?;
        writer.write_all(format!(r#" {key}="{value}""#).as_bytes())?;
    }

    if text.is_none() && children.is_empty() {
        writer.write_all(b"/>")?;
        if indent.is_some() {
            writer.write_all(b"\n")?;
        }
        return Ok(());
    }

    writer.write_all(b">")?;

    if let Some(text) = &text {
        writer.write_all(encode_entities(text)?.as_bytes())?;
    }

    if !children.is_empty() {
        if indent.is_some() {
            writer.write_all(b"\n")?;
        }
        for (key, value) in children {
            write_element(writer, key, value, indent, depth + 1)?;
        }
        writer.write_all(tab.as_bytes())?;
    }

    writer.write_all(format!("</{encoded_name}>").as_bytes())?;
    if indent.is_some() {
        writer.write_all(b"\n")?;
    }
    Ok(())
}

type Entries<'a> = Vec<(&'a str, &'a Value)>;

/// Splits a mapping into attribute entries, text content, and child elements.
fn split_entries(map: &Map<String, Value>) -> (Entries<'_>, Option<String>, Entries<'_>) {
    let mut attributes = vec![];
    let mut text = None;
    let mut children = vec![];

    for (key, value) in map {
        if let Some(attr_key) = key.strip_prefix(ATTRIBUTE_MARKER) {
            attributes.push((attr_key, value));
        } else if key == TEXT_KEY {
            text = Some(scalar_text(value));
        } else {
            children.push((key.as_str(), value));
        }
    }

    (attributes, text, children)
}

/// Text rendering of a scalar tree value.
pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn encode_entities(input: &str) -> std::io::Result<String> {
    encode(
        input.as_bytes(),
        &EncodeType::NamedOrHex,
        &CharacterSet::SpecialChars,
    )
    .to_string()
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}
