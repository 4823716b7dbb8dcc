//! XML parsing into the document tree shape.
//!
//! Elements become mappings: attributes as `@`-prefixed keys, text content
//! under the reserved `#text` key, child elements under their own names.
//! Repeated sibling elements collapse into a list. An element with a lone
//! text child becomes the text scalar directly, and an empty element becomes
//! null. This is the shape the [normalizer](crate::normalize) consumes.
//!
//! Comments and processing instructions are skipped; namespace prefixes are
//! kept as part of the element name. DTDs and CDATA are not supported.

use crate::{
    attr::{ATTRIBUTE_MARKER, TEXT_KEY},
    error::{XmlError, XmlResult},
};
use htmlentity::entity::ICodedDataTrait;
use serde_json::{Map, Value};
use xmlparser::{ElementEnd, Token};

/// A parsed document: the root element's name and its tree value.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    /// Name of the root element
    pub root_name: String,

    /// Tree value of the root element
    pub root: Value,
}

/// Parses an XML string into its document tree.
///
/// # Errors
/// Returns errors for malformed XML: unclosed or mismatched tags, a missing
/// root element, or tokens the document shape does not allow.
///
/// # Example
/// ```rust
/// use xmlbind::doc::parse_document;
///
/// let doc = parse_document(r#"<a><b id="1">text</b></a>"#).unwrap();
/// assert_eq!(doc.root_name, "a");
/// assert_eq!(doc.root["b"]["@id"], "1");
/// assert_eq!(doc.root["b"]["#text"], "text");
/// ```
pub fn parse_document(source: &str) -> XmlResult<RawDocument> {
    let mut tokenizer = xmlparser::Tokenizer::from(source);
    let mut stack: Vec<Frame> = vec![];
    let mut root: Option<(String, Value)> = None;

    loop {
        let Some(next) = tokenizer.next() else {
            break;
        };
        let next = next?;

        match next {
            Token::ElementStart { prefix, local, .. } => {
                if root.is_some() {
                    return Err(XmlError::UnexpectedToken("element after document root"));
                }
                stack.push(Frame::new(full_name(prefix.as_str(), local.as_str())));
            }

            Token::Attribute {
                prefix,
                local,
                value,
                ..
            } => {
                let Some(frame) = stack.last_mut() else {
                    return Err(XmlError::UnexpectedToken("attribute"));
                };

                let key = format!(
                    "{ATTRIBUTE_MARKER}{}",
                    full_name(prefix.as_str(), local.as_str())
                );
                frame
                    .map
                    .insert(key, Value::String(decode_entities(value.as_str())?));
            }

            Token::ElementEnd {
                end: ElementEnd::Open,
                ..
            } => {}

            Token::ElementEnd {
                end: ElementEnd::Empty,
                ..
            } => {
                let Some(frame) = stack.pop() else {
                    return Err(XmlError::UnexpectedToken("element end"));
                };
                close_frame(frame, &mut stack, &mut root);
            }

            Token::ElementEnd {
                end: ElementEnd::Close(prefix, local),
                ..
            } => {
                let Some(frame) = stack.pop() else {
                    return Err(XmlError::UnexpectedToken("closing tag"));
                };

                let name = full_name(prefix.as_str(), local.as_str());
                if frame.name != name {
                    return Err(XmlError::MismatchedTag {
                        expected: frame.name,
                        found: name,
                    });
                }

                close_frame(frame, &mut stack, &mut root);
            }

            Token::Text { text } => {
                let text = text.as_str().trim();
                if text.is_empty() {
                    continue;
                }

                let Some(frame) = stack.last_mut() else {
                    return Err(XmlError::UnexpectedToken("text outside the root element"));
                };
                frame.push_text(&decode_entities(text)?);
            }

            // The declaration carries no tree content
            Token::Declaration { .. } => {}

            // Out of scope for the document shape; skipped rather than rejected
            Token::Comment { .. } | Token::ProcessingInstruction { .. } => {}

            Token::Cdata { .. } | Token::DtdStart { .. } | Token::EmptyDtd { .. } => {
                return Err(XmlError::UnexpectedToken("CDATA or DTD section"));
            }

            Token::DtdEnd { .. } | Token::EntityDeclaration { .. } => {
                return Err(XmlError::UnexpectedToken("DTD content"));
            }
        }
    }

    if let Some(frame) = stack.pop() {
        return Err(XmlError::UnclosedTag(frame.name));
    }

    let Some((root_name, root)) = root else {
        return Err(XmlError::UnexpectedEof);
    };

    Ok(RawDocument { root_name, root })
}

/// One open element while parsing.
struct Frame {
    name: String,
    map: Map<String, Value>,
    text: Option<String>,
}
impl Frame {
    fn new(name: String) -> Self {
        Self {
            name,
            map: Map::new(),
            text: None,
        }
    }

    fn push_text(&mut self, text: &str) {
        match &mut self.text {
            Some(existing) => {
                // Text split around a child element is rejoined with a space
                existing.push(' ');
                existing.push_str(text);
            }
            None => self.text = Some(text.to_string()),
        }
    }

    /// Collapses the finished frame to its tree value.
    fn into_value(mut self) -> (String, Value) {
        let value = match (self.text, self.map.is_empty()) {
            // Empty element
            (None, true) => Value::Null,

            // Text-only element
            (Some(text), true) => Value::String(text),

            (None, false) => Value::Object(self.map),

            (Some(text), false) => {
                self.map.insert(TEXT_KEY.to_string(), Value::String(text));
                Value::Object(self.map)
            }
        };

        (self.name, value)
    }
}

fn close_frame(frame: Frame, stack: &mut Vec<Frame>, root: &mut Option<(String, Value)>) {
    let (name, value) = frame.into_value();

    let Some(parent) = stack.last_mut() else {
        *root = Some((name, value));
        return;
    };

    // Repeated sibling elements collapse into a list
    match parent.map.get_mut(&name) {
        None => {
            parent.map.insert(name, value);
        }
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
    }
}

fn full_name(prefix: &str, local: &str) -> String {
    if prefix.is_empty() {
        local.to_string()
    } else {
        format!("{prefix}:{local}")
    }
}

pub(crate) fn decode_entities(input: &str) -> XmlResult<String> {
    htmlentity::entity::decode(input.as_bytes())
        .to_string()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
}
