//! # xmlbind
//!
//! An XML (de)serialization layer for serde-modelled types.
//!
//! XML documents and typed models disagree about three things this crate
//! reconciles:
//!
//! - **Attributes** have no place in a field mapping. On parse they are
//!   stripped into an [`AttributeTable`], keyed by the [`Path`] of the owning
//!   element; on generate they are reinjected at the same paths.
//! - **Cardinality**: a document cannot distinguish one child element from a
//!   list field holding one element. Fields the schema declares list-typed
//!   are rewritten into one-element lists, with buffered attribute paths
//!   renumbered to match.
//! - **Typing**: XML text is untyped. Scalar kinds declared in the field
//!   schema drive text coercion before model construction.
//!
//! | XML | Model |
//! |-----|-------|
//! | `<Name id="123">test</Name>` | `name: "test"` + table entry `Name: [id=123]` |
//! | `<items><id>1</id></items>` at a list field | `items: [Item { id: 1 }]` |
//! | `<note/>` | `note: None` |
//!
//! ## Usage
//!
//! Model types derive serde as usual and implement [`XmlModel`] to describe
//! their fields:
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use xmlbind::{Attribute, Field, FieldKind, GenerateOptions, Path, XmlConverter, XmlModel};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct Model {
//!     #[serde(rename = "Name")]
//!     name: String,
//!     age: i64,
//! }
//!
//! impl XmlModel for Model {
//!     fn root_name() -> &'static str {
//!         "Model"
//!     }
//!
//!     fn fields() -> &'static [Field] {
//!         const FIELDS: &[Field] = &[
//!             Field::new("name", "Name", FieldKind::String),
//!             Field::new("age", "age", FieldKind::Integer),
//!         ];
//!         FIELDS
//!     }
//! }
//!
//! let mut converter = XmlConverter::new();
//! let model: Model = converter
//!     .parse(r#"<Model><Name id="123">test</Name><age custom="value">12</age></Model>"#)
//!     .unwrap();
//! assert_eq!(model.name, "test");
//!
//! converter.set_attribute(Path::field("age"), Attribute::new("unit", "years"));
//!
//! let xml = converter
//!     .generate_xml(&model, &GenerateOptions { declaration: false, ..Default::default() })
//!     .unwrap();
//! assert_eq!(
//!     xml,
//!     r#"<Model><Name id="123">test</Name><age custom="value" unit="years">12</age></Model>"#
//! );
//! ```
//!
//! The document codec ([`doc`] and [`to_xml`]) and the conversion passes
//! ([`normalize`], [`cardinality`], [`prune`], [`reinject`]) are public for
//! callers that want to run the pipeline piecemeal; [`XmlConverter`] is the
//! assembled version.
//!
//! Conversion is purely sequential and CPU-bound; a converter holds no locks
//! and must not be mutated from multiple threads without external
//! synchronization.
#![warn(missing_docs)]

mod error;
pub use error::{XmlError, XmlResult};

mod path;
pub use path::{Path, PathSegment};

mod attr;
pub use attr::{ATTRIBUTE_MARKER, Attribute, AttributeTable, TEXT_KEY};

mod schema;
pub use schema::{Field, FieldKind, XmlModel, collect_list_fields};

pub mod doc;
pub mod to_xml;
pub use to_xml::WriteOptions;

pub mod cardinality;
pub mod normalize;
pub mod prune;
pub mod reinject;

mod convert;
pub use convert::{GenerateOptions, XmlConverter};
