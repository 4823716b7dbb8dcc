use serde::{Deserialize, Serialize};
use xmlbind::{
    Attribute, Field, FieldKind, GenerateOptions, Path, XmlConverter, XmlModel, XmlResult,
};

fn compact() -> GenerateOptions {
    GenerateOptions {
        declaration: false,
        ..Default::default()
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Model {
    #[serde(rename = "Name")]
    name: String,
    age: i64,
    #[serde(default)]
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
struct ListItem {
    id: i64,
}

impl XmlModel for ListItem {
    fn root_name() -> &'static str {
        "ListItem"
    }

    fn fields() -> &'static [Field] {
        const FIELDS: &[Field] = &[Field::new("id", "id", FieldKind::Integer)];
        FIELDS
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Nested {
    #[serde(rename = "SubModel")]
    sub_model: SubModel,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct SubModel {
    #[serde(rename = "ListItem", default)]
    list_item: Vec<ListItem>,
}

impl XmlModel for Nested {
    fn root_name() -> &'static str {
        "Nested"
    }

    fn fields() -> &'static [Field] {
        const FIELDS: &[Field] = &[Field::new(
            "sub_model",
            "SubModel",
            FieldKind::Model(SubModel::fields),
        )];
        FIELDS
    }
}

impl XmlModel for SubModel {
    fn root_name() -> &'static str {
        "SubModel"
    }

    fn fields() -> &'static [Field] {
        const FIELDS: &[Field] = &[Field::new(
            "list_item",
            "ListItem",
            FieldKind::List(&FieldKind::Model(ListItem::fields)),
        )];
        FIELDS
    }
}

#[test]
fn test_original_scenario() {
    // Build the model directly, attach attributes, and generate
    let model = Model {
        name: "test".to_string(),
        age: 12,
        note: None,
    };

    let mut converter = XmlConverter::new();
    // Declared-name path; the reinjector falls back from alias to name
    converter.set_attribute(Path::field("name"), Attribute::new("id", "123"));
    converter.set_attribute(Path::field("age"), Attribute::new("custom", "value"));

    let xml = converter
        .generate_xml(
            &model,
            &GenerateOptions {
                strip_nulls: true,
                declaration: false,
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(
        xml,
        r#"<Model><Name id="123">test</Name><age custom="value">12</age></Model>"#
    );
}

#[test]
fn test_parse_then_generate_is_exact() {
    let src = r#"<Model><Name id="123">test</Name><age custom="value">12</age></Model>"#;

    let mut converter = XmlConverter::new();
    let model: Model = converter.parse(src).unwrap();
    assert_eq!(model.name, "test");
    assert_eq!(model.age, 12);

    assert_eq!(
        converter.attributes().get(&Path::field("Name")),
        Some(&[Attribute::new("id", "123")][..])
    );
    assert_eq!(
        converter.attributes().get(&Path::field("age")),
        Some(&[Attribute::new("custom", "value")][..])
    );

    let xml = converter
        .generate_xml(
            &model,
            &GenerateOptions {
                strip_nulls: true,
                declaration: false,
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(xml, src);
}

#[test]
fn test_empty_element_round_trip() {
    // With null-stripping disabled, an element empty in the source comes back
    let src = "<Model><Name>t</Name><age>1</age><note/></Model>";

    let mut converter = XmlConverter::new();
    let model: Model = converter.parse(src).unwrap();
    assert_eq!(model.note, None);

    let xml = converter.generate_xml(&model, &compact()).unwrap();
    assert_eq!(xml, src);

    // With null-stripping enabled, the empty element is pruned
    let stripped = converter
        .generate_xml(
            &model,
            &GenerateOptions {
                strip_nulls: true,
                declaration: false,
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(stripped, "<Model><Name>t</Name><age>1</age></Model>");
}

#[test]
fn test_attributed_empty_element_round_trip() {
    // The element is empty so the field defaults, but the attribute is
    // recorded and must come back on the same self-closing form
    let src = r#"<Model><Name>t</Name><age>1</age><note id="9"/></Model>"#;

    let mut converter = XmlConverter::new();
    let model: Model = converter.parse(src).unwrap();
    assert_eq!(model.note, None);
    assert_eq!(
        converter.attributes().get(&Path::field("note")),
        Some(&[Attribute::new("id", "9")][..])
    );

    let xml = converter.generate_xml(&model, &compact()).unwrap();
    assert_eq!(xml, src);
}

#[test]
fn test_nested_list_attributes() {
    // Each ListItem's attributes attach to the correct index, and SomeId
    // attaches to SubModel itself, not to any child
    let src = concat!(
        r#"<Nested><SubModel SomeId="1234">"#,
        r#"<ListItem id="1234" name="test"><id>1</id></ListItem>"#,
        r#"<ListItem><id>2</id></ListItem>"#,
        r#"</SubModel></Nested>"#,
    );

    let mut converter = XmlConverter::new();
    let model: Nested = converter.parse(src).unwrap();
    assert_eq!(model.sub_model.list_item.len(), 2);

    let sub = Path::field("SubModel");
    assert_eq!(
        converter.attributes().get(&sub),
        Some(&[Attribute::new("SomeId", "1234")][..])
    );
    assert_eq!(
        converter.attributes().get(&sub.child_indexed("ListItem", 0)),
        Some(&[Attribute::new("id", "1234"), Attribute::new("name", "test")][..])
    );

    let xml = converter.generate_xml(&model, &compact()).unwrap();
    assert_eq!(xml, src);
}

#[test]
fn test_singleton_list_normalization() {
    let src = r#"<Nested><SubModel><ListItem id="7"><id>1</id></ListItem></SubModel></Nested>"#;

    let mut converter = XmlConverter::new();
    let model: Nested = converter.parse(src).unwrap();

    // One nested element at a list-typed field becomes a one-element list
    assert_eq!(model.sub_model.list_item, vec![ListItem { id: 1 }]);

    // The attribute path was renumbered to the new [0] index
    let indexed = Path::field("SubModel").child_indexed("ListItem", 0);
    assert_eq!(
        converter.attributes().get(&indexed),
        Some(&[Attribute::new("id", "7")][..])
    );

    // And the attribute reattaches to the same logical element
    let xml = converter.generate_xml(&model, &compact()).unwrap();
    assert_eq!(xml, src);
}

#[test]
fn test_absent_list_field_stays_absent() {
    let mut converter = XmlConverter::new();
    let model: Nested = converter
        .parse("<Nested><SubModel><x>1</x></SubModel></Nested>")
        .unwrap();
    assert!(model.sub_model.list_item.is_empty());
}

#[test]
fn test_repeated_elements_form_list() {
    let mut converter = XmlConverter::new();
    let model: Nested = converter
        .parse(concat!(
            "<Nested><SubModel>",
            "<ListItem><id>1</id></ListItem>",
            "<ListItem><id>2</id></ListItem>",
            "<ListItem><id>3</id></ListItem>",
            "</SubModel></Nested>",
        ))
        .unwrap();
    assert_eq!(model.sub_model.list_item.len(), 3);
}

#[test]
fn test_declaration_emitted_by_default() {
    let model = Model {
        name: "a".to_string(),
        age: 1,
        note: None,
    };

    let converter = XmlConverter::new();
    let xml = converter
        .generate_xml(&model, &GenerateOptions::default())
        .unwrap();
    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
}

#[test]
fn test_root_attribute_is_fatal() {
    let mut converter = XmlConverter::new();
    let result: XmlResult<Model> =
        converter.parse(r#"<Model id="1"><Name>a</Name><age>1</age></Model>"#);
    assert!(result.is_err());
}

#[test]
fn test_validation_error_propagates() {
    let mut converter = XmlConverter::new();
    let result: XmlResult<Model> = converter.parse("<Model><Name>a</Name></Model>");
    assert!(result.is_err());
}
