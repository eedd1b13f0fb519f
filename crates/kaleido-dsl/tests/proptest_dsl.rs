use proptest::prelude::*;
use kaleido_core::types::*;
use kaleido_dsl::{parse, print_document};

/// Strategy for generating model names.
fn model_name() -> impl Strategy<Value = String> {
    "[A-Z][a-zA-Z0-9]{0,12}"
}

/// Strategy for generating field names that are not the shorthand keyword.
fn field_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,12}".prop_filter("not the timestamps shorthand", |s| s != "timestamps")
}

fn field_type() -> impl Strategy<Value = FieldType> {
    prop_oneof![
        (0usize..PrimitiveType::ALL.len()).prop_map(|i| FieldType::from(PrimitiveType::ALL[i])),
        prop_oneof![Just("text"), Just("bigint"), Just("uuid"), Just("varchar")]
            .prop_map(FieldType::from_name),
        model_name().prop_map(|n| FieldType::BelongsTo(ModelName::new(n).unwrap())),
    ]
}

fn attributes() -> impl Strategy<Value = AttributeSet> {
    (
        prop::sample::subsequence(
            vec![
                Attribute::Primary,
                Attribute::Unique,
                Attribute::Nullable,
                Attribute::AutoIncrement,
            ],
            0..=4,
        ),
        prop::option::of("[a-zA-Z0-9'_ .-]{0,10}"),
    )
        .prop_map(|(mut flags, default)| {
            if let Some(value) = default.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
                flags.push(Attribute::Default(value));
            }
            AttributeSet::from_attributes(flags).unwrap()
        })
}

fn model() -> impl Strategy<Value = Model> {
    (
        model_name(),
        prop::collection::btree_map(field_name(), (field_type(), attributes()), 0..6),
    )
        .prop_map(|(name, fields)| {
            let fields = fields
                .into_iter()
                .map(|(n, (ty, attrs))| Field::with_attributes(FieldName::new(n).unwrap(), ty, attrs))
                .collect();
            Model::new(ModelName::new(name).unwrap(), fields).unwrap()
        })
}

fn document() -> impl Strategy<Value = SchemaDocument> {
    prop::collection::vec(model(), 0..4).prop_map(|models| {
        let mut doc = SchemaDocument::new();
        for m in models {
            if !doc.contains(m.name.as_str()) {
                doc.insert(m).unwrap();
            }
        }
        doc
    })
}

proptest! {
    /// Printing then parsing any valid document gives it back unchanged.
    #[test]
    fn print_then_parse_is_identity(doc in document()) {
        let printed = print_document(&doc);
        let parsed = parse(&printed);
        prop_assert!(parsed.is_ok(), "failed to parse:\n{printed}");
        prop_assert_eq!(parsed.unwrap(), doc);
    }

    /// The lexer and parser never panic on arbitrary input.
    #[test]
    fn parser_never_panics(input in "\\PC{0,200}") {
        let _ = parse(&input);
    }

    /// Arbitrary text inside a block either parses or fails cleanly.
    #[test]
    fn block_contents_never_panic(body in "[a-z:@(){}# \n]{0,80}") {
        let _ = parse(&format!("model A {{\n{body}\n}}"));
    }

    /// A valid minimal model always parses.
    #[test]
    fn minimal_model_always_parses(name in model_name(), field in field_name(), ty in field_type()) {
        let source = format!("model {name} {{\n    {field}: {ty}\n}}");
        let doc = parse(&source);
        prop_assert!(doc.is_ok(), "failed to parse: {source}");
        let doc = doc.unwrap();
        prop_assert_eq!(doc.get(&name).unwrap().field(&field).unwrap().field_type.clone(), ty);
    }
}
