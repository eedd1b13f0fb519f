use std::collections::BTreeSet;

use proptest::prelude::*;
use kaleido_core::diff::diff;
use kaleido_core::types::*;

fn arb_attributes() -> impl Strategy<Value = Vec<Attribute>> {
    prop::sample::subsequence(
        vec![
            Attribute::Primary,
            Attribute::Unique,
            Attribute::Nullable,
            Attribute::AutoIncrement,
            Attribute::Default("0".to_string()),
        ],
        0..=5,
    )
}

fn arb_model(name: String) -> impl Strategy<Value = Model> {
    prop::collection::btree_map("[a-z][a-z0-9_]{0,8}", (0usize..7, arb_attributes()), 0..5)
        .prop_map(move |fields| {
            let fields = fields
                .into_iter()
                .map(|(field, (ty, attrs))| {
                    Field::with_attributes(
                        FieldName::new(field).unwrap(),
                        PrimitiveType::ALL[ty].into(),
                        AttributeSet::from_attributes(attrs).unwrap(),
                    )
                })
                .collect();
            Model::new(ModelName::new(name.clone()).unwrap(), fields).unwrap()
        })
}

fn arb_document() -> impl Strategy<Value = SchemaDocument> {
    prop::collection::btree_set("[A-Z][a-zA-Z0-9]{0,6}", 0..5)
        .prop_flat_map(|names| {
            names
                .into_iter()
                .map(arb_model)
                .collect::<Vec<_>>()
        })
        .prop_map(|models| SchemaDocument::from_models(models).unwrap())
}

fn name_set(doc: &SchemaDocument) -> BTreeSet<String> {
    doc.names().map(|n| n.to_string()).collect()
}

proptest! {
    #[test]
    fn diff_of_identical_documents_is_empty(doc in arb_document()) {
        prop_assert!(diff(&doc, &doc).is_empty());
    }

    #[test]
    fn creates_and_drops_are_set_differences(old in arb_document(), new in arb_document()) {
        let changes = diff(&old, &new);
        let created: BTreeSet<String> = changes.created().map(|n| n.to_string()).collect();
        let dropped: BTreeSet<String> = changes.dropped().map(|n| n.to_string()).collect();
        let expected_created: BTreeSet<String> =
            name_set(&new).difference(&name_set(&old)).cloned().collect();
        let expected_dropped: BTreeSet<String> =
            name_set(&old).difference(&name_set(&new)).cloned().collect();
        prop_assert_eq!(created, expected_created);
        prop_assert_eq!(dropped, expected_dropped);
        for name in changes.updated() {
            prop_assert!(old.contains(name.as_str()) && new.contains(name.as_str()));
        }
    }

    #[test]
    fn attribute_order_does_not_produce_updates(attrs in arb_attributes()) {
        let build = |list: Vec<Attribute>| {
            let field = Field::with_attributes(
                FieldName::new("value").unwrap(),
                PrimitiveType::String.into(),
                AttributeSet::from_attributes(list).unwrap(),
            );
            let model = Model::new(ModelName::new("Item").unwrap(), vec![field]).unwrap();
            SchemaDocument::from_models([model]).unwrap()
        };
        let mut reversed = attrs.clone();
        reversed.reverse();
        prop_assert!(diff(&build(attrs), &build(reversed)).is_empty());
    }

    #[test]
    fn snapshot_preserves_document(doc in arb_document()) {
        let text = doc.to_snapshot_json().unwrap();
        let back = SchemaDocument::from_snapshot_json(&text).unwrap();
        prop_assert_eq!(back, doc);
    }
}
