use kaleido_core::types::{Attribute, Field, Model, PrimitiveType, SchemaDocument};

/// Print a single model to DSL text.
///
/// Uses 4-space indentation, one field per line, attributes in stored
/// order. A nullable `created_at`/`updated_at` timestamp pair is folded
/// back into `timestamps`.
pub fn print_model(model: &Model) -> String {
    let mut output = String::new();
    write_model(model, &mut output);
    output
}

/// Print every model of a document, separated by blank lines.
pub fn print_document(document: &SchemaDocument) -> String {
    let mut output = String::new();
    for (i, model) in document.models().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        write_model(model, &mut output);
    }
    output
}

fn write_model(model: &Model, output: &mut String) {
    output.push_str("model ");
    output.push_str(model.name.as_str());
    output.push_str(" {\n");

    let fields: Vec<&Field> = model.fields().collect();
    let mut i = 0;
    while i < fields.len() {
        output.push_str("    ");
        if is_timestamp_pair(&fields[i..]) {
            output.push_str("timestamps");
            i += 2;
        } else {
            output.push_str(&fields[i].to_string());
            i += 1;
        }
        output.push('\n');
    }

    output.push_str("}\n");
}

fn is_timestamp_pair(fields: &[&Field]) -> bool {
    match fields {
        [created, updated, ..] => {
            is_shorthand_field(created, "created_at") && is_shorthand_field(updated, "updated_at")
        }
        _ => false,
    }
}

fn is_shorthand_field(field: &Field, name: &str) -> bool {
    field.name.as_str() == name
        && field.field_type == PrimitiveType::Timestamp.into()
        && field.attributes.len() == 1
        && field.attributes.contains(&Attribute::Nullable)
}
