use crate::cli::{GlobalOpts, ParseArgs};
use crate::commands::{load_schema, report_warnings, Workspace};
use crate::error::CliError;
use crate::output::{OutputContext, OutputMode};

/// Run the `parse` command: validate the schema file and report counts.
pub fn run(args: ParseArgs, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let workspace = Workspace::load(global)?;
    let path = &workspace.paths.schema;
    let schema = load_schema(path)?;
    let document = &schema.parsed.document;

    let model_count = document.len();
    let field_count: usize = document.models().map(|m| m.len()).sum();
    let filename = path.display().to_string();

    match output.mode {
        OutputMode::Human => {
            report_warnings(&schema.parsed, path, output);
            for model in document.models() {
                output.detail(&format!("{} ({} fields)", model.name, model.len()));
            }
            if args.print {
                print!("{}", kaleido_dsl::print_document(document));
            }
            output.success(&format!(
                "{filename}: {model_count} models, {field_count} fields, {} warnings",
                schema.parsed.warnings.len()
            ));
        }
        OutputMode::Json => {
            let models: Vec<serde_json::Value> = document
                .models()
                .map(|m| serde_json::json!({ "name": m.name.as_str(), "fields": m.len() }))
                .collect();
            let warnings: Vec<serde_json::Value> = schema
                .parsed
                .warnings
                .iter()
                .map(|w| serde_json::json!({ "line": w.line(), "message": w.to_string() }))
                .collect();
            let mut value = serde_json::json!({
                "file": filename,
                "models": models,
                "model_count": model_count,
                "field_count": field_count,
                "warnings": warnings,
            });
            if args.print {
                value["printed"] = serde_json::Value::String(kaleido_dsl::print_document(document));
            }
            output.print_json(&value);
        }
        OutputMode::Plain => {
            report_warnings(&schema.parsed, path, output);
            if args.print {
                print!("{}", kaleido_dsl::print_document(document));
            } else {
                println!("{filename}\t{model_count}\t{field_count}");
            }
        }
    }

    Ok(())
}
