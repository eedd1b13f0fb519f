use crate::cli::{FmtArgs, GlobalOpts};
use crate::commands::{load_schema, Workspace};
use crate::error::CliError;
use crate::output::{OutputContext, OutputMode};

/// Run the `fmt` command: print the normalized schema, or with `--check`
/// fail when the file differs from its normalized form.
pub fn run(args: FmtArgs, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let workspace = Workspace::load(global)?;
    let path = &workspace.paths.schema;
    let schema = load_schema(path)?;
    let formatted = kaleido_dsl::print_document(&schema.parsed.document);

    if args.check {
        if formatted != schema.source {
            return Err(CliError::Unformatted { path: path.clone() });
        }
        if output.mode == OutputMode::Json {
            output.print_json(&serde_json::json!({
                "file": path.display().to_string(),
                "formatted": true,
            }));
        }
        output.success(&format!("{} is formatted", path.display()));
        return Ok(());
    }

    if !schema.parsed.warnings.is_empty() {
        output.warn(&format!(
            "{} warnings; dropped attributes do not appear in the output",
            schema.parsed.warnings.len()
        ));
    }

    match output.mode {
        OutputMode::Json => output.print_json(&serde_json::json!({
            "file": path.display().to_string(),
            "formatted": formatted == schema.source,
            "output": formatted,
        })),
        OutputMode::Human | OutputMode::Plain => print!("{formatted}"),
    }
    Ok(())
}
