pub mod fmt;
pub mod parse;
pub mod plan;
pub mod sync;

use std::path::Path;

use kaleido_core::types::SchemaDocument;
use kaleido_core::{ChangeSet, DiffEngine, MigrationPlan, PlanBuilder};
use kaleido_dsl::Parsed;

use crate::cli::GlobalOpts;
use crate::config::{self, KaleidoConfig, ResolvedPaths};
use crate::error::CliError;
use crate::output::{OutputContext, OutputMode};

/// Loaded configuration plus the schema and lock paths it resolves to.
pub struct Workspace {
    pub config: KaleidoConfig,
    pub paths: ResolvedPaths,
}

impl Workspace {
    pub fn load(global: &GlobalOpts) -> Result<Self, CliError> {
        let config = config::load_config(global.config.as_deref())?;
        let paths = config::resolve_paths(&config, global);
        tracing::debug!(
            schema = %paths.schema.display(),
            lock = %paths.lock.display(),
            "resolved paths"
        );
        Ok(Self { config, paths })
    }
}

/// Schema file contents and the document parsed from them.
pub struct LoadedSchema {
    pub source: String,
    pub parsed: Parsed,
}

/// Read and parse the schema file.
pub fn load_schema(path: &Path) -> Result<LoadedSchema, CliError> {
    let source = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CliError::SchemaNotFound {
                path: path.to_path_buf(),
            }
        } else {
            CliError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let parsed = kaleido_dsl::parse_with_warnings(&source).map_err(|error| CliError::Parse {
        error,
        source_text: source.clone(),
        file: path.to_path_buf(),
    })?;

    Ok(LoadedSchema { source, parsed })
}

/// Read the lock file. A missing lock file is an empty baseline.
pub fn load_lock(path: &Path) -> Result<SchemaDocument, CliError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no lock file, using empty baseline");
            return Ok(SchemaDocument::new());
        }
        Err(e) => {
            return Err(CliError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    SchemaDocument::from_snapshot_json(&text).map_err(|source| CliError::Snapshot {
        path: path.to_path_buf(),
        source,
    })
}

/// Print parser warnings through the output context.
pub fn report_warnings(parsed: &Parsed, file: &Path, output: &OutputContext) {
    for warning in &parsed.warnings {
        output.warn(&format!("{}: {warning}", file.display()));
    }
}

/// Everything `plan` and `sync` need after diffing.
pub struct PlanOutcome {
    pub schema: LoadedSchema,
    pub changes: ChangeSet,
    pub plan: MigrationPlan,
}

/// Parse the schema, diff it against the lock file and build the plan.
pub fn compute_plan(workspace: &Workspace, output: &OutputContext) -> Result<PlanOutcome, CliError> {
    let schema = load_schema(&workspace.paths.schema)?;
    report_warnings(&schema.parsed, &workspace.paths.schema, output);

    let baseline = load_lock(&workspace.paths.lock)?;
    let current = &schema.parsed.document;
    let changes = DiffEngine::diff(&baseline, current);

    let plan = PlanBuilder::new(workspace.config.plan.options())
        .with_known_models(current)
        .build(changes.clone());

    Ok(PlanOutcome {
        schema,
        changes,
        plan,
    })
}

/// Render a plan in the active output mode.
pub fn render_plan(outcome: &PlanOutcome, output: &OutputContext) -> Result<(), CliError> {
    match output.mode {
        OutputMode::Human => {
            print!("{}", outcome.changes);
            if !outcome.changes.is_empty() {
                println!();
                print!("{}", outcome.plan);
            }
        }
        OutputMode::Json => {
            let value = serde_json::json!({
                "changes": outcome.changes,
                "plan": outcome.plan,
            });
            output.print_json(&value);
        }
        OutputMode::Plain => {
            for op in &outcome.plan.operations {
                let kind = match op {
                    kaleido_core::Operation::CreateTable { .. } => "create".to_string(),
                    kaleido_core::Operation::Pending { kind, .. } => format!("pending_{kind}"),
                    _ => "other".to_string(),
                };
                println!("{kind}\t{}\t{}", op.model(), op.table());
            }
            for diagnostic in &outcome.plan.diagnostics {
                println!("diagnostic\t{diagnostic}");
            }
        }
    }
    Ok(())
}

/// Serialize a plan as pretty JSON with a trailing newline.
pub fn plan_json(plan: &MigrationPlan) -> Result<String, CliError> {
    serde_json::to_string_pretty(plan)
        .map(|mut s| {
            s.push('\n');
            s
        })
        .map_err(|e| CliError::Other(format!("failed to serialize plan: {e}")))
}

/// Write `contents` to `path`, creating parent directories.
pub fn write_file(path: &Path, contents: &str) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| CliError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::write(path, contents).map_err(|e| CliError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
