use crate::cli::{GlobalOpts, SyncArgs};
use crate::commands::{compute_plan, plan_json, render_plan, write_file, Workspace};
use crate::error::CliError;
use crate::output::OutputContext;

/// Run the `sync` command: plan, then record the current schema in the
/// lock file.
pub fn run(args: SyncArgs, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let workspace = Workspace::load(global)?;
    let outcome = compute_plan(&workspace, output)?;
    render_plan(&outcome, output)?;

    if outcome.changes.is_empty() {
        return Ok(());
    }

    if args.dry_run {
        output.status("Dry run: lock file not written.");
        return Ok(());
    }

    let lock = &workspace.paths.lock;
    let snapshot = outcome
        .schema
        .parsed
        .document
        .to_snapshot_json()
        .map_err(|source| CliError::Snapshot {
            path: lock.clone(),
            source,
        })?;
    write_file(lock, &snapshot)?;
    tracing::info!(path = %lock.display(), "wrote lock file");

    if let Some(plan_out) = &args.plan_out {
        write_file(plan_out, &plan_json(&outcome.plan)?)?;
        output.status(&format!("Plan written to {}", plan_out.display()));
    }

    let pending = outcome.plan.pending().count();
    if pending > 0 {
        output.warn(&format!(
            "{pending} pending operations need a hand-written migration"
        ));
    }
    output.success(&format!("Lock file {} updated", lock.display()));
    Ok(())
}
