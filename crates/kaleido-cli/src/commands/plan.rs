use crate::cli::GlobalOpts;
use crate::commands::{compute_plan, render_plan, Workspace};
use crate::error::CliError;
use crate::output::OutputContext;

/// Run the `plan` command: diff the schema against the lock file and
/// render the plan. Nothing is written.
pub fn run(global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let workspace = Workspace::load(global)?;
    let outcome = compute_plan(&workspace, output)?;
    render_plan(&outcome, output)
}
