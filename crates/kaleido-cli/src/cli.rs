use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Declarative schema DSL compiler.
///
/// Kaleido reads a `.kld` schema file, compares it with the lock file
/// written by the last sync, and emits a migration plan.
#[derive(Parser)]
#[command(
    name = "kaleido",
    version,
    about = "Declarative schema DSL compiler and migration planner",
    after_help = "Use 'kaleido <command> --help' for more information about a command.",
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Global options available to all subcommands.
#[derive(Args, Debug, Default)]
pub struct GlobalOpts {
    /// Configuration file path [env: KALEIDO_CONFIG]
    #[arg(short = 'c', long = "config", global = true, env = "KALEIDO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format: human (default), json, plain
    #[arg(
        long,
        global = true,
        default_value = "human",
        value_parser = ["human", "json", "plain"]
    )]
    pub format: String,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all non-error output
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output [env: NO_COLOR]
    #[arg(long = "no-color", global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Schema DSL file (overrides config)
    #[arg(short = 's', long = "schema", global = true)]
    pub schema: Option<PathBuf>,

    /// Lock file holding the last synchronized schema (overrides config)
    #[arg(short = 'l', long = "lock", global = true)]
    pub lock: Option<PathBuf>,
}

/// Top-level subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Parse and validate the schema file
    Parse(ParseArgs),

    /// Print the schema file in normalized form
    Fmt(FmtArgs),

    /// Show the migration plan against the lock file
    Plan,

    /// Plan, then record the current schema in the lock file
    Sync(SyncArgs),
}

// ---------------------------------------------------------------------------
// Individual command argument structs
// ---------------------------------------------------------------------------

/// Arguments for `kaleido parse`.
#[derive(Args)]
pub struct ParseArgs {
    /// Echo the parsed schema as normalized DSL
    #[arg(long = "print")]
    pub print: bool,
}

/// Arguments for `kaleido fmt`.
#[derive(Args)]
pub struct FmtArgs {
    /// Fail instead of printing when the file is not normalized
    #[arg(long = "check")]
    pub check: bool,
}

/// Arguments for `kaleido sync`.
#[derive(Args)]
pub struct SyncArgs {
    /// Show what would be written without touching the lock file
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,

    /// Also write the plan as JSON to this file
    #[arg(short = 'o', long = "plan-out")]
    pub plan_out: Option<PathBuf>,
}
