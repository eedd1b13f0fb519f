use console::{Style, Term};

use crate::cli::GlobalOpts;
use crate::diagnostic::dsl_error_to_diagnostic;
use crate::error::CliError;

/// Output format mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

impl OutputMode {
    fn from_format(format: &str) -> Self {
        match format {
            "json" => Self::Json,
            "plain" => Self::Plain,
            _ => Self::Human,
        }
    }
}

/// Where command results and messages go.
///
/// Plans, counts and formatted DSL are written to stdout by the commands.
/// Everything printed through this context goes to stderr, except JSON
/// documents.
pub struct OutputContext {
    pub mode: OutputMode,
    pub verbose: u8,
    pub quiet: bool,
    pub use_color: bool,
}

impl OutputContext {
    pub fn from_global(global: &GlobalOpts) -> Self {
        let use_color = !global.no_color
            && std::env::var("TERM").map_or(true, |t| t != "dumb")
            && Term::stderr().is_term();

        Self {
            mode: OutputMode::from_format(&global.format),
            verbose: global.verbose,
            quiet: global.quiet,
            use_color,
        }
    }

    fn human(&self) -> bool {
        self.mode == OutputMode::Human
    }

    /// `label` followed by `msg`, with the label styled when color is on.
    fn labelled(&self, label: &str, style: Style, msg: &str) -> String {
        if self.use_color {
            format!("{} {msg}", style.apply_to(label))
        } else {
            format!("{label} {msg}")
        }
    }

    /// Completion line, e.g. after a lock file was written.
    pub fn success(&self, msg: &str) {
        if self.human() && !self.quiet {
            eprintln!("{}", self.labelled("ok", Style::new().green().bold(), msg));
        }
    }

    /// Parser warnings and pending-migration notices.
    pub fn warn(&self, msg: &str) {
        if self.quiet {
            return;
        }
        match self.mode {
            OutputMode::Human => {
                eprintln!("{}", self.labelled("warning:", Style::new().yellow().bold(), msg))
            }
            OutputMode::Json => eprintln!("{}", serde_json::json!({ "warning": msg })),
            OutputMode::Plain => eprintln!("warning\t{msg}"),
        }
    }

    /// Schema parse errors get a source excerpt in human mode.
    pub fn print_error(&self, err: &CliError) {
        match (self.mode, err) {
            (
                OutputMode::Human,
                CliError::Parse {
                    error,
                    source_text,
                    file,
                },
            ) => {
                let name = file.display().to_string();
                let report = miette::Report::new(dsl_error_to_diagnostic(error, source_text, &name));
                eprintln!("{report:?}");
            }
            (OutputMode::Human, _) => {
                eprintln!("{}", self.labelled("error:", Style::new().red().bold(), &err.to_string()))
            }
            (OutputMode::Json, _) => eprintln!("{}", err.to_json()),
            (OutputMode::Plain, _) => eprintln!("error\t{err}"),
        }
    }

    /// Pretty JSON document on stdout.
    pub fn print_json(&self, value: &serde_json::Value) {
        if let Ok(s) = serde_json::to_string_pretty(value) {
            println!("{s}");
        }
    }

    pub fn status(&self, msg: &str) {
        if self.human() && !self.quiet {
            eprintln!("{msg}");
        }
    }

    /// Indented detail line, shown with `-v`.
    pub fn detail(&self, msg: &str) {
        if self.human() && self.verbose > 0 {
            eprintln!("  {msg}");
        }
    }
}
