use std::path::PathBuf;

use kaleido_core::SnapshotError;
use kaleido_dsl::DslError;

/// Exit codes for the CLI process.
///
/// - 0: success
/// - 1: general error
/// - 2: invalid arguments / configuration
/// - 3: parse error in the schema file
/// - 4: `fmt --check` found an unformatted file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidArguments = 2,
    ParseError = 3,
    Unformatted = 4,
}

/// Errors returned by CLI command handlers.
///
/// Each variant maps to an `ExitCode` and can produce structured
/// output in JSON mode.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Lex or parse error in the schema file.
    #[error("parse error in {file}: {error}")]
    Parse {
        error: DslError,
        source_text: String,
        file: PathBuf,
    },

    /// The lock file could not be decoded or encoded.
    #[error("lock file {path}: {source}")]
    Snapshot {
        path: PathBuf,
        source: SnapshotError,
    },

    /// IO errors (file not found, permission denied).
    #[error("IO error for {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration errors.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Schema file not found.
    #[error("schema file {path} not found")]
    SchemaNotFound { path: PathBuf },

    /// `fmt --check` found differences.
    #[error("{path} is not formatted")]
    Unformatted { path: PathBuf },

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl CliError {
    /// Maps this error to the appropriate exit code.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Parse { .. } => ExitCode::ParseError,
            Self::Config { .. } | Self::SchemaNotFound { .. } => ExitCode::InvalidArguments,
            Self::Unformatted { .. } => ExitCode::Unformatted,
            Self::Snapshot { .. } | Self::Io { .. } | Self::Other(_) => ExitCode::GeneralError,
        }
    }

    /// Serializes this error as a JSON value for `--format json` output.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Parse { error, file, .. } => serde_json::json!({
                "error": "parse_error",
                "file": file.display().to_string(),
                "line": error.line(),
                "message": error.to_string(),
            }),
            Self::Snapshot { path, source } => serde_json::json!({
                "error": "snapshot_error",
                "path": path.display().to_string(),
                "message": source.to_string(),
            }),
            Self::Io { path, source } => serde_json::json!({
                "error": "io_error",
                "path": path.display().to_string(),
                "message": source.to_string(),
            }),
            Self::Config { message } => serde_json::json!({
                "error": "config_error",
                "message": message,
            }),
            Self::Unformatted { path } => serde_json::json!({
                "error": "unformatted",
                "path": path.display().to_string(),
            }),
            other => serde_json::json!({
                "error": "error",
                "message": other.to_string(),
            }),
        }
    }
}
