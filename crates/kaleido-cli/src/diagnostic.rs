use kaleido_dsl::{DslError, Span};
use miette::{Diagnostic, NamedSource, SourceSpan};

/// A `DslError` prepared for miette rendering.
///
/// The module-level `#[allow(unused_assignments)]` in main.rs is required
/// because miette's derive macro generates assignment patterns that rustc
/// flags as unused.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct SchemaDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("{label}")]
    span: SourceSpan,

    message: String,
    label: String,

    #[help]
    suggestion: Option<String>,
}

fn source_span(span: &Span) -> SourceSpan {
    (span.start, span.len()).into()
}

/// Convert a `DslError` into a `SchemaDiagnostic` with a label and,
/// where one exists, a fix-it suggestion.
pub fn dsl_error_to_diagnostic(error: &DslError, source: &str, filename: &str) -> SchemaDiagnostic {
    let src = NamedSource::new(filename, source.to_string());
    let span = source_span(error.span());
    let message = error.to_string();

    let (label, suggestion) = match error {
        DslError::InvalidToken { .. } => (
            "unrecognized character".to_string(),
            Some("Remove the character or move it into a comment with '#'.".to_string()),
        ),
        DslError::UnterminatedAttribute { .. } => (
            "missing ')'".to_string(),
            Some("Close the argument list on the same line.".to_string()),
        ),
        DslError::UnbalancedBraces { model, .. } => (
            format!("model '{model}' starts here"),
            Some("Add a closing '}' after the last field.".to_string()),
        ),
        DslError::MalformedLine { .. } => (
            "expected 'name: type'".to_string(),
            Some("Write each field as 'name: type' followed by optional attributes.".to_string()),
        ),
        DslError::MalformedField { reason, .. } => (reason.clone(), None),
        DslError::DuplicateField { field, .. } => (
            format!("'{field}' is already defined above"),
            Some("Remove the duplicate or rename one of the fields.".to_string()),
        ),
        DslError::DuplicateModel { model, .. } => (
            format!("'{model}' is already defined above"),
            Some("Merge the two definitions or rename one of the models.".to_string()),
        ),
        DslError::DuplicateDefault { .. } => (
            "second @default".to_string(),
            Some("Keep a single @default(...) on the field.".to_string()),
        ),
        DslError::CoreSchemaError { .. } => ("validation failed".to_string(), None),
        _ => ("error".to_string(), None),
    };

    SchemaDiagnostic {
        src,
        span,
        message,
        label,
        suggestion,
    }
}
