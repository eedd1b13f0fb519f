use std::fmt;

use kaleido_core::error::SchemaError;

/// A byte-offset span in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    /// Creates a new span from start (inclusive) to end (exclusive).
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The smallest span covering both.
    pub fn join(&self, other: &Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Fatal errors raised while lexing or parsing DSL text.
///
/// Every variant carries the 1-based line it was detected on and the span
/// of the offending text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DslError {
    /// The lexer encountered input that does not match any rule.
    InvalidToken {
        line: usize,
        column: usize,
        span: Span,
    },

    /// An attribute opens `(` without a closing `)` on the same line.
    UnterminatedAttribute {
        line: usize,
        column: usize,
        text: String,
        span: Span,
    },

    /// A model body reaches the end of input before its closing `}`.
    UnbalancedBraces {
        model: String,
        line: usize,
        span: Span,
    },

    /// A body line is neither a field nor `timestamps`.
    MalformedLine {
        model: String,
        line: usize,
        content: String,
        span: Span,
    },

    /// A field line has the right shape but an invalid type clause.
    MalformedField {
        model: String,
        line: usize,
        content: String,
        reason: String,
        span: Span,
    },

    /// A field name appears twice in one model.
    DuplicateField {
        model: String,
        field: String,
        line: usize,
        span: Span,
    },

    /// A model name appears twice in one document.
    DuplicateModel {
        model: String,
        line: usize,
        span: Span,
    },

    /// A field carries more than one `@default(...)`.
    DuplicateDefault {
        model: String,
        field: String,
        line: usize,
        span: Span,
    },

    /// An error propagated from kaleido-core validation.
    CoreSchemaError {
        source: SchemaError,
        line: usize,
        span: Span,
    },
}

impl DslError {
    /// The 1-based line the error was detected on.
    pub fn line(&self) -> usize {
        match self {
            Self::InvalidToken { line, .. }
            | Self::UnterminatedAttribute { line, .. }
            | Self::UnbalancedBraces { line, .. }
            | Self::MalformedLine { line, .. }
            | Self::MalformedField { line, .. }
            | Self::DuplicateField { line, .. }
            | Self::DuplicateModel { line, .. }
            | Self::DuplicateDefault { line, .. }
            | Self::CoreSchemaError { line, .. } => *line,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Self::InvalidToken { span, .. }
            | Self::UnterminatedAttribute { span, .. }
            | Self::UnbalancedBraces { span, .. }
            | Self::MalformedLine { span, .. }
            | Self::MalformedField { span, .. }
            | Self::DuplicateField { span, .. }
            | Self::DuplicateModel { span, .. }
            | Self::DuplicateDefault { span, .. }
            | Self::CoreSchemaError { span, .. } => span,
        }
    }

    /// True for errors raised by the lexer rather than the parser.
    pub fn is_lex_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidToken { .. } | Self::UnterminatedAttribute { .. }
        )
    }
}

impl fmt::Display for DslError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToken { line, column, .. } => {
                write!(f, "invalid token at line {line}, column {column}")
            }
            Self::UnterminatedAttribute { line, column, text, .. } => {
                write!(
                    f,
                    "unterminated attribute '{text}' at line {line}, column {column}: missing ')'"
                )
            }
            Self::UnbalancedBraces { model, line, .. } => {
                write!(
                    f,
                    "model '{model}' opened at line {line} is missing its closing '}}'"
                )
            }
            Self::MalformedLine {
                model,
                line,
                content,
                ..
            } => {
                write!(
                    f,
                    "malformed line {line} in model '{model}': '{content}'; expected 'name: type' or 'timestamps'"
                )
            }
            Self::MalformedField {
                model,
                line,
                content,
                reason,
                ..
            } => {
                write!(
                    f,
                    "malformed field at line {line} in model '{model}': '{content}': {reason}"
                )
            }
            Self::DuplicateField {
                model, field, line, ..
            } => {
                write!(f, "duplicate field '{field}' in model '{model}' at line {line}")
            }
            Self::DuplicateModel { model, line, .. } => {
                write!(f, "duplicate model '{model}' at line {line}")
            }
            Self::DuplicateDefault {
                model, field, line, ..
            } => {
                write!(
                    f,
                    "field '{model}.{field}' at line {line} has more than one @default"
                )
            }
            Self::CoreSchemaError { source, line, .. } => {
                write!(f, "schema validation error at line {line}: {source}")
            }
        }
    }
}

impl std::error::Error for DslError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CoreSchemaError { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Non-fatal findings reported alongside a parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DslWarning {
    /// An attribute name outside the vocabulary; it was dropped.
    UnknownAttribute {
        model: String,
        field: String,
        attribute: String,
        line: usize,
        span: Span,
    },
    /// A flag attribute was repeated on one field.
    DuplicateAttribute {
        model: String,
        field: String,
        attribute: String,
        line: usize,
        span: Span,
    },
    /// `@default` without a value; it was dropped.
    MissingDefaultValue {
        model: String,
        field: String,
        line: usize,
        span: Span,
    },
    /// A flag attribute was given arguments; they were dropped.
    IgnoredArguments {
        model: String,
        field: String,
        attribute: String,
        line: usize,
        span: Span,
    },
}

impl DslWarning {
    pub fn line(&self) -> usize {
        match self {
            Self::UnknownAttribute { line, .. }
            | Self::DuplicateAttribute { line, .. }
            | Self::MissingDefaultValue { line, .. }
            | Self::IgnoredArguments { line, .. } => *line,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Self::UnknownAttribute { span, .. }
            | Self::DuplicateAttribute { span, .. }
            | Self::MissingDefaultValue { span, .. }
            | Self::IgnoredArguments { span, .. } => span,
        }
    }
}

impl fmt::Display for DslWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAttribute {
                model,
                field,
                attribute,
                line,
                ..
            } => write!(
                f,
                "unknown attribute '@{attribute}' on '{model}.{field}' at line {line} was ignored"
            ),
            Self::DuplicateAttribute {
                model,
                field,
                attribute,
                line,
                ..
            } => write!(
                f,
                "attribute '@{attribute}' repeated on '{model}.{field}' at line {line}"
            ),
            Self::MissingDefaultValue {
                model, field, line, ..
            } => write!(
                f,
                "'@default' without a value on '{model}.{field}' at line {line} was ignored"
            ),
            Self::IgnoredArguments {
                model,
                field,
                attribute,
                line,
                ..
            } => write!(
                f,
                "arguments to '@{attribute}' on '{model}.{field}' at line {line} were ignored"
            ),
        }
    }
}
