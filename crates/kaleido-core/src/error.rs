use std::fmt;

/// Errors that occur when constructing or validating schema types.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SchemaError {
    /// Model name is not a valid identifier.
    InvalidModelName(String),
    /// Field name is not a valid identifier.
    InvalidFieldName(String),
    /// Field type string could not be understood.
    InvalidFieldType(String),
    /// Attribute string is not part of the vocabulary.
    UnknownAttribute(String),
    /// Two models share a name within one document.
    DuplicateModel(String),
    /// Two fields share a name within one model.
    DuplicateField { model: String, field: String },
    /// More than one `default(...)` on a single field.
    DuplicateDefault,
    /// A snapshot entry is keyed by a different name than the model it holds.
    ModelNameMismatch { key: String, name: String },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidModelName(s) => {
                write!(
                    f,
                    "invalid model name '{s}': must match [A-Za-z_][A-Za-z0-9_]*"
                )
            }
            Self::InvalidFieldName(s) => {
                write!(
                    f,
                    "invalid field name '{s}': must match [A-Za-z_][A-Za-z0-9_]*"
                )
            }
            Self::InvalidFieldType(s) => write!(f, "invalid field type '{s}'"),
            Self::UnknownAttribute(s) => write!(f, "unknown attribute '{s}'"),
            Self::DuplicateModel(m) => write!(f, "duplicate model '{m}'"),
            Self::DuplicateField { model, field } => {
                write!(f, "duplicate field '{field}' in model '{model}'")
            }
            Self::DuplicateDefault => write!(f, "a field may carry at most one default value"),
            Self::ModelNameMismatch { key, name } => {
                write!(f, "model entry '{key}' declares a different name '{name}'")
            }
        }
    }
}

impl std::error::Error for SchemaError {}
