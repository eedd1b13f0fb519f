use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

use super::model_name::ModelName;

/// The primitive types that make up the DSL vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    String,
    Integer,
    Boolean,
    Timestamp,
    Date,
    Json,
    Float,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 7] = [
        Self::String,
        Self::Integer,
        Self::Boolean,
        Self::Timestamp,
        Self::Date,
        Self::Json,
        Self::Float,
    ];

    /// The DSL spelling of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Timestamp => "timestamp",
            Self::Date => "date",
            Self::Json => "json",
            Self::Float => "float",
        }
    }

    /// Looks up a primitive by its exact DSL spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == name)
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The declared type of a field.
///
/// Type tokens outside the vocabulary are kept verbatim in `Other` so that
/// they survive a round trip; resolving them to a storage type is the plan
/// builder's job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldType {
    Primitive(PrimitiveType),
    /// A belongs-to relationship pointing at another model.
    BelongsTo(ModelName),
    Other(String),
}

pub(crate) const BELONGS_TO: &str = "belongsTo";

impl FieldType {
    /// Builds a non-relationship type from a type token.
    pub fn from_name(name: &str) -> Self {
        match PrimitiveType::from_name(name) {
            Some(p) => Self::Primitive(p),
            None => Self::Other(name.to_string()),
        }
    }

    /// The bare type token, without relationship arguments.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Primitive(p) => p.as_str(),
            Self::BelongsTo(_) => BELONGS_TO,
            Self::Other(name) => name,
        }
    }

    /// The target model of a belongs-to relationship.
    pub fn relation_target(&self) -> Option<&ModelName> {
        match self {
            Self::BelongsTo(target) => Some(target),
            _ => None,
        }
    }
}

impl From<PrimitiveType> for FieldType {
    fn from(p: PrimitiveType) -> Self {
        Self::Primitive(p)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => write!(f, "{p}"),
            Self::BelongsTo(target) => write!(f, "{BELONGS_TO}({target})"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

impl FromStr for FieldType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // A bare `belongsTo` with no target is kept as an opaque type token.
        if let Some(rest) = s.strip_prefix(BELONGS_TO) {
            if let Some(target) = rest.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
                return ModelName::new(target.trim()).map(Self::BelongsTo);
            }
        }
        if !super::is_identifier(s) {
            return Err(SchemaError::InvalidFieldType(s.to_string()));
        }
        Ok(Self::from_name(s))
    }
}

impl From<FieldType> for String {
    fn from(t: FieldType) -> String {
        t.to_string()
    }
}

impl TryFrom<String> for FieldType {
    type Error = SchemaError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
