use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// A constraint or modifier tag on a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Attribute {
    Primary,
    Unique,
    Nullable,
    AutoIncrement,
    /// Default value, carried as the raw text between the parentheses.
    Default(String),
}

impl Attribute {
    /// The attribute name as written after `@`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Unique => "unique",
            Self::Nullable => "nullable",
            Self::AutoIncrement => "autoIncrement",
            Self::Default(_) => "default",
        }
    }

    /// Looks up an argument-less attribute by name.
    pub fn flag(name: &str) -> Option<Self> {
        match name {
            "primary" => Some(Self::Primary),
            "unique" => Some(Self::Unique),
            "nullable" => Some(Self::Nullable),
            "autoIncrement" => Some(Self::AutoIncrement),
            _ => None,
        }
    }

    fn same_kind(&self, other: &Attribute) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default(value) => write!(f, "default({value})"),
            other => f.write_str(other.name()),
        }
    }
}

impl FromStr for Attribute {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(flag) = Self::flag(s) {
            return Ok(flag);
        }
        s.strip_prefix("default(")
            .and_then(|rest| rest.strip_suffix(')'))
            .map(|value| Self::Default(value.trim().to_string()))
            .ok_or_else(|| SchemaError::UnknownAttribute(s.to_string()))
    }
}

impl From<Attribute> for String {
    fn from(a: Attribute) -> String {
        a.to_string()
    }
}

impl TryFrom<String> for Attribute {
    type Error = SchemaError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// The attributes of one field.
///
/// Keeps textual order for printing, but compares as a set: two sets are
/// equal when they hold the same attributes in any order. Each kind appears
/// at most once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<Attribute>")]
pub struct AttributeSet(Vec<Attribute>);

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set, ignoring repeated flags and rejecting a second default.
    pub fn from_attributes(
        attributes: impl IntoIterator<Item = Attribute>,
    ) -> Result<Self, SchemaError> {
        let mut set = Self::new();
        for attribute in attributes {
            if matches!(attribute, Attribute::Default(_)) && set.default_value().is_some() {
                return Err(SchemaError::DuplicateDefault);
            }
            set.insert(attribute);
        }
        Ok(set)
    }

    /// Adds an attribute. Returns false when one of the same kind is already
    /// present, in which case the set is left unchanged.
    pub fn insert(&mut self, attribute: Attribute) -> bool {
        if self.0.iter().any(|a| a.same_kind(&attribute)) {
            return false;
        }
        self.0.push(attribute);
        true
    }

    pub fn contains(&self, attribute: &Attribute) -> bool {
        self.0.contains(attribute)
    }

    pub fn is_primary(&self) -> bool {
        self.contains(&Attribute::Primary)
    }

    pub fn is_unique(&self) -> bool {
        self.contains(&Attribute::Unique)
    }

    pub fn is_nullable(&self) -> bool {
        self.contains(&Attribute::Nullable)
    }

    pub fn is_auto_increment(&self) -> bool {
        self.contains(&Attribute::AutoIncrement)
    }

    pub fn default_value(&self) -> Option<&str> {
        self.0.iter().find_map(|a| match a {
            Attribute::Default(value) => Some(value.as_str()),
            _ => None,
        })
    }

    /// Iterates in textual order.
    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for AttributeSet {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.0.iter().all(|a| other.0.contains(a))
    }
}

impl Eq for AttributeSet {}

impl<'a> IntoIterator for &'a AttributeSet {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<AttributeSet> for Vec<Attribute> {
    fn from(set: AttributeSet) -> Self {
        set.0
    }
}

/// Decodes a persisted attribute list.
///
/// Lock files written by older tooling may carry any `@word` tag, with or
/// without arguments. Known flags keep their meaning with arguments dropped;
/// unknown tags are skipped. A second default is still an error.
impl TryFrom<Vec<String>> for AttributeSet {
    type Error = SchemaError;

    fn try_from(raw: Vec<String>) -> Result<Self, Self::Error> {
        let mut attributes = Vec::with_capacity(raw.len());
        for text in raw {
            match text.parse::<Attribute>() {
                Ok(attribute) => attributes.push(attribute),
                Err(_) => {
                    let name = text.split('(').next().unwrap_or_default().trim();
                    match Attribute::flag(name) {
                        Some(flag) => attributes.push(flag),
                        None => tracing::warn!(attribute = %text, "skipping unknown attribute"),
                    }
                }
            }
        }
        Self::from_attributes(attributes)
    }
}
