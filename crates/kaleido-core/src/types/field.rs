use serde::{Deserialize, Serialize};

use super::attribute::AttributeSet;
use super::field_name::FieldName;
use super::field_type::FieldType;
use super::model_name::ModelName;

/// A named, typed member of a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: FieldName,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub attributes: AttributeSet,
}

impl Field {
    /// Creates a new field with no attributes.
    pub fn new(name: FieldName, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            attributes: AttributeSet::new(),
        }
    }

    pub fn with_attributes(name: FieldName, field_type: FieldType, attributes: AttributeSet) -> Self {
        Self {
            name,
            field_type,
            attributes,
        }
    }

    pub fn is_nullable(&self) -> bool {
        self.attributes.is_nullable()
    }

    /// The target model when this field is a belongs-to relationship.
    pub fn relation_target(&self) -> Option<&ModelName> {
        self.field_type.relation_target()
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.field_type)?;
        for a in &self.attributes {
            write!(f, " @{a}")?;
        }
        Ok(())
    }
}
