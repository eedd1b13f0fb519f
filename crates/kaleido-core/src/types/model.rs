use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

use super::attribute::AttributeSet;
use super::field::Field;
use super::field_name::FieldName;
use super::field_type::FieldType;
use super::model_name::ModelName;

/// One named schema entity, analogous to a table.
///
/// Fields keep their declaration order. Two models are equal when they
/// have the same name and the same fields in the same order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "ModelEntry", try_from = "ModelEntry")]
pub struct Model {
    pub name: ModelName,
    fields: IndexMap<FieldName, Field>,
}

impl Model {
    /// Creates a model, rejecting duplicate field names.
    pub fn new(name: ModelName, fields: Vec<Field>) -> Result<Self, SchemaError> {
        let mut by_name = IndexMap::with_capacity(fields.len());
        for field in fields {
            if by_name.contains_key(&field.name) {
                return Err(SchemaError::DuplicateField {
                    model: name.to_string(),
                    field: field.name.to_string(),
                });
            }
            by_name.insert(field.name.clone(), field);
        }
        Ok(Self {
            name,
            fields: by_name,
        })
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Iterates fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &FieldName> {
        self.fields.keys()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.fields.len() == other.fields.len()
            && self.fields.values().eq(other.fields.values())
    }
}

impl Eq for Model {}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "model {} {{", self.name)?;
        for field in self.fields() {
            writeln!(f, "  {field}")?;
        }
        write!(f, "}}")
    }
}

/// Persisted shape of a model: `{ "name": ..., "fields": { name: { type, attributes } } }`.
#[derive(Serialize, Deserialize)]
struct ModelEntry {
    name: ModelName,
    #[serde(default, deserialize_with = "super::deserialize_unique_map")]
    fields: IndexMap<FieldName, FieldEntry>,
}

#[derive(Serialize, Deserialize)]
struct FieldEntry {
    #[serde(rename = "type")]
    field_type: FieldType,
    #[serde(default)]
    attributes: AttributeSet,
}

impl From<Model> for ModelEntry {
    fn from(model: Model) -> Self {
        let fields = model
            .fields
            .into_iter()
            .map(|(name, field)| {
                let entry = FieldEntry {
                    field_type: field.field_type,
                    attributes: field.attributes,
                };
                (name, entry)
            })
            .collect();
        Self {
            name: model.name,
            fields,
        }
    }
}

impl TryFrom<ModelEntry> for Model {
    type Error = SchemaError;

    fn try_from(entry: ModelEntry) -> Result<Self, Self::Error> {
        let fields = entry
            .fields
            .into_iter()
            .map(|(name, f)| Field::with_attributes(name, f.field_type, f.attributes))
            .collect();
        Model::new(entry.name, fields)
    }
}
