use indexmap::IndexMap;
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::SchemaError;

use super::model::Model;
use super::model_name::ModelName;

/// All models of one schema, in declaration order.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(into = "IndexMap<ModelName, Model>")]
pub struct SchemaDocument {
    models: IndexMap<ModelName, Model>,
}

impl SchemaDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a document from models in order, rejecting duplicate names.
    pub fn from_models(models: impl IntoIterator<Item = Model>) -> Result<Self, SchemaError> {
        let mut document = Self::new();
        for model in models {
            document.insert(model)?;
        }
        Ok(document)
    }

    /// Appends a model. A name that is already present is an error.
    pub fn insert(&mut self, model: Model) -> Result<(), SchemaError> {
        if self.models.contains_key(&model.name) {
            return Err(SchemaError::DuplicateModel(model.name.to_string()));
        }
        self.models.insert(model.name.clone(), model);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Model> {
        self.models.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Iterates models in declaration order.
    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &ModelName> {
        self.models.keys()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl PartialEq for SchemaDocument {
    fn eq(&self, other: &Self) -> bool {
        self.models.len() == other.models.len() && self.models.values().eq(other.models.values())
    }
}

impl Eq for SchemaDocument {}

impl From<SchemaDocument> for IndexMap<ModelName, Model> {
    fn from(document: SchemaDocument) -> Self {
        document.models
    }
}

impl TryFrom<IndexMap<ModelName, Model>> for SchemaDocument {
    type Error = SchemaError;

    fn try_from(models: IndexMap<ModelName, Model>) -> Result<Self, Self::Error> {
        for (key, model) in &models {
            if key != &model.name {
                return Err(SchemaError::ModelNameMismatch {
                    key: key.to_string(),
                    name: model.name.to_string(),
                });
            }
        }
        Ok(Self { models })
    }
}

impl<'de> Deserialize<'de> for SchemaDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let models = super::deserialize_unique_map(deserializer)?;
        Self::try_from(models).map_err(de::Error::custom)
    }
}
