use serde::Serialize;

use crate::types::{Model, ModelName, SchemaDocument};

// ---------------------------------------------------------------------------
// Change
// ---------------------------------------------------------------------------

/// One model-level difference between two schema documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Change {
    /// The model exists only in the new document.
    CreateModel { model: Model },
    /// The model exists only in the old document.
    DropModel { name: ModelName },
    /// The model exists in both documents with different definitions.
    UpdateModel {
        name: ModelName,
        old: Model,
        new: Model,
    },
}

impl Change {
    /// The name of the model this change concerns.
    pub fn model_name(&self) -> &ModelName {
        match self {
            Self::CreateModel { model } => &model.name,
            Self::DropModel { name } | Self::UpdateModel { name, .. } => name,
        }
    }
}

impl std::fmt::Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateModel { model } => {
                write!(f, "CREATE model '{}' with {} fields", model.name, model.len())
            }
            Self::DropModel { name } => write!(f, "DROP model '{name}'"),
            Self::UpdateModel { name, .. } => write!(f, "UPDATE model '{name}'"),
        }
    }
}

// ---------------------------------------------------------------------------
// ChangeSet
// ---------------------------------------------------------------------------

/// The ordered result of a diff: creates, then drops, then updates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChangeSet {
    changes: Vec<Change>,
}

impl ChangeSet {
    pub fn iter(&self) -> std::slice::Iter<'_, Change> {
        self.changes.iter()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Names of models that are created.
    pub fn created(&self) -> impl Iterator<Item = &ModelName> {
        self.changes.iter().filter_map(|c| match c {
            Change::CreateModel { model } => Some(&model.name),
            _ => None,
        })
    }

    /// Names of models that are dropped.
    pub fn dropped(&self) -> impl Iterator<Item = &ModelName> {
        self.changes.iter().filter_map(|c| match c {
            Change::DropModel { name } => Some(name),
            _ => None,
        })
    }

    /// Names of models that are updated.
    pub fn updated(&self) -> impl Iterator<Item = &ModelName> {
        self.changes.iter().filter_map(|c| match c {
            Change::UpdateModel { name, .. } => Some(name),
            _ => None,
        })
    }
}

impl IntoIterator for ChangeSet {
    type Item = Change;
    type IntoIter = std::vec::IntoIter<Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a Change;
    type IntoIter = std::slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

impl FromIterator<Change> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = Change>>(iter: I) -> Self {
        Self {
            changes: iter.into_iter().collect(),
        }
    }
}

impl std::fmt::Display for ChangeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return writeln!(f, "No changes detected");
        }
        writeln!(f, "{} change(s)", self.len())?;
        for (i, change) in self.changes.iter().enumerate() {
            writeln!(f, "  {}. {change}", i + 1)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// DiffEngine
// ---------------------------------------------------------------------------

/// Compares two schema documents at model granularity.
pub struct DiffEngine;

impl DiffEngine {
    /// Computes the change set that turns `old` into `new`.
    ///
    /// Pure and deterministic: creates follow `new` order, drops follow
    /// `old` order, updates follow `new` order.
    pub fn diff(old: &SchemaDocument, new: &SchemaDocument) -> ChangeSet {
        let mut changes = Vec::new();

        for model in new.models() {
            if !old.contains(model.name.as_str()) {
                changes.push(Change::CreateModel {
                    model: model.clone(),
                });
            }
        }

        for name in old.names() {
            if !new.contains(name.as_str()) {
                changes.push(Change::DropModel { name: name.clone() });
            }
        }

        for model in new.models() {
            if let Some(previous) = old.get(model.name.as_str()) {
                if previous != model {
                    changes.push(Change::UpdateModel {
                        name: model.name.clone(),
                        old: previous.clone(),
                        new: model.clone(),
                    });
                }
            }
        }

        let set = ChangeSet { changes };
        tracing::debug!(
            created = set.created().count(),
            dropped = set.dropped().count(),
            updated = set.updated().count(),
            "computed schema diff"
        );
        set
    }
}

/// Shorthand for [`DiffEngine::diff`].
pub fn diff(old: &SchemaDocument, new: &SchemaDocument) -> ChangeSet {
    DiffEngine::diff(old, new)
}
