//! The persisted snapshot (lock file) of the last synchronized schema.
//!
//! The format is a JSON object keyed by model name:
//!
//! ```json
//! {
//!   "User": {
//!     "name": "User",
//!     "fields": {
//!       "email": { "type": "string", "attributes": ["unique"] },
//!       "team": { "type": "belongsTo(Team)", "attributes": ["nullable"] }
//!     }
//!   }
//! }
//! ```
//!
//! Key order in the file is the declaration order of the document.

use std::fmt;

use crate::types::SchemaDocument;

/// Errors that occur reading or writing a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SnapshotError {
    /// The snapshot text is not valid JSON or does not describe a valid document.
    Decode {
        message: String,
        line: usize,
        column: usize,
    },
    /// The document could not be encoded.
    Encode { message: String },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode {
                message,
                line,
                column,
            } => write!(f, "invalid snapshot at line {line}, column {column}: {message}"),
            Self::Encode { message } => write!(f, "failed to encode snapshot: {message}"),
        }
    }
}

impl std::error::Error for SnapshotError {}

impl SchemaDocument {
    /// Decodes a document from its persisted JSON form.
    ///
    /// Blank input is treated as an empty document.
    pub fn from_snapshot_json(text: &str) -> Result<Self, SnapshotError> {
        if text.trim().is_empty() {
            return Ok(Self::new());
        }
        let document: SchemaDocument =
            serde_json::from_str(text).map_err(|e| SnapshotError::Decode {
                message: e.to_string(),
                line: e.line(),
                column: e.column(),
            })?;
        tracing::debug!(models = document.len(), "decoded schema snapshot");
        Ok(document)
    }

    /// Encodes the document as pretty-printed JSON, ending in a newline.
    pub fn to_snapshot_json(&self) -> Result<String, SnapshotError> {
        let mut text = serde_json::to_string_pretty(self).map_err(|e| SnapshotError::Encode {
            message: e.to_string(),
        })?;
        text.push('\n');
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        Attribute, AttributeSet, Field, FieldName, FieldType, Model, ModelName, PrimitiveType,
    };

    fn sample() -> SchemaDocument {
        let user = Model::new(
            ModelName::new("User").unwrap(),
            vec![
                Field::with_attributes(
                    FieldName::new("email").unwrap(),
                    PrimitiveType::String.into(),
                    AttributeSet::from_attributes([Attribute::Unique]).unwrap(),
                ),
                Field::with_attributes(
                    FieldName::new("team").unwrap(),
                    FieldType::BelongsTo(ModelName::new("Team").unwrap()),
                    AttributeSet::from_attributes([Attribute::Nullable]).unwrap(),
                ),
            ],
        )
        .unwrap();
        let team = Model::new(
            ModelName::new("Team").unwrap(),
            vec![Field::with_attributes(
                FieldName::new("label").unwrap(),
                FieldType::Other("varchar".into()),
                AttributeSet::from_attributes([Attribute::Default("'core'".into())]).unwrap(),
            )],
        )
        .unwrap();
        SchemaDocument::from_models([user, team]).unwrap()
    }

    #[test]
    fn encode_then_decode_preserves_document() {
        let doc = sample();
        let text = doc.to_snapshot_json().unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(SchemaDocument::from_snapshot_json(&text).unwrap(), doc);
    }

    #[test]
    fn decodes_lock_file_layout() {
        let text = r#"{
            "Post": {
                "name": "Post",
                "fields": {
                    "title": { "type": "string", "attributes": [] },
                    "author": { "type": "belongsTo(User)", "attributes": ["nullable"] },
                    "published_at": { "type": "timestamp", "attributes": ["nullable", "default(null)"] }
                }
            }
        }"#;
        let doc = SchemaDocument::from_snapshot_json(text).unwrap();
        let post = doc.get("Post").unwrap();
        let names: Vec<_> = post.field_names().map(FieldName::as_str).collect();
        assert_eq!(names, vec!["title", "author", "published_at"]);
        assert_eq!(
            post.field("author").unwrap().relation_target().map(ModelName::as_str),
            Some("User")
        );
        assert_eq!(
            post.field("published_at").unwrap().attributes.default_value(),
            Some("null")
        );
    }

    #[test]
    fn model_order_follows_file_order() {
        let text = r#"{"Zed": {"name": "Zed", "fields": {}}, "Alpha": {"name": "Alpha", "fields": {}}}"#;
        let doc = SchemaDocument::from_snapshot_json(text).unwrap();
        let names: Vec<_> = doc.names().map(ModelName::as_str).collect();
        assert_eq!(names, vec!["Zed", "Alpha"]);
    }

    #[test]
    fn blank_input_is_empty_document() {
        assert!(SchemaDocument::from_snapshot_json("  \n").unwrap().is_empty());
    }

    #[test]
    fn decodes_legacy_lock_entries() {
        let text = r#"{
            "Post": {
                "name": "Post",
                "fields": {
                    "author": { "type": "belongsTo", "attributes": [] },
                    "slug": { "type": "string", "attributes": ["index", "unique(slug)"] },
                    "created_at": { "type": "timestamp", "attributes": ["nullable"] }
                }
            }
        }"#;
        let doc = SchemaDocument::from_snapshot_json(text).unwrap();
        let post = doc.get("Post").unwrap();
        let author = post.field("author").unwrap();
        assert_eq!(author.field_type, FieldType::Other("belongsTo".into()));
        let slug = post.field("slug").unwrap();
        assert_eq!(slug.attributes.len(), 1);
        assert!(slug.attributes.is_unique());
    }

    #[test]
    fn rejects_duplicate_field_keys() {
        let text = r#"{"A": {"name": "A", "fields": {
            "x": {"type": "string", "attributes": []},
            "x": {"type": "integer", "attributes": []}
        }}}"#;
        let err = SchemaDocument::from_snapshot_json(text).unwrap_err();
        assert!(err.to_string().contains("duplicate key 'x'"), "{err}");
    }

    #[test]
    fn rejects_duplicate_model_keys() {
        let text = r#"{"A": {"name": "A", "fields": {}}, "A": {"name": "A", "fields": {}}}"#;
        let err = SchemaDocument::from_snapshot_json(text).unwrap_err();
        assert!(matches!(err, SnapshotError::Decode { .. }));
        assert!(err.to_string().contains("duplicate key 'A'"), "{err}");
    }

    #[test]
    fn rejects_mismatched_model_name() {
        let text = r#"{"A": {"name": "B", "fields": {}}}"#;
        let err = SchemaDocument::from_snapshot_json(text).unwrap_err();
        assert!(matches!(err, SnapshotError::Decode { .. }));
    }

    #[test]
    fn reports_position_of_malformed_json() {
        let err = SchemaDocument::from_snapshot_json("{\n  \"A\": ").unwrap_err();
        match err {
            SnapshotError::Decode { line, .. } => assert_eq!(line, 2),
            other => panic!("expected Decode, got {other:?}"),
        }
    }
}
