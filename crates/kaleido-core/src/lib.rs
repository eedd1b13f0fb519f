//! # kaleido-core
//!
//! Schema model, lock-file snapshot codec, differ and migration plan builder
//! for the Kaleido schema DSL.
//!
//! Everything in this crate is pure: no file system access and no database.
//!
//! # Example
//!
//! ```
//! use kaleido_core::types::{Field, FieldName, Model, ModelName, PrimitiveType, SchemaDocument};
//! use kaleido_core::{build_plan, diff};
//!
//! let user = Model::new(
//!     ModelName::new("User").unwrap(),
//!     vec![Field::new(FieldName::new("email").unwrap(), PrimitiveType::String.into())],
//! )
//! .unwrap();
//! let current = SchemaDocument::from_models([user]).unwrap();
//!
//! let changes = diff(&SchemaDocument::new(), &current);
//! let plan = build_plan(changes);
//! assert_eq!(plan.operations[0].table(), "users");
//! ```

pub mod diff;
pub mod error;
pub mod plan;
pub mod snapshot;
pub mod types;

pub use diff::{diff, Change, ChangeSet, DiffEngine};
pub use error::SchemaError;
pub use plan::{build_plan, MigrationPlan, Operation, PlanBuilder, PlanDiagnostic, PlanOptions};
pub use snapshot::SnapshotError;
