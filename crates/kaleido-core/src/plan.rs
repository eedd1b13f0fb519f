use std::collections::BTreeMap;
use std::fmt;

use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};

use crate::diff::{Change, ChangeSet};
use crate::types::{Field, FieldName, FieldType, Model, ModelName, SchemaDocument};

// ---------------------------------------------------------------------------
// StorageType
// ---------------------------------------------------------------------------

/// The storage class a column is created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageType {
    String,
    Integer,
    Boolean,
    Timestamp,
    Date,
    Json,
    Float,
}

impl StorageType {
    /// Resolves a DSL type token, including common aliases.
    ///
    /// Returns `None` for tokens outside the mapping table; callers fall
    /// back to `String` and record a diagnostic.
    pub fn resolve(type_name: &str) -> Option<Self> {
        let storage = match type_name {
            "string" | "text" | "char" | "varchar" => Self::String,
            "integer" | "int" | "bigint" | "smallint" | "tinyint" => Self::Integer,
            "boolean" => Self::Boolean,
            "datetime" | "timestamp" => Self::Timestamp,
            "date" => Self::Date,
            "json" | "jsonb" => Self::Json,
            "float" | "decimal" | "double" => Self::Float,
            _ => return None,
        };
        Some(storage)
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Timestamp => "timestamp",
            Self::Date => "date",
            Self::Json => "json",
            Self::Float => "float",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// TableNaming / PlanOptions
// ---------------------------------------------------------------------------

/// How model names become table names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableNaming {
    /// `UserProfile` becomes `user_profiles`.
    #[default]
    SnakePlural,
    /// The model name is used unchanged.
    AsDeclared,
}

impl TableNaming {
    pub fn table_name(&self, model: &ModelName) -> String {
        match self {
            Self::SnakePlural => pluralizer::pluralize(&model.as_str().to_snake_case(), 2, false),
            Self::AsDeclared => model.to_string(),
        }
    }
}

/// Options controlling plan construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOptions {
    pub table_naming: TableNaming,
    /// Report relationship targets that are not known models.
    /// Only takes effect when known models are supplied.
    pub check_references: bool,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            table_naming: TableNaming::default(),
            check_references: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// Constraint flags carried over from field attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConstraints {
    pub nullable: bool,
    /// Advisory only: the target may keep its own primary key convention.
    pub primary: bool,
    pub unique: bool,
    pub auto_increment: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// The model a relationship column points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Relation name: the field name without a trailing `_id`.
    pub relation: String,
    pub model: ModelName,
    pub table: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub storage: StorageType,
    pub constraints: ColumnConstraints,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<Reference>,
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.storage)?;
        let c = &self.constraints;
        if c.primary {
            write!(f, " primary")?;
        }
        if c.auto_increment {
            write!(f, " auto_increment")?;
        }
        if c.unique {
            write!(f, " unique")?;
        }
        if c.nullable {
            write!(f, " nullable")?;
        }
        if let Some(value) = &c.default {
            write!(f, " default({value})")?;
        }
        if let Some(r) = &self.references {
            write!(f, " -> {}({})", r.table, r.model)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// Change kinds that have no structural operation yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingKind {
    Drop,
    Update,
}

impl fmt::Display for PendingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Drop => write!(f, "drop"),
            Self::Update => write!(f, "update"),
        }
    }
}

/// A field whose definition differs between two versions of a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    pub name: FieldName,
    pub old: Field,
    pub new: Field,
}

/// Field-level description of an updated model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModelDelta {
    pub added: Vec<Field>,
    pub removed: Vec<FieldName>,
    pub changed: Vec<FieldChange>,
    /// The fields present in both versions appear in a different order.
    pub reordered: bool,
}

impl ModelDelta {
    /// Compares two versions of the same model field by field.
    pub fn between(old: &Model, new: &Model) -> Self {
        let added = new
            .fields()
            .filter(|f| old.field(f.name.as_str()).is_none())
            .cloned()
            .collect();
        let removed = old
            .field_names()
            .filter(|name| new.field(name.as_str()).is_none())
            .cloned()
            .collect();
        let changed = new
            .fields()
            .filter_map(|f| {
                let previous = old.field(f.name.as_str())?;
                (previous != f).then(|| FieldChange {
                    name: f.name.clone(),
                    old: previous.clone(),
                    new: f.clone(),
                })
            })
            .collect();
        let kept_old = old
            .field_names()
            .filter(|name| new.field(name.as_str()).is_some());
        let kept_new = new
            .field_names()
            .filter(|name| old.field(name.as_str()).is_some());
        let reordered = !kept_old.eq(kept_new);
        Self {
            added,
            removed,
            changed,
            reordered,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty() && !self.reordered
    }
}

/// One item of a migration plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Operation {
    /// Create a table for a new model.
    CreateTable {
        model: ModelName,
        table: String,
        columns: Vec<Column>,
    },
    /// A detected change that is surfaced but not turned into structure.
    Pending {
        kind: PendingKind,
        model: ModelName,
        table: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        delta: Option<ModelDelta>,
    },
}

impl Operation {
    pub fn model(&self) -> &ModelName {
        match self {
            Self::CreateTable { model, .. } | Self::Pending { model, .. } => model,
        }
    }

    pub fn table(&self) -> &str {
        match self {
            Self::CreateTable { table, .. } | Self::Pending { table, .. } => table,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateTable {
                model,
                table,
                columns,
            } => {
                write!(f, "CREATE TABLE '{table}' for '{model}' ({} columns)", columns.len())
            }
            Self::Pending {
                kind,
                model,
                table,
                delta,
            } => {
                write!(f, "PENDING {kind} '{model}' (table '{table}')")?;
                if let Some(delta) = delta {
                    write!(
                        f,
                        ": {} added, {} removed, {} changed",
                        delta.added.len(),
                        delta.removed.len(),
                        delta.changed.len()
                    )?;
                    if delta.reordered {
                        write!(f, ", reordered")?;
                    }
                }
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// PlanDiagnostic
// ---------------------------------------------------------------------------

/// Non-fatal findings recorded while building a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "diagnostic", rename_all = "snake_case")]
#[non_exhaustive]
pub enum PlanDiagnostic {
    /// A type token outside the mapping table was stored as a string.
    TypeFallback {
        model: ModelName,
        field: FieldName,
        type_name: String,
    },
    /// A relationship points at a model that is not part of the schema.
    UnresolvedReference {
        model: ModelName,
        field: FieldName,
        target: ModelName,
    },
    /// Several operations resolve to the same table name.
    TableNameCollision {
        table: String,
        models: Vec<ModelName>,
    },
}

impl fmt::Display for PlanDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeFallback {
                model,
                field,
                type_name,
            } => write!(
                f,
                "unknown type '{type_name}' on '{model}.{field}', stored as string"
            ),
            Self::UnresolvedReference {
                model,
                field,
                target,
            } => write!(f, "'{model}.{field}' references unknown model '{target}'"),
            Self::TableNameCollision { table, models } => {
                let names: Vec<&str> = models.iter().map(ModelName::as_str).collect();
                write!(f, "models {} all map to table '{table}'", names.join(", "))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// MigrationPlan
// ---------------------------------------------------------------------------

/// Ordered operations plus diagnostics, ready for a code generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationPlan {
    pub operations: Vec<Operation>,
    pub diagnostics: Vec<PlanDiagnostic>,
}

impl MigrationPlan {
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Iterates operations that were surfaced without structure.
    pub fn pending(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter().filter(|op| op.is_pending())
    }
}

impl fmt::Display for MigrationPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Migration plan ({} operations, {} pending)",
            self.operations.len(),
            self.pending().count()
        )?;
        for (i, op) in self.operations.iter().enumerate() {
            writeln!(f, "  {}. {op}", i + 1)?;
            if let Operation::CreateTable { columns, .. } = op {
                for column in columns {
                    writeln!(f, "       - {column}")?;
                }
            }
        }
        for diagnostic in &self.diagnostics {
            writeln!(f, "  warning: {diagnostic}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PlanBuilder
// ---------------------------------------------------------------------------

/// Turns a change set into a migration plan.
///
/// Creates become `CreateTable`; drops and updates become `Pending` items
/// so that nothing is silently lost.
#[derive(Debug, Clone, Default)]
pub struct PlanBuilder<'a> {
    options: PlanOptions,
    known_models: Option<&'a SchemaDocument>,
}

impl<'a> PlanBuilder<'a> {
    pub fn new(options: PlanOptions) -> Self {
        Self {
            options,
            known_models: None,
        }
    }

    /// Supplies the full current schema so relationship targets can be checked.
    pub fn with_known_models(mut self, document: &'a SchemaDocument) -> Self {
        self.known_models = Some(document);
        self
    }

    pub fn build(&self, changes: ChangeSet) -> MigrationPlan {
        let mut plan = MigrationPlan::default();
        for change in changes {
            let operation = match change {
                Change::CreateModel { model } => self.create_table(&model, &mut plan.diagnostics),
                Change::DropModel { name } => Operation::Pending {
                    kind: PendingKind::Drop,
                    table: self.options.table_naming.table_name(&name),
                    model: name,
                    delta: None,
                },
                Change::UpdateModel { name, old, new } => Operation::Pending {
                    kind: PendingKind::Update,
                    table: self.options.table_naming.table_name(&name),
                    model: name,
                    delta: Some(ModelDelta::between(&old, &new)),
                },
            };
            plan.operations.push(operation);
        }
        Self::detect_collisions(&mut plan);

        for diagnostic in &plan.diagnostics {
            tracing::warn!(%diagnostic, "plan diagnostic");
        }
        tracing::debug!(
            operations = plan.operations.len(),
            pending = plan.pending().count(),
            "built migration plan"
        );
        plan
    }

    fn create_table(&self, model: &Model, diagnostics: &mut Vec<PlanDiagnostic>) -> Operation {
        let columns = model
            .fields()
            .map(|field| self.column(model, field, diagnostics))
            .collect();
        Operation::CreateTable {
            model: model.name.clone(),
            table: self.options.table_naming.table_name(&model.name),
            columns,
        }
    }

    fn column(&self, model: &Model, field: &Field, diagnostics: &mut Vec<PlanDiagnostic>) -> Column {
        let attrs = &field.attributes;
        let constraints = ColumnConstraints {
            nullable: attrs.is_nullable(),
            primary: attrs.is_primary(),
            unique: attrs.is_unique(),
            auto_increment: attrs.is_auto_increment(),
            default: attrs.default_value().map(str::to_string),
        };

        if let FieldType::BelongsTo(target) = &field.field_type {
            self.check_reference(model, field, target, diagnostics);
            let raw = field.name.as_str();
            let relation = raw.strip_suffix("_id").filter(|r| !r.is_empty()).unwrap_or(raw);
            return Column {
                name: format!("{relation}_id"),
                storage: StorageType::Integer,
                constraints,
                references: Some(Reference {
                    relation: relation.to_string(),
                    model: target.clone(),
                    table: self.options.table_naming.table_name(target),
                }),
            };
        }

        let type_name = field.field_type.type_name();
        let storage = StorageType::resolve(type_name).unwrap_or_else(|| {
            diagnostics.push(PlanDiagnostic::TypeFallback {
                model: model.name.clone(),
                field: field.name.clone(),
                type_name: type_name.to_string(),
            });
            StorageType::String
        });
        Column {
            name: field.name.to_string(),
            storage,
            constraints,
            references: None,
        }
    }

    fn check_reference(
        &self,
        model: &Model,
        field: &Field,
        target: &ModelName,
        diagnostics: &mut Vec<PlanDiagnostic>,
    ) {
        if !self.options.check_references {
            return;
        }
        let Some(known) = self.known_models else {
            return;
        };
        if !known.contains(target.as_str()) {
            diagnostics.push(PlanDiagnostic::UnresolvedReference {
                model: model.name.clone(),
                field: field.name.clone(),
                target: target.clone(),
            });
        }
    }

    // Table names are compared case-insensitively so that `User` and `user`
    // are reported under `AsDeclared` as well.
    fn detect_collisions(plan: &mut MigrationPlan) {
        let mut by_table: BTreeMap<String, (String, Vec<ModelName>)> = BTreeMap::new();
        let mut order = Vec::new();
        for op in &plan.operations {
            let key = op.table().to_lowercase();
            let entry = by_table.entry(key.clone()).or_insert_with(|| {
                order.push(key);
                (op.table().to_string(), Vec::new())
            });
            if !entry.1.contains(op.model()) {
                entry.1.push(op.model().clone());
            }
        }
        for key in order {
            if let Some((table, models)) = by_table.remove(&key) {
                if models.len() > 1 {
                    plan.diagnostics
                        .push(PlanDiagnostic::TableNameCollision { table, models });
                }
            }
        }
    }
}

/// Builds a plan with default options and no reference checks.
pub fn build_plan(changes: ChangeSet) -> MigrationPlan {
    PlanBuilder::default().build(changes)
}
