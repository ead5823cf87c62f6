//! Metadata model for tables, columns, indexes, keys, checks, triggers and sequences.
//!
//! The model is built once per migration run by an introspection step and is
//! read-only during script generation. Tables live in a [`Database`] arena and
//! refer to each other by [`QualifiedName`]; constraints refer to columns by
//! name.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MigrateError, Result};

use super::identifier::{CaseSensitivity, Identifier, QualifiedName};

/// Kind of table-like object, as reported by the source metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TableType {
    #[default]
    #[serde(rename = "TABLE")]
    Table,
    #[serde(rename = "VIEW")]
    View,
    #[serde(rename = "SYSTEM TABLE")]
    SystemTable,
    #[serde(rename = "GLOBAL TEMPORARY")]
    GlobalTemporary,
    #[serde(rename = "LOCAL TEMPORARY")]
    LocalTemporary,
    #[serde(rename = "ALIAS")]
    Alias,
    #[serde(rename = "SYNONYM")]
    Synonym,
}

impl TableType {
    pub const ALL: [TableType; 7] = [
        TableType::Table,
        TableType::View,
        TableType::SystemTable,
        TableType::GlobalTemporary,
        TableType::LocalTemporary,
        TableType::Alias,
        TableType::Synonym,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableType::Table => "TABLE",
            TableType::View => "VIEW",
            TableType::SystemTable => "SYSTEM TABLE",
            TableType::GlobalTemporary => "GLOBAL TEMPORARY",
            TableType::LocalTemporary => "LOCAL TEMPORARY",
            TableType::Alias => "ALIAS",
            TableType::Synonym => "SYNONYM",
        }
    }
}

impl FromStr for TableType {
    type Err = MigrateError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().replace('_', " ").to_uppercase();
        TableType::ALL
            .iter()
            .find(|t| t.as_str() == normalized)
            .copied()
            .ok_or_else(|| {
                let valid: Vec<_> = TableType::ALL.iter().map(TableType::as_str).collect();
                MigrateError::Config(format!(
                    "Unknown table type '{}'. Valid options: {}",
                    s,
                    valid.join(", ")
                ))
            })
    }
}

impl fmt::Display for TableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arena of tables indexed by qualified name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Database {
    tables: Vec<Table>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table, replacing any table with the same qualified name.
    pub fn add_table(&mut self, table: Table) -> &mut Table {
        let idx = match self.tables.iter().position(|t| t.name == table.name) {
            Some(idx) => {
                self.tables[idx] = table;
                idx
            }
            None => {
                self.tables.push(table);
                self.tables.len() - 1
            }
        };
        &mut self.tables[idx]
    }

    /// Tables in insertion order.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, name: &QualifiedName) -> Option<&Table> {
        self.tables.iter().find(|t| &t.name == name)
    }

    /// Look a table up under the dialect's case sensitivity.
    pub fn find_table(&self, name: &QualifiedName, case: CaseSensitivity) -> Option<&Table> {
        self.tables.iter().find(|t| t.name.matches(name, case))
    }
}

/// Table metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Qualified table name.
    pub name: QualifiedName,

    /// Table kind (ordinary table, view, ...).
    #[serde(default)]
    pub table_type: TableType,

    /// Columns in position order. Use [`Table::add_column`] to keep positions consistent.
    #[serde(default)]
    pub columns: Vec<Column>,

    /// Indexes, including the one backing the primary key if reported.
    #[serde(default)]
    pub indexes: Vec<Index>,

    #[serde(default)]
    pub primary_key: Option<PrimaryKey>,

    /// Foreign keys with this table as the referencing side.
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,

    /// Table-level check constraints.
    #[serde(default)]
    pub checks: Vec<Check>,

    #[serde(default)]
    pub triggers: Vec<Trigger>,

    /// Sequences owned by this table.
    #[serde(default)]
    pub sequences: Vec<Sequence>,

    #[serde(default)]
    pub comment: Option<String>,
}

impl Table {
    /// Create an empty ordinary table.
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            table_type: TableType::Table,
            columns: Vec::new(),
            indexes: Vec::new(),
            primary_key: None,
            foreign_keys: Vec::new(),
            checks: Vec::new(),
            triggers: Vec::new(),
            sequences: Vec::new(),
            comment: None,
        }
    }

    /// Get the fully qualified table name.
    pub fn full_name(&self) -> String {
        self.name.to_string()
    }

    /// Append a column, assigning the next 1-based position.
    pub fn add_column(&mut self, mut column: Column) -> &mut Self {
        column.position = self.columns.len() as u32 + 1;
        self.columns.push(column);
        self
    }

    pub fn add_index(&mut self, index: Index) -> &mut Self {
        self.indexes.push(index);
        self
    }

    pub fn set_primary_key(&mut self, primary_key: PrimaryKey) -> &mut Self {
        self.primary_key = Some(primary_key);
        self
    }

    pub fn add_foreign_key(&mut self, foreign_key: ForeignKey) -> &mut Self {
        self.foreign_keys.push(foreign_key);
        self
    }

    pub fn add_check(&mut self, check: Check) -> &mut Self {
        self.checks.push(check);
        self
    }

    pub fn add_trigger(&mut self, trigger: Trigger) -> &mut Self {
        self.triggers.push(trigger);
        self
    }

    pub fn add_sequence(&mut self, sequence: Sequence) -> &mut Self {
        self.sequences.push(sequence);
        self
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name.as_str() == name)
    }

    /// Check if the table has a primary key.
    pub fn has_pk(&self) -> bool {
        self.primary_key.is_some()
    }
}

/// Column metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: Identifier,

    /// JDBC-style type code, see [`crate::core::type_code`].
    pub type_code: i32,

    /// Native type name as reported by the source database.
    pub type_name: String,

    /// Maximum length for string/binary types.
    #[serde(default)]
    pub size: i64,

    #[serde(default)]
    pub precision: i32,

    #[serde(default)]
    pub scale: i32,

    #[serde(default = "default_true")]
    pub nullable: bool,

    /// Identity / auto-increment column.
    #[serde(default)]
    pub identity: bool,

    /// Sequence backing an identity column. Defined by the table, not owned by the column.
    #[serde(default)]
    pub sequence: Option<QualifiedName>,

    #[serde(default)]
    pub default_value: Option<String>,

    /// Column-level check clause.
    #[serde(default)]
    pub check: Option<String>,

    #[serde(default)]
    pub comment: Option<String>,

    /// Ordinal position (1-based).
    #[serde(default)]
    pub position: u32,
}

fn default_true() -> bool {
    true
}

impl Column {
    /// A nullable column with no size, precision or scale.
    pub fn new(name: impl Into<Identifier>, type_code: i32, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_code,
            type_name: type_name.into(),
            size: 0,
            precision: 0,
            scale: 0,
            nullable: true,
            identity: false,
            sequence: None,
            default_value: None,
            check: None,
            comment: None,
            position: 0,
        }
    }

    pub fn with_size(mut self, size: i64) -> Self {
        self.size = size;
        self
    }

    pub fn with_precision_scale(mut self, precision: i32, scale: i32) -> Self {
        self.precision = precision;
        self.scale = scale;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn identity(mut self) -> Self {
        self.identity = true;
        self
    }

    pub fn with_sequence(mut self, sequence: QualifiedName) -> Self {
        self.sequence = Some(sequence);
        self
    }

    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    pub fn with_check(mut self, check: impl Into<String>) -> Self {
        self.check = Some(check.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Primary key constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKey {
    #[serde(default)]
    pub name: Option<Identifier>,
    pub columns: Vec<Identifier>,
}

impl PrimaryKey {
    pub fn new<I, S>(name: Option<&str>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Identifier>,
    {
        Self {
            name: name.map(Identifier::from),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

/// Index metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub name: Identifier,

    /// Indexed column names, in key order.
    pub columns: Vec<Identifier>,

    #[serde(default)]
    pub unique: bool,

    /// Whether the index backs the primary key.
    #[serde(default)]
    pub primary: bool,
}

impl Index {
    pub fn new<I, S>(name: impl Into<Identifier>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Identifier>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            unique: false,
            primary: false,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self.unique = true;
        self
    }

    /// Same columns and flags; the name is not compared.
    pub fn is_duplicate_of(&self, other: &Index) -> bool {
        self.columns == other.columns
            && self.unique == other.unique
            && self.primary == other.primary
    }

    /// Single-column, non-primary unique index on `column`, compared under `case`.
    pub fn is_single_column_unique_on(
        &self,
        column: &Identifier,
        case: CaseSensitivity,
    ) -> bool {
        self.unique
            && !self.primary
            && self.columns.len() == 1
            && self.columns[0].matches(column, case)
    }
}

/// Foreign key referential action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferentialAction {
    #[default]
    NoAction,
    Cascade,
    SetNull,
    SetDefault,
    Restrict,
}

impl ReferentialAction {
    pub fn sql(&self) -> &'static str {
        match self {
            ReferentialAction::NoAction => "NO ACTION",
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::SetDefault => "SET DEFAULT",
            ReferentialAction::Restrict => "RESTRICT",
        }
    }
}

/// Foreign key deferrability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Deferrability {
    InitiallyDeferred,
    InitiallyImmediate,
    NotDeferrable,
}

impl Deferrability {
    pub fn sql(&self) -> &'static str {
        match self {
            Deferrability::InitiallyDeferred => "DEFERRABLE INITIALLY DEFERRED",
            Deferrability::InitiallyImmediate => "DEFERRABLE INITIALLY IMMEDIATE",
            Deferrability::NotDeferrable => "NOT DEFERRABLE",
        }
    }
}

/// One (source column, target column) pair of a foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForeignKeyReference {
    pub source_column: Identifier,
    pub target_column: Identifier,
}

/// Foreign key constraint.
///
/// References are keyed by their declared position, so pairs added out of
/// order still come back in key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    #[serde(default)]
    pub name: Option<Identifier>,

    /// Referencing table (owner of the source columns).
    pub foreign_table: QualifiedName,

    /// Referenced table (owner of the target columns).
    pub primary_table: QualifiedName,

    #[serde(default)]
    references: BTreeMap<u32, ForeignKeyReference>,

    #[serde(default)]
    pub update_action: ReferentialAction,

    #[serde(default)]
    pub delete_action: ReferentialAction,

    #[serde(default)]
    pub deferrability: Option<Deferrability>,
}

impl ForeignKey {
    pub fn new(
        name: Option<&str>,
        foreign_table: QualifiedName,
        primary_table: QualifiedName,
    ) -> Self {
        Self {
            name: name.map(Identifier::from),
            foreign_table,
            primary_table,
            references: BTreeMap::new(),
            update_action: ReferentialAction::NoAction,
            delete_action: ReferentialAction::NoAction,
            deferrability: None,
        }
    }

    /// Add a column pair at its declared position.
    pub fn add_reference(
        &mut self,
        source_column: impl Into<Identifier>,
        target_column: impl Into<Identifier>,
        position: u32,
    ) -> &mut Self {
        self.references.insert(
            position,
            ForeignKeyReference {
                source_column: source_column.into(),
                target_column: target_column.into(),
            },
        );
        self
    }

    /// References in position order.
    pub fn references(&self) -> impl Iterator<Item = &ForeignKeyReference> {
        self.references.values()
    }

    pub fn source_columns(&self) -> Vec<&Identifier> {
        self.references().map(|r| &r.source_column).collect()
    }

    pub fn target_columns(&self) -> Vec<&Identifier> {
        self.references().map(|r| &r.target_column).collect()
    }
}

/// Table-level check constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    #[serde(default)]
    pub name: Option<Identifier>,
    pub clause: String,
}

impl Check {
    pub fn new(name: Option<&str>, clause: impl Into<String>) -> Self {
        Self {
            name: name.map(Identifier::from),
            clause: clause.into(),
        }
    }
}

/// Row-level trigger or a synthetic trigger standing in for a computed column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerKind {
    #[default]
    Trigger,
    ColumnTrigger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerTiming {
    #[default]
    Before,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerEvent {
    #[default]
    Insert,
    Update,
    Delete,
}

/// Trigger metadata. The owning table is the [`Table`] holding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub name: Identifier,
    #[serde(default)]
    pub kind: TriggerKind,
    #[serde(default)]
    pub timing: TriggerTiming,
    #[serde(default)]
    pub event: TriggerEvent,
    pub body: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl Trigger {
    pub fn new(name: impl Into<Identifier>, kind: TriggerKind, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            timing: TriggerTiming::Before,
            event: TriggerEvent::Insert,
            body: body.into(),
            active: true,
        }
    }
}

/// Sequence metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    pub name: QualifiedName,
    #[serde(default)]
    pub start_with: Option<i64>,
    #[serde(default)]
    pub increment_by: Option<i64>,
    #[serde(default)]
    pub min_value: Option<i64>,
    #[serde(default)]
    pub max_value: Option<i64>,
    #[serde(default)]
    pub cycle: bool,
}

impl Sequence {
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            start_with: None,
            increment_by: None,
            min_value: None,
            max_value: None,
            cycle: false,
        }
    }
}
