//! Schema script generation.
//!
//! [`ScriptGenerator`] turns [`Table`] metadata into ordered DDL statements
//! for a target [`Dialect`]. What is emitted is controlled by
//! [`GeneratorOptions`]:
//!
//! - `object_types`: enabled [`ObjectType`] categories
//! - `group_scripts_by`: per table ([`GroupScriptsBy::Table`]) or per
//!   category across all tables ([`GroupScriptsBy::MetaData`])
//! - `table_types`: table kinds included in the scripts
//!
//! Foreign keys are never inlined. A foreign key whose primary table has not
//! been created yet is deferred until that table is created, and anything
//! still pending at the end of the call is flushed unconditionally, so
//! cyclic references need no topological sort.
//!
//! # Example
//!
//! ```rust,ignore
//! let dialect = Arc::new(GenericDialect::new());
//! let generator = ScriptGenerator::new(dialect, GeneratorOptions::default());
//! for sql in generator.create_scripts(database.tables())? {
//!     println!("{};", sql);
//! }
//! ```

mod constraint;
mod index;
mod sequence;
mod session;
mod table;
mod trigger;

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::identifier::is_plain_identifier;
use crate::core::{
    Dialect, ForeignKey, Identifier, IdentifierQuoting, QualifiedName, Table, TableType,
};
use crate::error::{MigrateError, Result};
use crate::translate::{DatabaseInfo, Script, TranslationManager};

use session::GenerationSession;

/// Category of generated object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectType {
    Table,
    PrimaryKey,
    Index,
    ForeignKey,
    Trigger,
    ColumnTrigger,
    Sequence,
    /// Both column and table checks.
    Check,
    ColumnCheck,
    TableCheck,
    /// Identity clauses on identity columns.
    AutoIncrement,
}

impl ObjectType {
    pub const ALL: [ObjectType; 11] = [
        ObjectType::Table,
        ObjectType::PrimaryKey,
        ObjectType::Index,
        ObjectType::ForeignKey,
        ObjectType::Trigger,
        ObjectType::ColumnTrigger,
        ObjectType::Sequence,
        ObjectType::Check,
        ObjectType::ColumnCheck,
        ObjectType::TableCheck,
        ObjectType::AutoIncrement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Table => "TABLE",
            ObjectType::PrimaryKey => "PRIMARY_KEY",
            ObjectType::Index => "INDEX",
            ObjectType::ForeignKey => "FOREIGN_KEY",
            ObjectType::Trigger => "TRIGGER",
            ObjectType::ColumnTrigger => "COLUMN_TRIGGER",
            ObjectType::Sequence => "SEQUENCE",
            ObjectType::Check => "CHECK",
            ObjectType::ColumnCheck => "COLUMN_CHECK",
            ObjectType::TableCheck => "TABLE_CHECK",
            ObjectType::AutoIncrement => "AUTO_INCREMENT",
        }
    }

    /// Concrete categories this one stands for. `Check` covers both check kinds.
    fn expand(self) -> &'static [ObjectType] {
        match self {
            ObjectType::Check => &[ObjectType::ColumnCheck, ObjectType::TableCheck],
            ObjectType::Table => &[ObjectType::Table],
            ObjectType::PrimaryKey => &[ObjectType::PrimaryKey],
            ObjectType::Index => &[ObjectType::Index],
            ObjectType::ForeignKey => &[ObjectType::ForeignKey],
            ObjectType::Trigger => &[ObjectType::Trigger],
            ObjectType::ColumnTrigger => &[ObjectType::ColumnTrigger],
            ObjectType::Sequence => &[ObjectType::Sequence],
            ObjectType::ColumnCheck => &[ObjectType::ColumnCheck],
            ObjectType::TableCheck => &[ObjectType::TableCheck],
            ObjectType::AutoIncrement => &[ObjectType::AutoIncrement],
        }
    }
}

impl FromStr for ObjectType {
    type Err = MigrateError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().replace([' ', '-'], "_").to_uppercase();
        ObjectType::ALL
            .iter()
            .find(|t| t.as_str() == normalized)
            .copied()
            .ok_or_else(|| {
                let valid: Vec<_> = ObjectType::ALL.iter().map(ObjectType::as_str).collect();
                MigrateError::Config(format!(
                    "Unknown object type '{}'. Valid options: {}",
                    s,
                    valid.join(", ")
                ))
            })
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order in which scripts are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupScriptsBy {
    /// Every category of one table before the next table.
    #[default]
    Table,
    /// One category across all tables before the next category.
    MetaData,
}

impl FromStr for GroupScriptsBy {
    type Err = MigrateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "table" => Ok(GroupScriptsBy::Table),
            "meta_data" | "metadata" => Ok(GroupScriptsBy::MetaData),
            _ => Err(MigrateError::Config(format!(
                "Unknown group scripts by '{}'. Valid options: table, meta_data",
                s
            ))),
        }
    }
}

impl fmt::Display for GroupScriptsBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupScriptsBy::Table => write!(f, "table"),
            GroupScriptsBy::MetaData => write!(f, "meta_data"),
        }
    }
}

/// Options controlling script generation.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    object_types: HashSet<ObjectType>,
    group_scripts_by: GroupScriptsBy,
    table_types: HashSet<TableType>,
    identifier_quoting: IdentifierQuoting,
    /// Database the metadata was read from; default values are translated
    /// from it when a translation manager is attached.
    source: Option<DatabaseInfo>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            object_types: HashSet::new(),
            group_scripts_by: GroupScriptsBy::Table,
            table_types: HashSet::from([TableType::Table]),
            identifier_quoting: IdentifierQuoting::Minimal,
            source: None,
        }
        .with_object_types(ObjectType::ALL)
    }
}

impl GeneratorOptions {
    /// Replace the enabled categories.
    pub fn with_object_types(mut self, types: impl IntoIterator<Item = ObjectType>) -> Self {
        self.object_types = types
            .into_iter()
            .flat_map(|t| t.expand().iter().copied())
            .collect();
        self
    }

    /// Disable a category (and, for `Check`, both check kinds).
    pub fn without(mut self, object_type: ObjectType) -> Self {
        for t in object_type.expand() {
            self.object_types.remove(t);
        }
        self
    }

    pub fn with_group_scripts_by(mut self, group_scripts_by: GroupScriptsBy) -> Self {
        self.group_scripts_by = group_scripts_by;
        self
    }

    pub fn with_table_types(mut self, types: impl IntoIterator<Item = TableType>) -> Self {
        self.table_types = types.into_iter().collect();
        self
    }

    pub fn with_identifier_quoting(mut self, quoting: IdentifierQuoting) -> Self {
        self.identifier_quoting = quoting;
        self
    }

    pub fn with_source(mut self, source: DatabaseInfo) -> Self {
        self.source = Some(source);
        self
    }

    pub fn group_scripts_by(&self) -> GroupScriptsBy {
        self.group_scripts_by
    }

    pub fn table_types(&self) -> &HashSet<TableType> {
        &self.table_types
    }

    pub fn identifier_quoting(&self) -> IdentifierQuoting {
        self.identifier_quoting
    }

    pub fn source(&self) -> Option<&DatabaseInfo> {
        self.source.as_ref()
    }

    /// Whether a category is enabled. `Check` is enabled when both check kinds are.
    pub fn is_enabled(&self, object_type: ObjectType) -> bool {
        object_type
            .expand()
            .iter()
            .all(|t| self.object_types.contains(t))
    }

    /// Whether tables of this kind are included.
    pub fn accepts(&self, table: &Table) -> bool {
        self.table_types.contains(&table.table_type)
    }
}

/// Generates ordered CREATE and DROP scripts for a set of tables.
///
/// Each call owns its own [`GenerationSession`], so one generator can be
/// shared between threads.
pub struct ScriptGenerator {
    dialect: Arc<dyn Dialect>,
    options: GeneratorOptions,
    translations: Option<Arc<TranslationManager>>,
    target: DatabaseInfo,
}

impl ScriptGenerator {
    pub fn new(dialect: Arc<dyn Dialect>, options: GeneratorOptions) -> Self {
        let target = DatabaseInfo::new(dialect.name());
        Self {
            dialect,
            options,
            translations: None,
            target,
        }
    }

    /// Attach a translation manager used for column default values.
    pub fn with_translations(mut self, translations: Arc<TranslationManager>) -> Self {
        self.translations = Some(translations);
        self
    }

    /// Override the target descriptor used for translations
    /// (defaults to the dialect name).
    pub fn with_target(mut self, target: DatabaseInfo) -> Self {
        self.target = target;
        self
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// CREATE statements for the tables, foreign keys ordered after the
    /// tables they reference where possible.
    pub fn create_scripts(&self, tables: &[Table]) -> Result<Vec<String>> {
        debug!(
            "Generating create scripts for {} tables grouped by {}",
            tables.len(),
            self.options.group_scripts_by()
        );
        let accepted = self.accepted_tables(tables);
        let mut session = self.session(tables);
        match self.options.group_scripts_by() {
            GroupScriptsBy::Table => {
                for table in &accepted {
                    self.add_create_scripts(&[*table], &mut session)?;
                }
            }
            GroupScriptsBy::MetaData => self.add_create_scripts(&accepted, &mut session)?,
        }
        self.flush_foreign_keys(&mut session, true);
        let scripts = session.into_scripts();
        info!("Generated {} create scripts", scripts.len());
        Ok(scripts)
    }

    /// DROP statements: foreign keys, triggers, tables, then sequences.
    pub fn drop_scripts(&self, tables: &[Table]) -> Result<Vec<String>> {
        debug!(
            "Generating drop scripts for {} tables grouped by {}",
            tables.len(),
            self.options.group_scripts_by()
        );
        let accepted = self.accepted_tables(tables);
        let mut session = self.session(tables);
        match self.options.group_scripts_by() {
            GroupScriptsBy::Table => {
                for table in &accepted {
                    self.add_drop_scripts(&[*table], &mut session);
                }
            }
            GroupScriptsBy::MetaData => self.add_drop_scripts(&accepted, &mut session),
        }
        let scripts = session.into_scripts();
        info!("Generated {} drop scripts", scripts.len());
        Ok(scripts)
    }

    /// DROP then CREATE statements: per table for [`GroupScriptsBy::Table`],
    /// whole set for [`GroupScriptsBy::MetaData`].
    pub fn drop_create_scripts(&self, tables: &[Table]) -> Result<Vec<String>> {
        debug!(
            "Generating drop-create scripts for {} tables grouped by {}",
            tables.len(),
            self.options.group_scripts_by()
        );
        let accepted = self.accepted_tables(tables);
        let mut session = self.session(tables);
        match self.options.group_scripts_by() {
            GroupScriptsBy::Table => {
                for table in &accepted {
                    self.add_drop_scripts(&[*table], &mut session);
                    self.add_create_scripts(&[*table], &mut session)?;
                }
            }
            GroupScriptsBy::MetaData => {
                self.add_drop_scripts(&accepted, &mut session);
                self.add_create_scripts(&accepted, &mut session)?;
            }
        }
        self.flush_foreign_keys(&mut session, true);
        let scripts = session.into_scripts();
        info!("Generated {} drop-create scripts", scripts.len());
        Ok(scripts)
    }

    fn session<'a>(&self, tables: &'a [Table]) -> GenerationSession<'a> {
        GenerationSession::new(tables, self.dialect.case_sensitivity())
    }

    fn accepted_tables<'a>(&self, tables: &'a [Table]) -> Vec<&'a Table> {
        tables.iter().filter(|t| self.options.accepts(t)).collect()
    }

    fn enabled(&self, object_type: ObjectType) -> bool {
        self.options.is_enabled(object_type)
    }

    /// Create steps in dependency order for a batch of tables.
    fn add_create_scripts<'a>(
        &self,
        tables: &[&'a Table],
        session: &mut GenerationSession<'a>,
    ) -> Result<()> {
        if self.enabled(ObjectType::Sequence) && self.dialect.supports_sequence() {
            for table in tables {
                for sequence in &table.sequences {
                    session.push(self.create_sequence_script(sequence));
                }
            }
        }

        for &table in tables {
            if self.enabled(ObjectType::Table) {
                let script = self.create_table_script(table, session)?;
                session.push(script);
            }
            // Tables excluded by category still count as existing for key ordering
            session.mark_created(&table.name);
        }

        if self.enabled(ObjectType::PrimaryKey) && !self.enabled(ObjectType::Table) {
            let scripts: IndexSet<String> = tables
                .iter()
                .filter_map(|t| {
                    t.primary_key
                        .as_ref()
                        .map(|pk| self.create_primary_key_script(t, pk))
                })
                .collect();
            session.extend(scripts);
        }

        if self.enabled(ObjectType::Index) {
            self.add_create_index_scripts(tables, session);
        }

        if self.enabled(ObjectType::Trigger) || self.enabled(ObjectType::ColumnTrigger) {
            let scripts: IndexSet<String> = tables
                .iter()
                .flat_map(|t| {
                    t.triggers
                        .iter()
                        .filter(|tr| self.trigger_enabled(tr))
                        .map(move |tr| self.create_trigger_script(t, tr))
                })
                .collect();
            session.extend(scripts);
        }

        if self.enabled(ObjectType::ForeignKey) {
            for &table in tables {
                for foreign_key in &table.foreign_keys {
                    if !self.foreign_key_tables_accepted(foreign_key, session) {
                        continue;
                    }
                    if session.is_created(&foreign_key.primary_table) {
                        session.push(self.create_foreign_key_script(foreign_key));
                    } else {
                        session.defer(foreign_key);
                    }
                }
            }
        }

        self.flush_foreign_keys(session, false);
        Ok(())
    }

    /// Emit deferred foreign keys whose primary table exists, or all of
    /// them when `force` is set.
    fn flush_foreign_keys(&self, session: &mut GenerationSession<'_>, force: bool) {
        if !self.enabled(ObjectType::ForeignKey) {
            return;
        }
        if force && session.deferred_count() > 0 {
            debug!(
                "Emitting {} foreign keys whose primary table was not created",
                session.deferred_count()
            );
        }
        for foreign_key in session.take_deferred(force) {
            let script = self.create_foreign_key_script(foreign_key);
            session.push(script);
        }
    }

    /// Both ends of a foreign key must be of an accepted table kind when
    /// they are part of the input.
    fn foreign_key_tables_accepted(
        &self,
        foreign_key: &ForeignKey,
        session: &GenerationSession<'_>,
    ) -> bool {
        [&foreign_key.primary_table, &foreign_key.foreign_table]
            .into_iter()
            .filter_map(|name| session.table(name))
            .all(|t| self.options.accepts(t))
    }

    fn add_drop_scripts<'a>(&self, tables: &[&'a Table], session: &mut GenerationSession<'a>) {
        if self.enabled(ObjectType::ForeignKey) && self.dialect.supports_drop_constraints() {
            for table in tables {
                for foreign_key in &table.foreign_keys {
                    if let Some(script) = self.drop_foreign_key_script(foreign_key) {
                        session.push(script);
                    }
                }
            }
        }

        for table in tables {
            let scripts: IndexSet<String> = table
                .triggers
                .iter()
                .filter(|tr| self.trigger_enabled(tr))
                .map(|tr| self.drop_trigger_script(tr))
                .collect();
            session.extend(scripts);
        }

        if self.enabled(ObjectType::Table) {
            for table in tables {
                session.push(self.drop_table_script(table));
            }
        }

        if self.enabled(ObjectType::Sequence) && self.dialect.supports_sequence() {
            for table in tables {
                for sequence in &table.sequences {
                    session.push(self.drop_sequence_script(sequence));
                }
            }
        }
    }

    // ===== Naming =====

    /// Render a name under the configured quoting mode.
    pub fn quote_name(&self, name: &str) -> String {
        match self.options.identifier_quoting() {
            IdentifierQuoting::Minimal
                if is_plain_identifier(name) && !self.dialect.is_reserved_word(name) =>
            {
                name.to_string()
            }
            _ => self.dialect.quote_ident(name),
        }
    }

    fn ident(&self, identifier: &Identifier) -> String {
        self.quote_name(identifier.as_str())
    }

    fn qualified_name(&self, name: &QualifiedName) -> String {
        name.parts()
            .map(|part| self.ident(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    fn column_list<'i>(&self, columns: impl IntoIterator<Item = &'i Identifier>) -> String {
        columns
            .into_iter()
            .map(|c| self.ident(c))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Translate a source-dialect fragment into the target dialect, or
    /// return it unchanged.
    fn translate(&self, sql: &str) -> String {
        match (&self.translations, self.options.source()) {
            (Some(manager), Some(source)) => {
                manager.translate(&Script::new(sql, source.clone()), &self.target)
            }
            _ => sql.to_string(),
        }
    }
}
