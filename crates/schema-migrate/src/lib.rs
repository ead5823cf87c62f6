//! # schema-migrate
//!
//! Cross-dialect schema script generation.
//!
//! This library turns database metadata into ordered DDL statements for a
//! target dialect:
//!
//! - **Metadata model** of tables, columns, keys, indexes, checks, triggers
//!   and sequences
//! - **Script generation** of create, drop and drop-create scripts, grouped
//!   per table or per object category, with foreign keys deferred until the
//!   tables they reference exist
//! - **Translation rules** rewriting source-dialect SQL fragments (default
//!   values and similar) for the target dialect
//! - **Exporters** writing the statements to memory or a file
//!
//! ## Example
//!
//! ```rust,no_run
//! use schema_migrate::{export_scripts, FileScriptExporter, GeneratorConfig};
//!
//! #[tokio::main]
//! async fn main() -> schema_migrate::Result<()> {
//!     let config = GeneratorConfig::load("generator.yaml")?;
//!     let generator = config.build_generator()?;
//!     let tables: Vec<schema_migrate::Table> = Vec::new();
//!     let scripts = generator.create_scripts(&tables)?;
//!     let mut exporter = FileScriptExporter::new("create.sql");
//!     export_scripts(&mut exporter, &scripts).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod dialect;
pub mod error;
pub mod exporter;
pub mod generator;
pub mod translate;

// Re-exports for convenient access
pub use config::{DialectConfig, GeneratorConfig, TranslationRule};
pub use crate::core::{
    Column, Database, Dialect, ForeignKey, Index, PrimaryKey, QualifiedName, Table, TableType,
};
pub use dialect::{Capabilities, GenericDialect};
pub use error::{MigrateError, Result};
pub use exporter::{
    export_scripts, CollectingExporter, CountingExporter, FileScriptExporter, ScriptExporter,
};
pub use generator::{GeneratorOptions, GroupScriptsBy, ObjectType, ScriptGenerator};
pub use translate::{DatabaseInfo, PatternTranslator, Script, TranslationManager, Translator};
