//! Core abstractions for cross-dialect schema migration.
//!
//! This module provides the foundational types and traits used by script
//! generation:
//!
//! - [`schema`]: Table, column, key, index, check, trigger and sequence metadata
//! - [`identifier`]: Identifiers, qualified names and quoting helpers
//! - [`type_code`]: JDBC-style type codes carried by columns
//! - [`traits`]: The [`Dialect`] capability interface
//!
//! # Architecture
//!
//! The core module is database-agnostic. Target databases are represented
//! only by values implementing [`Dialect`]; the generator consults their
//! answers and never inspects which database it is talking to.

pub mod identifier;
pub mod schema;
pub mod traits;
pub mod type_code;

pub use identifier::{CaseSensitivity, Identifier, IdentifierQuoting, QualifiedName};
pub use schema::{
    Check, Column, Database, Deferrability, ForeignKey, ForeignKeyReference, Index, PrimaryKey,
    ReferentialAction, Sequence, Table, TableType, Trigger, TriggerEvent, TriggerKind,
    TriggerTiming,
};
pub use traits::Dialect;
