//! Type-name maps from type codes to dialect type names.
//!
//! Each entry maps a type code, optionally bounded by a maximum column size,
//! to a template. Templates may reference the column's size (`{N}`),
//! precision (`{P}`) and scale (`{S}`):
//!
//! ```text
//! VARCHAR, size <= 0   →  TEXT
//! VARCHAR              →  VARCHAR({N})
//! DECIMAL              →  DECIMAL({P},{S})
//! ```
//!
//! When several entries exist for a code, the one with the smallest bound
//! that still covers the size wins; unbounded entries are tried last.

use std::collections::HashMap;

use crate::core::type_code;

#[derive(Debug, Clone, PartialEq, Eq)]
struct TypeNameEntry {
    max_size: Option<i64>,
    template: String,
}

impl TypeNameEntry {
    fn covers(&self, size: i64) -> bool {
        self.max_size.map_or(true, |max| size <= max)
    }
}

/// Registry of type-name templates keyed by type code.
#[derive(Debug, Clone, Default)]
pub struct TypeNameMap {
    entries: HashMap<i32, Vec<TypeNameEntry>>,
}

impl TypeNameMap {
    /// Create a new empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard SQL names for the common type codes.
    pub fn standard() -> Self {
        let mut map = Self::new();
        map.add_type_name(type_code::BIT, "BOOLEAN");
        map.add_type_name(type_code::BOOLEAN, "BOOLEAN");
        map.add_type_name(type_code::TINYINT, "SMALLINT");
        map.add_type_name(type_code::SMALLINT, "SMALLINT");
        map.add_type_name(type_code::INTEGER, "INTEGER");
        map.add_type_name(type_code::BIGINT, "BIGINT");
        map.add_type_name(type_code::REAL, "REAL");
        map.add_type_name(type_code::FLOAT, "DOUBLE PRECISION");
        map.add_type_name(type_code::DOUBLE, "DOUBLE PRECISION");
        map.add_type_name(type_code::NUMERIC, "NUMERIC({P},{S})");
        map.add_type_name(type_code::DECIMAL, "DECIMAL({P},{S})");
        map.add_type_name(type_code::CHAR, "CHAR({N})");
        map.add_type_name(type_code::NCHAR, "NCHAR({N})");
        map.add_type_name_bounded(type_code::VARCHAR, 0, "CLOB");
        map.add_type_name(type_code::VARCHAR, "VARCHAR({N})");
        map.add_type_name_bounded(type_code::NVARCHAR, 0, "NCLOB");
        map.add_type_name(type_code::NVARCHAR, "NVARCHAR({N})");
        map.add_type_name(type_code::LONGVARCHAR, "CLOB");
        map.add_type_name(type_code::LONGNVARCHAR, "NCLOB");
        map.add_type_name(type_code::CLOB, "CLOB");
        map.add_type_name(type_code::NCLOB, "NCLOB");
        map.add_type_name(type_code::DATE, "DATE");
        map.add_type_name(type_code::TIME, "TIME");
        map.add_type_name(type_code::TIMESTAMP, "TIMESTAMP");
        map.add_type_name(type_code::TIME_WITH_TIMEZONE, "TIME WITH TIME ZONE");
        map.add_type_name(type_code::TIMESTAMP_WITH_TIMEZONE, "TIMESTAMP WITH TIME ZONE");
        map.add_type_name(type_code::BINARY, "BINARY({N})");
        map.add_type_name_bounded(type_code::VARBINARY, 0, "BLOB");
        map.add_type_name(type_code::VARBINARY, "VARBINARY({N})");
        map.add_type_name(type_code::LONGVARBINARY, "BLOB");
        map.add_type_name(type_code::BLOB, "BLOB");
        map.add_type_name(type_code::SQLXML, "XML");
        map
    }

    /// Register an unbounded template for a type code, replacing any
    /// previous unbounded template for that code.
    pub fn add_type_name(&mut self, type_code: i32, template: impl Into<String>) {
        self.insert(type_code, None, template.into());
    }

    /// Register a template used when the column size is at most `max_size`.
    pub fn add_type_name_bounded(
        &mut self,
        type_code: i32,
        max_size: i64,
        template: impl Into<String>,
    ) {
        self.insert(type_code, Some(max_size), template.into());
    }

    fn insert(&mut self, type_code: i32, max_size: Option<i64>, template: String) {
        let entries = self.entries.entry(type_code).or_default();
        entries.retain(|e| e.max_size != max_size);
        entries.push(TypeNameEntry { max_size, template });
        // Bounded entries ascending, unbounded last
        entries.sort_by_key(|e| e.max_size.unwrap_or(i64::MAX));
    }

    /// Check if any template is registered for a type code.
    pub fn has_type_code(&self, type_code: i32) -> bool {
        self.entries.contains_key(&type_code)
    }

    /// Render the type name for a column, or `None` if no entry covers it.
    pub fn type_name(
        &self,
        type_code: i32,
        size: i64,
        precision: i32,
        scale: i32,
    ) -> Option<String> {
        let entry = self
            .entries
            .get(&type_code)?
            .iter()
            .find(|e| e.covers(size))?;
        Some(expand_template(&entry.template, size, precision, scale))
    }
}

/// Substitute `{N}`, `{P}` and `{S}` in a type-name template.
fn expand_template(template: &str, size: i64, precision: i32, scale: i32) -> String {
    template
        .replace("{N}", &size.to_string())
        .replace("{P}", &precision.to_string())
        .replace("{S}", &scale.to_string())
}
