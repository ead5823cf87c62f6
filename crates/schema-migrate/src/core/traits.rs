//! The dialect capability interface consumed by script generation.
//!
//! A [`Dialect`] answers yes/no questions about what SQL constructs the
//! target database accepts and renders the few fragments that differ in
//! spelling between databases (type names, identity clauses, comments).
//! The generator never branches on a dialect's name, only on these answers.
//!
//! # Design Pattern
//!
//! This is a **Strategy** pattern - each target database is a value
//! implementing the trait, so the generator stays dialect-agnostic and can be
//! tested with a fake capability set.

use super::identifier::{quote_with, CaseSensitivity};

/// SQL capability and rendering strategy for a target database.
pub trait Dialect: Send + Sync {
    /// Get the dialect identifier (e.g., "generic", "nuodb").
    fn name(&self) -> &str;

    /// Quote an identifier (table name, column name, etc.).
    fn quote_ident(&self, name: &str) -> String {
        quote_with(name, '"', '"')
    }

    /// Whether `word` must be quoted even under minimal quoting.
    fn is_reserved_word(&self, _word: &str) -> bool {
        false
    }

    /// How the database compares unquoted identifiers.
    fn case_sensitivity(&self) -> CaseSensitivity {
        CaseSensitivity::Sensitive
    }

    // ===== Capability queries =====

    fn supports_sequence(&self) -> bool;

    /// Single-column `UNIQUE` may be declared inline in `CREATE TABLE`.
    fn supports_unique_in_create_table(&self) -> bool;

    /// Indexes may be declared inline in `CREATE TABLE`.
    fn supports_index_in_create_table(&self) -> bool;

    /// Several indexes may be created by one statement.
    fn supports_create_multiple_indexes(&self) -> bool;

    /// A `UNIQUE` constraint is accepted on a nullable column.
    fn supports_not_null_unique(&self) -> bool;

    fn supports_column_check(&self) -> bool;

    fn supports_table_check(&self) -> bool;

    /// Constraints may be dropped with `ALTER TABLE ... DROP`.
    fn supports_drop_constraints(&self) -> bool;

    /// `DROP TABLE IF EXISTS name`
    fn supports_if_exists_before_drop_table(&self) -> bool;

    /// `DROP TABLE name IF EXISTS`
    fn supports_if_exists_after_drop_table(&self) -> bool;

    fn supports_negative_scale(&self) -> bool;

    // ===== Rendering =====

    /// Render a type name, or `None` when the dialect has no mapping for
    /// the (code, size, precision, scale) combination.
    fn type_name(&self, type_code: i32, size: i64, precision: i32, scale: i32) -> Option<String>;

    /// Clause appended to an identity column, given the backing sequence if any.
    fn identity_clause(&self, sequence: Option<&str>) -> String;

    /// Clause appended to `DROP TABLE`, e.g. `CASCADE CONSTRAINTS`.
    fn cascade_constraints_clause(&self) -> Option<String> {
        None
    }

    /// Appended to nullable columns. Empty for most databases.
    fn null_column_string(&self) -> &str {
        ""
    }

    /// Column comment fragment (including any leading space), or `None`
    /// when the dialect does not render comments.
    fn column_comment(&self, _comment: &str) -> Option<String> {
        None
    }

    /// Table comment fragment appended after the closing parenthesis.
    fn table_comment(&self, _comment: &str) -> Option<String> {
        None
    }

    /// Column check clause body, rendered after `CHECK `.
    fn column_check(&self, clause: &str) -> String {
        parenthesize(clause)
    }

    /// Table check clause body, rendered after `CHECK `.
    fn table_check(&self, clause: &str) -> String {
        parenthesize(clause)
    }

    /// Keywords for dropping a foreign key in `ALTER TABLE`.
    fn drop_foreign_key_clause(&self) -> &str {
        "DROP CONSTRAINT"
    }
}

/// Wrap a clause in parentheses unless it is already wrapped as a whole.
pub fn parenthesize(clause: &str) -> String {
    let trimmed = clause.trim();
    if is_wrapped(trimmed) {
        trimmed.to_string()
    } else {
        format!("({})", trimmed)
    }
}

fn is_wrapped(clause: &str) -> bool {
    if !(clause.starts_with('(') && clause.ends_with(')')) {
        return false;
    }
    // "(a) AND (b)" starts and ends with parens but is not wrapped as a whole
    let mut depth = 0i32;
    for (i, c) in clause.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 && i != clause.len() - 1 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}
