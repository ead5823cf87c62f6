//! CREATE TABLE / DROP TABLE scripts.

use crate::core::type_code::type_code_name;
use crate::core::{Column, Table};
use crate::error::{MigrateError, Result};

use super::session::GenerationSession;
use super::{ObjectType, ScriptGenerator};

impl ScriptGenerator {
    /// Generate table DDL with inline constraints.
    ///
    /// Fails when a column type has no name in the target dialect.
    pub(super) fn create_table_script(
        &self,
        table: &Table,
        session: &mut GenerationSession<'_>,
    ) -> Result<String> {
        let mut definitions = Vec::with_capacity(table.columns.len() + 1);
        for column in &table.columns {
            definitions.push(self.column_definition(table, column, session)?);
        }

        if self.enabled(ObjectType::PrimaryKey) {
            if let Some(pk) = &table.primary_key {
                definitions.push(self.primary_key_clause(pk));
            }
        }

        if self.enabled(ObjectType::Index) && self.dialect.supports_index_in_create_table() {
            for (_, index) in self.pending_indexes(table, session) {
                definitions.push(self.index_clause(index));
            }
        }

        if self.enabled(ObjectType::TableCheck) && self.dialect.supports_table_check() {
            for check in &table.checks {
                definitions.push(self.check_clause(check));
            }
        }

        let mut sql = format!(
            "CREATE TABLE {} ({})",
            self.qualified_name(&table.name),
            definitions.join(", ")
        );
        if let Some(comment) = table.comment.as_deref().filter(|c| !c.is_empty()) {
            if let Some(fragment) = self.dialect.table_comment(comment) {
                sql.push_str(&fragment);
            }
        }
        Ok(sql)
    }

    fn column_definition(
        &self,
        table: &Table,
        column: &Column,
        session: &mut GenerationSession<'_>,
    ) -> Result<String> {
        let mut sql = format!(
            "{} {}",
            self.ident(&column.name),
            self.column_type(table, column)?
        );

        if column.identity && self.enabled(ObjectType::AutoIncrement) {
            let sequence = column.sequence.as_ref().map(|s| self.qualified_name(s));
            sql.push(' ');
            sql.push_str(&self.dialect.identity_clause(sequence.as_deref()));
        }

        if let Some(default) = &column.default_value {
            sql.push_str(" DEFAULT ");
            sql.push_str(&self.translate(default));
        }

        if column.nullable {
            sql.push_str(self.dialect.null_column_string());
        } else {
            sql.push_str(" NOT NULL");
        }

        if self.enabled(ObjectType::Index) {
            let case = self.dialect.case_sensitivity();
            let unique = table
                .indexes
                .iter()
                .enumerate()
                .find(|(pos, index)| {
                    index.is_single_column_unique_on(&column.name, case)
                        && !session.is_consumed(&table.name, *pos)
                })
                .map(|(pos, _)| pos);
            if let Some(pos) = unique {
                let allowed = !column.nullable || self.dialect.supports_not_null_unique();
                if allowed && self.dialect.supports_unique_in_create_table() {
                    sql.push_str(" UNIQUE");
                    session.consume_index(&table.name, pos);
                }
            }
        }

        if self.enabled(ObjectType::ColumnCheck) && self.dialect.supports_column_check() {
            if let Some(check) = &column.check {
                sql.push_str(" CHECK ");
                sql.push_str(&self.dialect.column_check(check));
            }
        }

        if let Some(comment) = column.comment.as_deref().filter(|c| !c.is_empty()) {
            if let Some(fragment) = self.dialect.column_comment(comment) {
                sql.push_str(&fragment);
            }
        }

        Ok(sql)
    }

    /// Map a column to the dialect's type name.
    fn column_type(&self, table: &Table, column: &Column) -> Result<String> {
        let scale = if column.scale < 0 && !self.dialect.supports_negative_scale() {
            0
        } else {
            column.scale
        };
        self.dialect
            .type_name(column.type_code, column.size, column.precision, scale)
            .ok_or_else(|| {
                let type_name = if column.type_name.is_empty() {
                    type_code_name(column.type_code).unwrap_or("UNKNOWN")
                } else {
                    column.type_name.as_str()
                };
                MigrateError::unsupported_type(
                    type_name,
                    column.type_code,
                    column.size,
                    table.full_name(),
                    column.name.as_str(),
                )
            })
    }

    pub(super) fn drop_table_script(&self, table: &Table) -> String {
        let mut sql = String::from("DROP TABLE ");
        let if_exists_before = self.dialect.supports_if_exists_before_drop_table();
        if if_exists_before {
            sql.push_str("IF EXISTS ");
        }
        sql.push_str(&self.qualified_name(&table.name));
        if let Some(cascade) = self.dialect.cascade_constraints_clause() {
            sql.push(' ');
            sql.push_str(&cascade);
        }
        if !if_exists_before && self.dialect.supports_if_exists_after_drop_table() {
            sql.push_str(" IF EXISTS");
        }
        sql
    }
}
