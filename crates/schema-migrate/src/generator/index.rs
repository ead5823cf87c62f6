//! Index scripts, inline index clauses and duplicate handling.

use indexmap::IndexSet;
use tracing::trace;

use crate::core::{Index, Table};

use super::session::GenerationSession;
use super::{ObjectType, ScriptGenerator};

impl ScriptGenerator {
    /// Indexes still to be emitted for a table, with their positions.
    ///
    /// Later duplicates of an index are dropped, as are unique indexes
    /// already inlined into `CREATE TABLE` and the primary key's index
    /// when the primary key itself is generated.
    pub(super) fn pending_indexes<'t>(
        &self,
        table: &'t Table,
        session: &GenerationSession<'_>,
    ) -> Vec<(usize, &'t Index)> {
        let primary_covered = table.has_pk() && self.enabled(ObjectType::PrimaryKey);
        let mut kept: Vec<(usize, &Index)> = Vec::with_capacity(table.indexes.len());
        for (pos, index) in table.indexes.iter().enumerate() {
            if let Some((_, first)) = kept.iter().find(|(_, k)| index.is_duplicate_of(k)) {
                trace!(
                    "Index {} on table {} skipped as index {} with column(s) {} is added already",
                    index.name,
                    table.name,
                    first.name,
                    self.column_list(&index.columns)
                );
                continue;
            }
            kept.push((pos, index));
        }
        kept.retain(|(pos, index)| {
            !session.is_consumed(&table.name, *pos) && !(index.primary && primary_covered)
        });
        kept
    }

    /// Inline form used inside `CREATE TABLE`.
    pub(super) fn index_clause(&self, index: &Index) -> String {
        if index.unique {
            format!(
                "CONSTRAINT {} UNIQUE ({})",
                self.ident(&index.name),
                self.column_list(&index.columns)
            )
        } else {
            format!(
                "INDEX {} ({})",
                self.ident(&index.name),
                self.column_list(&index.columns)
            )
        }
    }

    fn index_target(&self, table: &Table, index: &Index) -> String {
        format!(
            "{} ON {} ({})",
            self.ident(&index.name),
            self.qualified_name(&table.name),
            self.column_list(&index.columns)
        )
    }

    pub(super) fn create_index_script(&self, table: &Table, index: &Index) -> String {
        let unique = if index.unique { "UNIQUE " } else { "" };
        format!("CREATE {}INDEX {}", unique, self.index_target(table, index))
    }

    /// One statement creating several non-unique indexes.
    fn create_multiple_indexes_script(&self, table: &Table, indexes: &[&Index]) -> Option<String> {
        match indexes {
            [] => None,
            [index] => Some(self.create_index_script(table, index)),
            _ => {
                let targets: Vec<String> = indexes
                    .iter()
                    .map(|index| self.index_target(table, index))
                    .collect();
                Some(format!("CREATE INDEX {}", targets.join(", ")))
            }
        }
    }

    /// Standalone index statements for indexes not rendered inline.
    pub(super) fn add_create_index_scripts(
        &self,
        tables: &[&Table],
        session: &mut GenerationSession<'_>,
    ) {
        if self.enabled(ObjectType::Table) && self.dialect.supports_index_in_create_table() {
            return;
        }
        let mut scripts = IndexSet::new();
        for &table in tables {
            let pending = self.pending_indexes(table, session);
            if self.dialect.supports_create_multiple_indexes() {
                let (unique, plain): (Vec<&Index>, Vec<&Index>) =
                    pending.into_iter().map(|(_, i)| i).partition(|i| i.unique);
                for index in unique {
                    scripts.insert(self.create_index_script(table, index));
                }
                if let Some(script) = self.create_multiple_indexes_script(table, &plain) {
                    scripts.insert(script);
                }
            } else {
                for (_, index) in pending {
                    scripts.insert(self.create_index_script(table, index));
                }
            }
        }
        session.extend(scripts);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::{type_code, Column, PrimaryKey, QualifiedName};
    use crate::dialect::GenericDialect;
    use crate::generator::GeneratorOptions;

    fn make_generator(dialect: GenericDialect, options: GeneratorOptions) -> ScriptGenerator {
        ScriptGenerator::new(Arc::new(dialect), options)
    }

    fn make_table() -> Table {
        let mut table = Table::new(QualifiedName::new("events"));
        table
            .add_column(Column::new("id", type_code::INTEGER, "int").not_null())
            .add_column(Column::new("kind", type_code::INTEGER, "int"))
            .add_column(Column::new("at", type_code::TIMESTAMP, "datetime"));
        table.set_primary_key(PrimaryKey::new(Some("pk_events"), ["id"]));
        table
            .add_index(Index::new("pk_events", ["id"]).primary())
            .add_index(Index::new("ix_kind", ["kind"]))
            .add_index(Index::new("ix_kind_again", ["kind"]))
            .add_index(Index::new("ix_at", ["at"]))
            .add_index(Index::new("ux_kind_at", ["kind", "at"]).unique());
        table
    }

    #[test]
    fn test_pending_skips_duplicates_and_covered_primary() {
        let generator = make_generator(GenericDialect::new(), GeneratorOptions::default());
        let table = make_table();
        let session = GenerationSession::new(&[], generator.dialect().case_sensitivity());
        let names: Vec<&str> = generator
            .pending_indexes(&table, &session)
            .iter()
            .map(|(_, i)| i.name.as_str())
            .collect();
        assert_eq!(names, vec!["ix_kind", "ix_at", "ux_kind_at"]);
    }

    #[test]
    fn test_primary_index_kept_when_primary_key_disabled() {
        let generator = make_generator(
            GenericDialect::new(),
            GeneratorOptions::default().without(ObjectType::PrimaryKey),
        );
        let table = make_table();
        let session = GenerationSession::new(&[], generator.dialect().case_sensitivity());
        let pending = generator.pending_indexes(&table, &session);
        assert_eq!(pending[0].1.name.as_str(), "pk_events");
        assert_eq!(
            generator.create_index_script(&table, pending[0].1),
            "CREATE UNIQUE INDEX pk_events ON events (id)"
        );
    }

    #[test]
    fn test_multiple_indexes_batched() {
        let mut dialect = GenericDialect::new();
        dialect.capabilities_mut().create_multiple_indexes = true;
        let generator = make_generator(dialect, GeneratorOptions::default());
        let table = make_table();
        let tables = std::slice::from_ref(&table);
        let mut session = GenerationSession::new(tables, generator.dialect().case_sensitivity());
        generator.add_create_index_scripts(&[&table], &mut session);
        assert_eq!(
            session.into_scripts(),
            vec![
                "CREATE UNIQUE INDEX ux_kind_at ON events (kind, at)".to_string(),
                "CREATE INDEX ix_kind ON events (kind), ix_at ON events (at)".to_string(),
            ]
        );
    }

    #[test]
    fn test_inline_indexes_suppress_standalone() {
        let mut dialect = GenericDialect::new();
        dialect.capabilities_mut().index_in_create_table = true;
        let generator = make_generator(dialect, GeneratorOptions::default());
        let tables = vec![make_table()];
        let scripts = generator.create_scripts(&tables).unwrap();
        assert_eq!(
            scripts,
            vec![
                "CREATE TABLE events (id INTEGER NOT NULL, kind INTEGER, at TIMESTAMP, \
                 CONSTRAINT pk_events PRIMARY KEY (id), INDEX ix_kind (kind), INDEX ix_at (at), \
                 CONSTRAINT ux_kind_at UNIQUE (kind, at))"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_consumed_unique_not_recreated() {
        let generator = make_generator(GenericDialect::new(), GeneratorOptions::default());
        let mut table = Table::new(QualifiedName::new("users"));
        table.add_column(
            Column::new("email", type_code::VARCHAR, "varchar")
                .with_size(80)
                .not_null(),
        );
        table
            .add_index(Index::new("ux_email", ["email"]).unique())
            .add_index(Index::new("ux_email_dup", ["email"]).unique());
        let scripts = generator.create_scripts(&[table]).unwrap();
        assert_eq!(
            scripts,
            vec!["CREATE TABLE users (email VARCHAR(80) NOT NULL UNIQUE)".to_string()]
        );
    }
}
