//! Primary key, foreign key and check constraint scripts.

use crate::core::{Check, ForeignKey, Identifier, PrimaryKey, ReferentialAction, Table};

use super::ScriptGenerator;

impl ScriptGenerator {
    fn constraint_prefix(&self, name: Option<&Identifier>) -> String {
        name.map(|n| format!("CONSTRAINT {} ", self.ident(n)))
            .unwrap_or_default()
    }

    /// `[CONSTRAINT name] PRIMARY KEY (cols)`
    pub(super) fn primary_key_clause(&self, pk: &PrimaryKey) -> String {
        format!(
            "{}PRIMARY KEY ({})",
            self.constraint_prefix(pk.name.as_ref()),
            self.column_list(&pk.columns)
        )
    }

    pub(super) fn create_primary_key_script(&self, table: &Table, pk: &PrimaryKey) -> String {
        format!(
            "ALTER TABLE {} ADD {}",
            self.qualified_name(&table.name),
            self.primary_key_clause(pk)
        )
    }

    /// `[CONSTRAINT name] CHECK (clause)`
    pub(super) fn check_clause(&self, check: &Check) -> String {
        format!(
            "{}CHECK {}",
            self.constraint_prefix(check.name.as_ref()),
            self.dialect.table_check(&check.clause)
        )
    }

    pub(super) fn create_foreign_key_script(&self, fk: &ForeignKey) -> String {
        let mut sql = format!(
            "ALTER TABLE {} ADD {}FOREIGN KEY ({}) REFERENCES {}({})",
            self.qualified_name(&fk.foreign_table),
            self.constraint_prefix(fk.name.as_ref()),
            self.column_list(fk.source_columns()),
            self.qualified_name(&fk.primary_table),
            self.column_list(fk.target_columns())
        );
        if fk.update_action != ReferentialAction::NoAction {
            sql.push_str(" ON UPDATE ");
            sql.push_str(fk.update_action.sql());
        }
        if fk.delete_action != ReferentialAction::NoAction {
            sql.push_str(" ON DELETE ");
            sql.push_str(fk.delete_action.sql());
        }
        if let Some(deferrability) = fk.deferrability {
            sql.push(' ');
            sql.push_str(deferrability.sql());
        }
        sql
    }

    /// Unnamed foreign keys cannot be addressed and yield no script.
    pub(super) fn drop_foreign_key_script(&self, fk: &ForeignKey) -> Option<String> {
        let name = fk.name.as_ref()?;
        Some(format!(
            "ALTER TABLE {} {} {}",
            self.qualified_name(&fk.foreign_table),
            self.dialect.drop_foreign_key_clause(),
            self.ident(name)
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::{Deferrability, QualifiedName};
    use crate::dialect::GenericDialect;
    use crate::generator::GeneratorOptions;

    fn make_generator() -> ScriptGenerator {
        ScriptGenerator::new(Arc::new(GenericDialect::new()), GeneratorOptions::default())
    }

    fn make_fk(name: Option<&str>) -> ForeignKey {
        let mut fk = ForeignKey::new(
            name,
            QualifiedName::with_schema("sales", "order_lines"),
            QualifiedName::with_schema("sales", "orders"),
        );
        fk.add_reference("order_no", "no", 2)
            .add_reference("region", "region", 1);
        fk
    }

    #[test]
    fn test_foreign_key_with_actions() {
        let mut fk = make_fk(Some("fk_lines_orders"));
        fk.delete_action = ReferentialAction::Cascade;
        fk.deferrability = Some(Deferrability::InitiallyDeferred);
        assert_eq!(
            make_generator().create_foreign_key_script(&fk),
            "ALTER TABLE sales.order_lines ADD CONSTRAINT fk_lines_orders \
             FOREIGN KEY (region, order_no) REFERENCES sales.orders(region, no) \
             ON DELETE CASCADE DEFERRABLE INITIALLY DEFERRED"
        );
    }

    #[test]
    fn test_drop_foreign_key() {
        let generator = make_generator();
        assert_eq!(
            generator
                .drop_foreign_key_script(&make_fk(Some("fk_lines_orders")))
                .unwrap(),
            "ALTER TABLE sales.order_lines DROP CONSTRAINT fk_lines_orders"
        );
        assert!(generator.drop_foreign_key_script(&make_fk(None)).is_none());
    }

    #[test]
    fn test_primary_key_scripts() {
        let generator = make_generator();
        let table = Table::new(QualifiedName::new("orders"));
        let named = PrimaryKey::new(Some("pk_orders"), ["region", "no"]);
        assert_eq!(
            generator.create_primary_key_script(&table, &named),
            "ALTER TABLE orders ADD CONSTRAINT pk_orders PRIMARY KEY (region, no)"
        );
        let unnamed = PrimaryKey::new(None, ["id"]);
        assert_eq!(generator.primary_key_clause(&unnamed), "PRIMARY KEY (id)");
    }

    #[test]
    fn test_check_clause() {
        let generator = make_generator();
        assert_eq!(
            generator.check_clause(&Check::new(None, "(qty > 0)")),
            "CHECK (qty > 0)"
        );
    }
}
