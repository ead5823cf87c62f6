//! Script generation integration tests.
//!
//! These tests drive the public generator API over small table sets and
//! check ordering, de-duplication and category gating across modules.

use std::sync::Arc;

use schema_migrate::core::type_code;
use schema_migrate::core::{CaseSensitivity, Check, Sequence, Trigger, TriggerKind};
use schema_migrate::{
    Capabilities, Column, ForeignKey, GeneratorConfig, GeneratorOptions, GenericDialect,
    GroupScriptsBy, Index, MigrateError, ObjectType, PrimaryKey, QualifiedName, ScriptGenerator,
    Table,
};

/// Route generator logs to the test output; filter with `RUST_LOG`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn make_generator(options: GeneratorOptions) -> ScriptGenerator {
    ScriptGenerator::new(Arc::new(GenericDialect::new()), options)
}

/// `name(id INTEGER NOT NULL, PRIMARY KEY (id))`
fn make_table(name: &str) -> Table {
    let mut table = Table::new(QualifiedName::new(name));
    table.add_column(Column::new("id", type_code::INTEGER, "int").not_null());
    table.set_primary_key(PrimaryKey::new(None, ["id"]));
    table
}

/// Add `<parent>_id` referencing `parent(id)`.
fn add_reference(table: &mut Table, parent: &str, fk_name: Option<&str>) {
    let column = format!("{}_id", parent);
    table.add_column(Column::new(column.as_str(), type_code::INTEGER, "int"));
    let mut fk = ForeignKey::new(fk_name, table.name.clone(), QualifiedName::new(parent));
    fk.add_reference(column.as_str(), "id", 1);
    table.add_foreign_key(fk);
}

fn count_matching(scripts: &[String], prefix: &str) -> usize {
    scripts.iter().filter(|s| s.starts_with(prefix)).count()
}

fn last_create_table(scripts: &[String]) -> usize {
    scripts
        .iter()
        .rposition(|s| s.starts_with("CREATE TABLE"))
        .unwrap()
}

fn first_foreign_key(scripts: &[String]) -> usize {
    scripts
        .iter()
        .position(|s| s.contains("FOREIGN KEY"))
        .unwrap()
}

// =============================================================================
// Dependency ordering
// =============================================================================

#[test]
fn test_two_table_cycle() {
    init_tracing();
    let mut a = make_table("a");
    add_reference(&mut a, "b", None);
    let mut b = make_table("b");
    add_reference(&mut b, "a", None);

    let scripts = make_generator(GeneratorOptions::default())
        .create_scripts(&[a, b])
        .unwrap();
    assert_eq!(scripts.len(), 4);
    assert!(last_create_table(&scripts) < first_foreign_key(&scripts));
    assert_eq!(count_matching(&scripts, "ALTER TABLE a ADD FOREIGN KEY"), 1);
    assert_eq!(count_matching(&scripts, "ALTER TABLE b ADD FOREIGN KEY"), 1);
}

#[test]
fn test_longer_cycle_in_both_groupings() {
    init_tracing();
    let names = ["t1", "t2", "t3", "t4"];
    let tables: Vec<Table> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let mut table = make_table(name);
            add_reference(&mut table, names[(i + 1) % names.len()], None);
            table
        })
        .collect();

    for grouping in [GroupScriptsBy::Table, GroupScriptsBy::MetaData] {
        let generator =
            make_generator(GeneratorOptions::default().with_group_scripts_by(grouping));
        let scripts = generator.create_scripts(&tables).unwrap();
        assert_eq!(count_matching(&scripts, "CREATE TABLE"), 4);
        assert_eq!(
            scripts.iter().filter(|s| s.contains("FOREIGN KEY")).count(),
            4,
            "grouping {}",
            grouping
        );
        assert!(last_create_table(&scripts) < first_foreign_key(&scripts));
    }
}

#[test]
fn test_self_reference_emitted_after_table() {
    let mut tree = make_table("tree");
    add_reference(&mut tree, "tree", Some("fk_tree_parent"));
    let scripts = make_generator(GeneratorOptions::default())
        .create_scripts(&[tree])
        .unwrap();
    assert_eq!(scripts.len(), 2);
    assert_eq!(
        scripts[1],
        "ALTER TABLE tree ADD CONSTRAINT fk_tree_parent FOREIGN KEY (tree_id) REFERENCES tree(id)"
    );
}

#[test]
fn test_parent_then_child_scenario() {
    let a = make_table("a");
    let mut b = make_table("b");
    add_reference(&mut b, "a", None);

    let scripts = make_generator(GeneratorOptions::default())
        .create_scripts(&[a, b])
        .unwrap();
    assert_eq!(
        scripts,
        vec![
            "CREATE TABLE a (id INTEGER NOT NULL, PRIMARY KEY (id))".to_string(),
            "CREATE TABLE b (id INTEGER NOT NULL, a_id INTEGER, PRIMARY KEY (id))".to_string(),
            "ALTER TABLE b ADD FOREIGN KEY (a_id) REFERENCES a(id)".to_string(),
        ]
    );
}

// =============================================================================
// De-duplication and inlining
// =============================================================================

#[test]
fn test_duplicate_indexes_collapse_to_one_statement() {
    init_tracing();
    let mut table = make_table("events");
    table.add_column(Column::new("kind", type_code::INTEGER, "int"));
    table
        .add_index(Index::new("ix_events_kind", ["kind"]))
        .add_index(Index::new("ix_events_kind_2", ["kind"]));

    let scripts = make_generator(GeneratorOptions::default())
        .create_scripts(&[table.clone()])
        .unwrap();
    assert_eq!(count_matching(&scripts, "CREATE INDEX"), 1);
    assert_eq!(scripts[1], "CREATE INDEX ix_events_kind ON events (kind)");

    let mut dialect = GenericDialect::new();
    dialect.capabilities_mut().index_in_create_table = true;
    let generator = ScriptGenerator::new(Arc::new(dialect), GeneratorOptions::default());
    let scripts = generator.create_scripts(&[table]).unwrap();
    assert_eq!(scripts.len(), 1);
    assert_eq!(scripts[0].matches("INDEX ix_events_kind").count(), 1);
    assert!(!scripts[0].contains("ix_events_kind_2"));
}

#[test]
fn test_duplicate_unique_indexes_inline_once() {
    let mut table = make_table("users");
    table.add_column(
        Column::new("email", type_code::VARCHAR, "varchar")
            .with_size(80)
            .not_null(),
    );
    table
        .add_index(Index::new("ux_users_email", ["email"]).unique())
        .add_index(Index::new("ux_users_email_2", ["email"]).unique());

    let scripts = make_generator(GeneratorOptions::default())
        .create_scripts(&[table])
        .unwrap();
    assert_eq!(
        scripts,
        vec![
            "CREATE TABLE users (id INTEGER NOT NULL, email VARCHAR(80) NOT NULL UNIQUE, PRIMARY KEY (id))"
                .to_string()
        ]
    );
}

#[test]
fn test_orders_scenario() {
    let mut dialect = GenericDialect::new();
    dialect.capabilities_mut().not_null_unique = true;
    let generator = ScriptGenerator::new(Arc::new(dialect), GeneratorOptions::default());

    let mut orders = Table::new(QualifiedName::new("orders"));
    orders
        .add_column(Column::new("id", type_code::INTEGER, "int").identity())
        .add_column(Column::new("customer_id", type_code::INTEGER, "int"))
        .add_index(Index::new("ux_orders_customer", ["customer_id"]).unique());

    let scripts = generator.create_scripts(&[orders]).unwrap();
    assert_eq!(
        scripts,
        vec![
            "CREATE TABLE orders (id INTEGER GENERATED BY DEFAULT AS IDENTITY, customer_id INTEGER UNIQUE)"
                .to_string()
        ]
    );
}

#[test]
fn test_nullable_unique_without_support_stays_standalone() {
    let mut orders = Table::new(QualifiedName::new("orders"));
    orders
        .add_column(Column::new("customer_id", type_code::INTEGER, "int"))
        .add_index(Index::new("ux_orders_customer", ["customer_id"]).unique());

    let scripts = make_generator(GeneratorOptions::default())
        .create_scripts(&[orders])
        .unwrap();
    assert_eq!(
        scripts,
        vec![
            "CREATE TABLE orders (customer_id INTEGER)".to_string(),
            "CREATE UNIQUE INDEX ux_orders_customer ON orders (customer_id)".to_string(),
        ]
    );
}

#[test]
fn test_inline_unique_follows_dialect_case() {
    let mut users = Table::new(QualifiedName::new("users"));
    users
        .add_column(Column::new("Email", type_code::INTEGER, "int").not_null())
        .add_index(Index::new("ux_users_email", ["EMAIL"]).unique());
    let tables = [users];

    let dialect = GenericDialect::new().with_case_sensitivity(CaseSensitivity::Insensitive);
    let generator = ScriptGenerator::new(Arc::new(dialect), GeneratorOptions::default());
    assert_eq!(
        generator.create_scripts(&tables).unwrap(),
        vec!["CREATE TABLE users (Email INTEGER NOT NULL UNIQUE)".to_string()]
    );

    // Exact-case dialects treat EMAIL as another column
    let scripts = make_generator(GeneratorOptions::default())
        .create_scripts(&tables)
        .unwrap();
    assert_eq!(
        scripts,
        vec![
            "CREATE TABLE users (Email INTEGER NOT NULL)".to_string(),
            "CREATE UNIQUE INDEX ux_users_email ON users (EMAIL)".to_string(),
        ]
    );
}

// =============================================================================
// Drop and drop-create
// =============================================================================

fn make_rich_table() -> Table {
    let mut table = make_table("invoices");
    add_reference(&mut table, "customers", Some("fk_invoices_customers"));
    table.add_index(Index::new("ix_invoices_customer", ["customers_id"]));
    table.add_trigger(Trigger::new(
        "trg_invoices_audit",
        TriggerKind::Trigger,
        "BEGIN END",
    ));
    table
}

#[test]
fn test_drop_order() {
    let scripts = make_generator(GeneratorOptions::default())
        .drop_scripts(&[make_rich_table()])
        .unwrap();
    assert_eq!(
        scripts,
        vec![
            "ALTER TABLE invoices DROP CONSTRAINT fk_invoices_customers".to_string(),
            "DROP TRIGGER trg_invoices_audit".to_string(),
            "DROP TABLE IF EXISTS invoices".to_string(),
        ]
    );
}

#[test]
fn test_drop_create_equals_drop_then_create() {
    let profiles = [
        Capabilities::default(),
        Capabilities {
            index_in_create_table: true,
            drop_constraints: false,
            if_exists_before_drop_table: false,
            if_exists_after_drop_table: true,
            ..Capabilities::default()
        },
        Capabilities {
            create_multiple_indexes: true,
            not_null_unique: true,
            sequence: false,
            ..Capabilities::default()
        },
    ];
    for capabilities in profiles {
        let dialect = GenericDialect::new().with_capabilities(capabilities);
        let generator = ScriptGenerator::new(Arc::new(dialect), GeneratorOptions::default());
        let tables = [make_rich_table()];

        let mut expected = generator.drop_scripts(&tables).unwrap();
        expected.extend(generator.create_scripts(&tables).unwrap());
        assert_eq!(generator.drop_create_scripts(&tables).unwrap(), expected);
    }
}

#[test]
fn test_drop_create_meta_data_drops_everything_first() {
    let generator = make_generator(
        GeneratorOptions::default().with_group_scripts_by(GroupScriptsBy::MetaData),
    );
    let scripts = generator
        .drop_create_scripts(&[make_table("a"), make_table("b")])
        .unwrap();
    assert_eq!(scripts[0], "DROP TABLE IF EXISTS a");
    assert_eq!(scripts[1], "DROP TABLE IF EXISTS b");
    assert!(scripts[2].starts_with("CREATE TABLE a"));
    assert!(scripts[3].starts_with("CREATE TABLE b"));
}

// =============================================================================
// Sequences
// =============================================================================

/// `orders` owning the sequence `seq_orders`.
fn make_sequenced_table() -> Table {
    let mut table = make_table("orders");
    let mut sequence = Sequence::new(QualifiedName::new("seq_orders"));
    sequence.start_with = Some(1);
    table.add_sequence(sequence);
    table
}

#[test]
fn test_sequence_created_first_and_dropped_last() {
    let tables = [make_rich_table(), make_sequenced_table()];
    for grouping in [GroupScriptsBy::Table, GroupScriptsBy::MetaData] {
        let generator =
            make_generator(GeneratorOptions::default().with_group_scripts_by(grouping));

        let create = generator.create_scripts(&tables).unwrap();
        let create_seq = create
            .iter()
            .position(|s| s == "CREATE SEQUENCE seq_orders START WITH 1")
            .unwrap();
        let create_orders = create
            .iter()
            .position(|s| s.starts_with("CREATE TABLE orders"))
            .unwrap();
        assert!(create_seq < create_orders);

        let drop = generator.drop_scripts(&tables).unwrap();
        assert_eq!(drop.last().map(String::as_str), Some("DROP SEQUENCE seq_orders"));
        let drop_orders = drop
            .iter()
            .position(|s| s == "DROP TABLE IF EXISTS orders")
            .unwrap();
        assert!(drop_orders < drop.len() - 1);

        let drop_create = generator.drop_create_scripts(&tables).unwrap();
        let drop_seq = drop_create
            .iter()
            .position(|s| s == "DROP SEQUENCE seq_orders")
            .unwrap();
        let create_seq = drop_create
            .iter()
            .position(|s| s.starts_with("CREATE SEQUENCE seq_orders"))
            .unwrap();
        let create_orders = drop_create
            .iter()
            .position(|s| s.starts_with("CREATE TABLE orders"))
            .unwrap();
        assert!(drop_seq < create_seq);
        assert!(create_seq < create_orders);
    }
}

#[test]
fn test_sequence_table_grouping_order() {
    let generator = make_generator(GeneratorOptions::default());
    let tables = [make_sequenced_table()];
    assert_eq!(
        generator.create_scripts(&tables).unwrap(),
        vec![
            "CREATE SEQUENCE seq_orders START WITH 1".to_string(),
            "CREATE TABLE orders (id INTEGER NOT NULL, PRIMARY KEY (id))".to_string(),
        ]
    );
    assert_eq!(
        generator.drop_scripts(&tables).unwrap(),
        vec![
            "DROP TABLE IF EXISTS orders".to_string(),
            "DROP SEQUENCE seq_orders".to_string(),
        ]
    );
}

#[test]
fn test_sequence_suppressed_without_support() {
    let capabilities = Capabilities {
        sequence: false,
        ..Capabilities::default()
    };
    let dialect = GenericDialect::new().with_capabilities(capabilities);
    let generator = ScriptGenerator::new(Arc::new(dialect), GeneratorOptions::default());
    let tables = [make_sequenced_table()];

    let all = [
        generator.create_scripts(&tables).unwrap(),
        generator.drop_scripts(&tables).unwrap(),
        generator.drop_create_scripts(&tables).unwrap(),
    ]
    .concat();
    assert!(all.iter().all(|s| !s.contains("SEQUENCE")));
    assert_eq!(count_matching(&all, "CREATE TABLE orders"), 2);
}

#[test]
fn test_sequence_category_disabled() {
    let generator = make_generator(GeneratorOptions::default().without(ObjectType::Sequence));
    let tables = [make_sequenced_table()];
    let all = [
        generator.create_scripts(&tables).unwrap(),
        generator.drop_scripts(&tables).unwrap(),
    ]
    .concat();
    assert!(all.iter().all(|s| !s.contains("SEQUENCE")));
}

// =============================================================================
// Category gating and errors
// =============================================================================

#[test]
fn test_foreign_key_category_disabled() {
    let mut a = make_table("a");
    add_reference(&mut a, "b", Some("fk_a_b"));
    let mut b = make_table("b");
    add_reference(&mut b, "a", Some("fk_b_a"));
    let tables = [a, b];

    for grouping in [GroupScriptsBy::Table, GroupScriptsBy::MetaData] {
        let generator = make_generator(
            GeneratorOptions::default()
                .without(ObjectType::ForeignKey)
                .with_group_scripts_by(grouping),
        );
        let all = [
            generator.create_scripts(&tables).unwrap(),
            generator.drop_scripts(&tables).unwrap(),
            generator.drop_create_scripts(&tables).unwrap(),
        ]
        .concat();
        assert!(all.iter().all(|s| !s.contains("FOREIGN KEY")));
        assert!(all.iter().all(|s| !s.contains("fk_")));
    }
}

#[test]
fn test_auto_increment_disabled() {
    let mut counters = Table::new(QualifiedName::new("counters"));
    counters.add_column(Column::new("id", type_code::INTEGER, "int").identity().not_null());
    let tables = [counters];

    let enabled = make_generator(GeneratorOptions::default())
        .create_scripts(&tables)
        .unwrap();
    assert_eq!(
        enabled,
        vec![
            "CREATE TABLE counters (id INTEGER GENERATED BY DEFAULT AS IDENTITY NOT NULL)"
                .to_string()
        ]
    );

    let disabled = make_generator(GeneratorOptions::default().without(ObjectType::AutoIncrement))
        .create_scripts(&tables)
        .unwrap();
    assert_eq!(
        disabled,
        vec!["CREATE TABLE counters (id INTEGER NOT NULL)".to_string()]
    );
}

#[test]
fn test_column_check_disabled_keeps_table_checks() {
    let mut items = Table::new(QualifiedName::new("items"));
    items
        .add_column(Column::new("qty", type_code::INTEGER, "int").with_check("qty > 0"))
        .add_check(Check::new(Some("ck_items_qty"), "qty < 1000"));
    let tables = [items];

    let scripts = make_generator(GeneratorOptions::default())
        .create_scripts(&tables)
        .unwrap();
    assert_eq!(
        scripts,
        vec![
            "CREATE TABLE items (qty INTEGER CHECK (qty > 0), CONSTRAINT ck_items_qty CHECK (qty < 1000))"
                .to_string()
        ]
    );

    let scripts = make_generator(GeneratorOptions::default().without(ObjectType::ColumnCheck))
        .create_scripts(&tables)
        .unwrap();
    assert_eq!(
        scripts,
        vec![
            "CREATE TABLE items (qty INTEGER, CONSTRAINT ck_items_qty CHECK (qty < 1000))"
                .to_string()
        ]
    );

    let scripts = make_generator(GeneratorOptions::default().without(ObjectType::Check))
        .create_scripts(&tables)
        .unwrap();
    assert_eq!(scripts, vec!["CREATE TABLE items (qty INTEGER)".to_string()]);
}

#[test]
fn test_column_trigger_gating() {
    let mut accounts = make_table("accounts");
    accounts
        .add_trigger(Trigger::new("trg_accounts_row", TriggerKind::Trigger, "BEGIN END"))
        .add_trigger(Trigger::new(
            "trg_accounts_balance",
            TriggerKind::ColumnTrigger,
            "BEGIN END",
        ));
    let tables = [accounts];
    let row = "CREATE TRIGGER trg_accounts_row BEFORE INSERT ON accounts FOR EACH ROW BEGIN END";
    let column =
        "CREATE TRIGGER trg_accounts_balance BEFORE INSERT ON accounts FOR EACH ROW BEGIN END";
    let triggers = |options: GeneratorOptions| -> Vec<String> {
        make_generator(options)
            .create_scripts(&tables)
            .unwrap()
            .into_iter()
            .filter(|s| s.starts_with("CREATE TRIGGER"))
            .collect()
    };

    assert_eq!(triggers(GeneratorOptions::default()), vec![row, column]);
    assert_eq!(
        triggers(GeneratorOptions::default().without(ObjectType::ColumnTrigger)),
        vec![row]
    );
    assert_eq!(
        triggers(GeneratorOptions::default().without(ObjectType::Trigger)),
        vec![column]
    );
    assert!(triggers(
        GeneratorOptions::default()
            .without(ObjectType::Trigger)
            .without(ObjectType::ColumnTrigger)
    )
    .is_empty());
}

#[test]
fn test_unsupported_type_aborts_generation() {
    let mut table = make_table("shapes");
    table.add_column(Column::new("outline", type_code::OTHER, "geometry"));
    let err = make_generator(GeneratorOptions::default())
        .create_scripts(&[make_table("ok"), table])
        .unwrap_err();
    match err {
        MigrateError::UnsupportedType {
            type_name,
            table,
            column,
            ..
        } => {
            assert_eq!(type_name, "geometry");
            assert_eq!(table, "shapes");
            assert_eq!(column, "outline");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_generator_from_config() {
    let config = GeneratorConfig::from_yaml(
        r#"
object_types: [TABLE, INDEX]
dialect:
  name: compact
  create_multiple_indexes: true
"#,
    )
    .unwrap();
    let generator = config.build_generator().unwrap();

    let mut table = make_table("events");
    table
        .add_column(Column::new("kind", type_code::INTEGER, "int"))
        .add_column(Column::new("at", type_code::TIMESTAMP, "datetime"))
        .add_index(Index::new("ix_kind", ["kind"]))
        .add_index(Index::new("ix_at", ["at"]));

    let scripts = generator.create_scripts(&[table]).unwrap();
    assert_eq!(
        scripts,
        vec![
            "CREATE TABLE events (id INTEGER NOT NULL, kind INTEGER, at TIMESTAMP)".to_string(),
            "CREATE INDEX ix_kind ON events (kind), ix_at ON events (at)".to_string(),
        ]
    );
}
