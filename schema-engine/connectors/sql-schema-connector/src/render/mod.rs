mod alter_table;
mod create_table;
mod foreign_key;
mod index;

use indexmap::IndexMap;
use schema_connector::SchemaDiff;

use crate::diff::expected_schema::ExpectedTable;
use crate::flavour::{DialectCapability, SqlDialect};

use alter_table::{render_add_columns, render_alter_columns, render_drop_columns};
use create_table::render_create_table;
use foreign_key::{find_expected_fk, render_add_foreign_key, render_drop_foreign_key};
use index::{render_create_index, render_drop_index};

/// Keeps expected-table lookups by name at O(1) while preserving schema
/// declaration order for anything that iterates the map itself.
type TablesByName<'a> = IndexMap<&'a str, &'a ExpectedTable>;

fn tables_by_name(expected_tables: &[ExpectedTable]) -> TablesByName<'_> {
    expected_tables.iter().map(|table| (table.name.as_str(), table)).collect()
}

fn find_table<'a>(expected_tables: &'a TablesByName<'a>, name: &str) -> Option<&'a ExpectedTable> {
    expected_tables.get(name).copied()
}

fn needs_pgcrypto(diff: &SchemaDiff, expected_tables: &TablesByName<'_>) -> bool {
    let created = diff
        .tables_to_create
        .iter()
        .filter_map(|name| find_table(expected_tables, name))
        .flat_map(|table| table.columns.iter());

    let added = diff.tables_to_alter.iter().flat_map(|alteration| {
        find_table(expected_tables, &alteration.table_name)
            .into_iter()
            .flat_map(move |table| {
                alteration
                    .add_columns
                    .iter()
                    .filter_map(move |add| table.columns.iter().find(|c| c.name == add.column_name))
            })
    });

    created.chain(added).any(|column| {
        column
            .default
            .as_deref()
            .is_some_and(|expr| expr.contains("gen_random_uuid()"))
    })
}

/// Renders a [`SchemaDiff`] as a single SQL script, in the fixed step
/// order that preserves referential integrity during a single-transaction
/// application (spec §4.2). Empty steps contribute no text. Column type
/// and nullability changes (`alter_columns`) are rendered right after new
/// columns are added, gated on [`DialectCapability::AlterColumn`]: a
/// direct statement on PostgreSQL/MySQL, a full table recreation on
/// SQLite.
pub fn render_migration(diff: &SchemaDiff, expected_tables: &[ExpectedTable], dialect: &dyn SqlDialect) -> String {
    let mut steps: Vec<String> = Vec::new();
    let expected_tables = &tables_by_name(expected_tables);

    if dialect.capabilities().contains(DialectCapability::Extensions) && needs_pgcrypto(diff, expected_tables) {
        steps.push("CREATE EXTENSION IF NOT EXISTS \"pgcrypto\";".to_owned());
    }

    if !diff.tables_to_create.is_empty() {
        let mut block = vec!["-- CreateTable".to_owned()];
        block.extend(
            diff.tables_to_create
                .iter()
                .filter_map(|name| find_table(expected_tables, name))
                .map(|table| render_create_table(table, dialect)),
        );
        steps.push(block.join("\n"));
    }

    let drop_column_statements: Vec<String> = diff
        .tables_to_alter
        .iter()
        .flat_map(|alteration| render_drop_columns(alteration, dialect))
        .collect();
    if !drop_column_statements.is_empty() {
        let mut block = vec!["-- AlterTable".to_owned()];
        block.extend(drop_column_statements);
        steps.push(block.join("\n"));
    }

    let add_column_statements: Vec<String> = diff
        .tables_to_alter
        .iter()
        .filter_map(|alteration| {
            find_table(expected_tables, &alteration.table_name).map(|table| render_add_columns(alteration, table, dialect))
        })
        .flatten()
        .collect();
    if !add_column_statements.is_empty() {
        let mut block = vec!["-- AlterTable".to_owned()];
        block.extend(add_column_statements);
        steps.push(block.join("\n"));
    }

    let alter_column_statements: Vec<String> = diff
        .tables_to_alter
        .iter()
        .filter_map(|alteration| {
            find_table(expected_tables, &alteration.table_name).map(|table| render_alter_columns(alteration, table, dialect))
        })
        .flatten()
        .collect();
    if !alter_column_statements.is_empty() {
        let mut block = vec!["-- AlterTable".to_owned()];
        block.extend(alter_column_statements);
        steps.push(block.join("\n"));
    }

    if !diff.indexes_to_drop.is_empty() {
        let mut block = vec!["-- DropIndex".to_owned()];
        block.extend(diff.indexes_to_drop.iter().map(|drop| render_drop_index(drop, dialect)));
        steps.push(block.join("\n"));
    }

    if !diff.tables_to_drop.is_empty() {
        let mut block = vec!["-- DropTable".to_owned()];
        block.extend(
            diff.tables_to_drop
                .iter()
                .map(|name| format!("DROP TABLE {};", dialect.quote_identifier(name))),
        );
        steps.push(block.join("\n"));
    }

    if !diff.indexes_to_create.is_empty() {
        let mut block = vec!["-- CreateIndex".to_owned()];
        block.extend(
            diff.indexes_to_create
                .iter()
                .filter_map(|create| find_table(expected_tables, &create.table_name).and_then(|t| render_create_index(create, t, dialect))),
        );
        steps.push(block.join("\n"));
    }

    if !diff.foreign_keys_to_drop.is_empty() {
        let mut block = vec!["-- DropForeignKey".to_owned()];
        block.extend(diff.foreign_keys_to_drop.iter().filter_map(|drop| {
            let name = drop.constraint_name.as_deref()?;
            Some(render_drop_foreign_key(&drop.table_name, name, dialect))
        }));
        steps.push(block.join("\n"));
    }

    if !diff.foreign_keys_to_alter.is_empty() {
        let mut block = vec!["-- AlterForeignKey (drop old)".to_owned()];
        block.extend(diff.foreign_keys_to_alter.iter().filter_map(|alter| {
            let name = alter.constraint_name.as_deref()?;
            Some(render_drop_foreign_key(&alter.table_name, name, dialect))
        }));
        steps.push(block.join("\n"));
    }

    if !diff.foreign_keys_to_create.is_empty() {
        let mut block = vec!["-- AddForeignKey".to_owned()];
        block.extend(diff.foreign_keys_to_create.iter().filter_map(|create| {
            let name = create.constraint_name.as_deref()?;
            find_expected_fk(expected_tables, &create.table_name, name).map(|fk| render_add_foreign_key(fk, dialect))
        }));
        steps.push(block.join("\n"));
    }

    if !diff.foreign_keys_to_alter.is_empty() {
        let mut block = vec!["-- AlterForeignKey (recreate with new attributes)".to_owned()];
        block.extend(diff.foreign_keys_to_alter.iter().filter_map(|alter| {
            let name = alter.constraint_name.as_deref()?;
            find_expected_fk(expected_tables, &alter.table_name, name).map(|fk| render_add_foreign_key(fk, dialect))
        }));
        steps.push(block.join("\n"));
    }

    steps.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::calculate_diff;
    use crate::flavour::{PostgresDialect, SqliteDialect};
    use dml::{Attribute, AttributeArg, AttributeValue, Field, FieldType, Model, Schema};
    use sql_schema_describer::{ColumnInfo, DatabaseSchema, TableInfo};

    #[test]
    fn foreign_key_creation_never_precedes_either_tables_create_table() {
        let author = Model::new("Author").with_field(Field::new("id", FieldType::new("Int")).with_attribute(Attribute::new("id")));
        let book = Model::new("Book")
            .with_field(Field::new("id", FieldType::new("Int")).with_attribute(Attribute::new("id")))
            .with_field(Field::new("authorId", FieldType::new("Int")))
            .with_field(
                Field::new("author", FieldType::new("Author")).with_attribute(Attribute::with_args(
                    "relation",
                    vec![
                        AttributeArg::named("fields", AttributeValue::List(vec!["authorId".into()])),
                        AttributeArg::named("references", AttributeValue::List(vec!["id".into()])),
                    ],
                )),
            );

        let schema = Schema::new().with_model(author).with_model(book);
        let db = DatabaseSchema::new();

        let expected_tables = crate::diff::expected_schema::build_expected_tables(&schema, &PostgresDialect);
        let diff = calculate_diff(&schema, &db, &PostgresDialect);
        let sql = render_migration(&diff, &expected_tables, &PostgresDialect);

        let fk_pos = sql.find("ADD CONSTRAINT").expect("fk should be emitted");
        let books_create_pos = sql.find("CREATE TABLE \"Book\"").expect("Book table should be emitted");
        let authors_create_pos = sql.find("CREATE TABLE \"Author\"").expect("Author table should be emitted");

        assert!(fk_pos > books_create_pos);
        assert!(fk_pos > authors_create_pos);
    }

    #[test]
    fn a_changed_column_type_renders_alter_column_on_postgres() {
        let user = Model::new("User")
            .with_field(Field::new("id", FieldType::new("Int")).with_attribute(Attribute::new("id")))
            .with_field(Field::new("age", FieldType::new("BigInt")));

        let schema = Schema::new().with_model(user);
        let db = DatabaseSchema::new().with_table(
            TableInfo::new("User")
                .with_column(ColumnInfo::new("id", "INTEGER"))
                .with_column(ColumnInfo::new("age", "INTEGER")),
        );

        let expected_tables = crate::diff::expected_schema::build_expected_tables(&schema, &PostgresDialect);
        let diff = calculate_diff(&schema, &db, &PostgresDialect);
        let sql = render_migration(&diff, &expected_tables, &PostgresDialect);

        assert!(sql.contains("ALTER TABLE \"User\" ALTER COLUMN \"age\" TYPE BIGINT;"));
    }

    #[test]
    fn a_changed_column_type_recreates_the_table_on_sqlite() {
        let user = Model::new("User")
            .with_field(Field::new("id", FieldType::new("Int")).with_attribute(Attribute::new("id")))
            .with_field(Field::new("age", FieldType::new("BigInt")));

        let schema = Schema::new().with_model(user);
        let db = DatabaseSchema::new().with_table(
            TableInfo::new("User")
                .with_column(ColumnInfo::new("id", "INTEGER"))
                .with_column(ColumnInfo::new("age", "TEXT")),
        );

        let expected_tables = crate::diff::expected_schema::build_expected_tables(&schema, &SqliteDialect);
        let diff = calculate_diff(&schema, &db, &SqliteDialect);
        let sql = render_migration(&diff, &expected_tables, &SqliteDialect);

        assert!(sql.contains("CREATE TABLE \"_new_User\""));
        assert!(sql.contains("ALTER TABLE \"_new_User\" RENAME TO \"User\";"));
    }
}
