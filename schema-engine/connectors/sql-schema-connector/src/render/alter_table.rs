use schema_connector::{ColumnAlteration, IndexCreate, Provider, TableAlteration};

use crate::diff::expected_schema::ExpectedTable;
use crate::flavour::{DialectCapability, SqlDialect};

use super::create_table::render_create_table;
use super::foreign_key::render_add_foreign_key;
use super::index::render_create_index;

/// Renders the drop-column statements for one alteration (spec §4.2 step
/// 3, one statement per dropped column for dialect portability).
pub fn render_drop_columns(alteration: &TableAlteration, dialect: &dyn SqlDialect) -> Vec<String> {
    alteration
        .drop_columns
        .iter()
        .map(|drop| {
            format!(
                "ALTER TABLE {} DROP COLUMN {};",
                dialect.quote_identifier(&alteration.table_name),
                dialect.quote_identifier(&drop.column_name)
            )
        })
        .collect()
}

/// Renders the add-column statements for one alteration (spec §4.2 step
/// 4), looking the new column's type/nullability/default up on the
/// expected table it belongs to.
pub fn render_add_columns(
    alteration: &TableAlteration,
    expected: &ExpectedTable,
    dialect: &dyn SqlDialect,
) -> Vec<String> {
    alteration
        .add_columns
        .iter()
        .filter_map(|add| {
            let column = expected.columns.iter().find(|c| c.name == add.column_name)?;
            let mut fragment = format!(
                "ALTER TABLE {} ADD COLUMN {} {}",
                dialect.quote_identifier(&alteration.table_name),
                dialect.quote_identifier(&column.name),
                column.sql_type
            );
            if !column.nullable {
                fragment.push_str(" NOT NULL");
            }
            if let Some(default) = &column.default {
                if !default.is_empty() {
                    fragment.push_str(" DEFAULT ");
                    fragment.push_str(default);
                }
            }
            fragment.push(';');
            Some(fragment)
        })
        .collect()
}

/// `ALTER TABLE ... ALTER COLUMN` / `MODIFY COLUMN`, for dialects that
/// support changing a column's type or nullability in place.
fn render_alter_column_statement(table_name: &str, change: &ColumnAlteration, dialect: &dyn SqlDialect) -> Vec<String> {
    match dialect.provider() {
        Provider::Postgres => vec![
            format!(
                "ALTER TABLE {} ALTER COLUMN {} TYPE {};",
                dialect.quote_identifier(table_name),
                dialect.quote_identifier(&change.column_name),
                change.new_sql_type,
            ),
            format!(
                "ALTER TABLE {} ALTER COLUMN {} {};",
                dialect.quote_identifier(table_name),
                dialect.quote_identifier(&change.column_name),
                if change.new_nullable { "DROP NOT NULL" } else { "SET NOT NULL" },
            ),
        ],
        Provider::Mysql => vec![format!(
            "ALTER TABLE {} MODIFY COLUMN {} {}{};",
            dialect.quote_identifier(table_name),
            dialect.quote_identifier(&change.column_name),
            change.new_sql_type,
            if change.new_nullable { "" } else { " NOT NULL" },
        )],
        Provider::Sqlite => unreachable!("SQLite never reports AlterColumn; see render_recreate_table"),
    }
}

/// SQLite has no `ALTER TABLE ... ALTER COLUMN`, so a changed column forces
/// the classic recreate dance: a shadow table with the target shape, data
/// copied over column-by-column, the original dropped, and the shadow
/// renamed into its place. Dropping the original table also drops its
/// indexes and foreign keys, so both are recreated against the renamed
/// table (spec §4.2 step 3, SQLite note).
fn render_recreate_table(expected: &ExpectedTable, dialect: &dyn SqlDialect) -> Vec<String> {
    let shadow_name = format!("_new_{}", expected.name);
    let shadow = ExpectedTable {
        name: shadow_name.clone(),
        ..expected.clone()
    };

    let mut statements = vec![render_create_table(&shadow, dialect)];

    let column_list = expected
        .columns
        .iter()
        .map(|c| dialect.quote_identifier(&c.name))
        .collect::<Vec<_>>()
        .join(", ");
    statements.push(format!(
        "INSERT INTO {} ({column_list}) SELECT {column_list} FROM {};",
        dialect.quote_identifier(&shadow_name),
        dialect.quote_identifier(&expected.name),
    ));
    statements.push(format!("DROP TABLE {};", dialect.quote_identifier(&expected.name)));
    statements.push(format!(
        "ALTER TABLE {} RENAME TO {};",
        dialect.quote_identifier(&shadow_name),
        dialect.quote_identifier(&expected.name)
    ));

    for index in &expected.indexes {
        let create = IndexCreate {
            table_name: expected.name.clone(),
            index_name: index.name.clone(),
        };
        if let Some(sql) = render_create_index(&create, expected, dialect) {
            statements.push(sql);
        }
    }

    statements.extend(expected.foreign_keys.iter().map(|fk| render_add_foreign_key(fk, dialect)));

    statements
}

/// Renders a table's column type/nullability changes (spec §4.2 step 3),
/// gated on [`DialectCapability::AlterColumn`]: a direct `ALTER COLUMN` /
/// `MODIFY COLUMN` where the dialect supports it, or a full table
/// recreation where it doesn't (SQLite).
pub fn render_alter_columns(alteration: &TableAlteration, expected: &ExpectedTable, dialect: &dyn SqlDialect) -> Vec<String> {
    if alteration.alter_columns.is_empty() {
        return Vec::new();
    }

    if dialect.capabilities().contains(DialectCapability::AlterColumn) {
        alteration
            .alter_columns
            .iter()
            .flat_map(|change| render_alter_column_statement(&alteration.table_name, change, dialect))
            .collect()
    } else {
        render_recreate_table(expected, dialect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::expected_schema::ExpectedColumn;
    use crate::flavour::{MysqlDialect, PostgresDialect, SqliteDialect};
    use dml::PrimaryKey;
    use pretty_assertions::assert_eq;

    fn alteration_with_one_change() -> TableAlteration {
        let mut alteration = TableAlteration::new("User");
        alteration.alter_columns.push(ColumnAlteration {
            column_name: "age".into(),
            new_sql_type: "BIGINT".into(),
            new_nullable: true,
        });
        alteration
    }

    fn expected_user_table() -> ExpectedTable {
        ExpectedTable {
            name: "User".into(),
            columns: vec![
                ExpectedColumn {
                    name: "id".into(),
                    sql_type: "INTEGER".into(),
                    nullable: false,
                    default: None,
                },
                ExpectedColumn {
                    name: "age".into(),
                    sql_type: "BIGINT".into(),
                    nullable: true,
                    default: None,
                },
            ],
            primary_key: PrimaryKey::Single("id".into()),
            indexes: vec![],
            foreign_keys: vec![],
        }
    }

    #[test]
    fn postgres_emits_separate_type_and_nullability_statements() {
        let alteration = alteration_with_one_change();
        let expected = expected_user_table();

        let statements = render_alter_columns(&alteration, &expected, &PostgresDialect);

        assert_eq!(
            statements,
            vec![
                "ALTER TABLE \"User\" ALTER COLUMN \"age\" TYPE BIGINT;".to_owned(),
                "ALTER TABLE \"User\" ALTER COLUMN \"age\" DROP NOT NULL;".to_owned(),
            ]
        );
    }

    #[test]
    fn mysql_emits_a_single_modify_column_statement() {
        let alteration = alteration_with_one_change();
        let expected = expected_user_table();

        let statements = render_alter_columns(&alteration, &expected, &MysqlDialect);

        assert_eq!(statements, vec!["ALTER TABLE `User` MODIFY COLUMN `age` BIGINT;".to_owned()]);
    }

    #[test]
    fn sqlite_recreates_the_table_instead_of_altering_the_column() {
        let alteration = alteration_with_one_change();
        let expected = expected_user_table();

        let statements = render_alter_columns(&alteration, &expected, &SqliteDialect);

        assert!(statements[0].contains("CREATE TABLE \"_new_User\""));
        assert!(statements[1].starts_with("INSERT INTO \"_new_User\" (\"id\", \"age\") SELECT \"id\", \"age\" FROM \"User\""));
        assert_eq!(statements[2], "DROP TABLE \"User\";");
        assert_eq!(statements[3], "ALTER TABLE \"_new_User\" RENAME TO \"User\";");
    }

    #[test]
    fn no_changes_renders_nothing() {
        let alteration = TableAlteration::new("User");
        let expected = expected_user_table();
        assert!(render_alter_columns(&alteration, &expected, &PostgresDialect).is_empty());
    }
}
