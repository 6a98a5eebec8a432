use dml::PrimaryKey;

use crate::diff::expected_schema::ExpectedTable;
use crate::flavour::SqlDialect;

/// Renders a `CREATE TABLE` statement for one expected table (spec §4.2,
/// rendering rules): columns in expected order, each followed by `NOT
/// NULL` and `DEFAULT <expr>` where applicable, with the primary key
/// emitted last — a named constraint on PostgreSQL/SQLite, bare on MySQL.
/// Composite PKs (from `@@id`) take precedence over single-field ones,
/// which is already resolved by the time `primary_key` reaches here.
pub fn render_create_table(table: &ExpectedTable, dialect: &dyn SqlDialect) -> String {
    let mut column_fragments: Vec<String> = table
        .columns
        .iter()
        .map(|column| {
            let mut fragment = format!("{} {}", dialect.quote_identifier(&column.name), column.sql_type);
            if !column.nullable {
                fragment.push_str(" NOT NULL");
            }
            if let Some(default) = &column.default {
                if !default.is_empty() {
                    fragment.push_str(" DEFAULT ");
                    fragment.push_str(default);
                }
            }
            fragment
        })
        .collect();

    let pk_columns = table.primary_key.columns();
    if !pk_columns.is_empty() {
        let quoted_cols: Vec<String> = pk_columns.iter().map(|c| dialect.quote_identifier(c)).collect();
        let pk_fragment = if dialect.names_primary_key_constraint() {
            format!(
                "CONSTRAINT {} PRIMARY KEY ({})",
                dialect.quote_identifier(&format!("{}_pkey", table.name)),
                quoted_cols.join(", ")
            )
        } else {
            format!("PRIMARY KEY ({})", quoted_cols.join(", "))
        };
        column_fragments.push(pk_fragment);
    }

    format!(
        "CREATE TABLE {} ( {}\n);",
        dialect.quote_identifier(&table.name),
        column_fragments.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::expected_schema::ExpectedColumn;
    use crate::flavour::PostgresDialect;
    use expect_test::expect;

    #[test]
    fn a_two_column_table_renders_exactly() {
        let table = ExpectedTable {
            name: "tags".into(),
            columns: vec![
                ExpectedColumn {
                    name: "id".into(),
                    sql_type: "INTEGER".into(),
                    nullable: false,
                    default: None,
                },
                ExpectedColumn {
                    name: "label".into(),
                    sql_type: "VARCHAR(255)".into(),
                    nullable: true,
                    default: None,
                },
            ],
            primary_key: PrimaryKey::Single("id".into()),
            indexes: vec![],
            foreign_keys: vec![],
        };

        let sql = render_create_table(&table, &PostgresDialect);

        expect![[r#"
            CREATE TABLE "tags" ( "id" INTEGER NOT NULL, "label" VARCHAR(255), CONSTRAINT "tags_pkey" PRIMARY KEY ("id")
            );"#]]
        .assert_eq(&sql);
    }

    #[test]
    fn uuid_pk_with_dbgenerated_default_renders_per_scenario_s1() {
        let table = ExpectedTable {
            name: "users".into(),
            columns: vec![
                ExpectedColumn {
                    name: "id".into(),
                    sql_type: "UUID".into(),
                    nullable: false,
                    default: Some("gen_random_uuid()".into()),
                },
                ExpectedColumn {
                    name: "email".into(),
                    sql_type: "VARCHAR(255)".into(),
                    nullable: false,
                    default: None,
                },
            ],
            primary_key: PrimaryKey::Single("id".into()),
            indexes: vec![],
            foreign_keys: vec![],
        };

        let sql = render_create_table(&table, &PostgresDialect);

        assert!(sql.contains("\"id\" UUID NOT NULL DEFAULT gen_random_uuid()"));
        assert!(sql.contains("\"email\" VARCHAR(255) NOT NULL"));
        assert!(sql.contains("CONSTRAINT \"users_pkey\" PRIMARY KEY (\"id\")"));
    }

    #[test]
    fn composite_primary_key_lists_every_column_in_order() {
        let table = ExpectedTable {
            name: "user_roles".into(),
            columns: vec![
                ExpectedColumn {
                    name: "user_id".into(),
                    sql_type: "INTEGER".into(),
                    nullable: false,
                    default: None,
                },
                ExpectedColumn {
                    name: "role_id".into(),
                    sql_type: "INTEGER".into(),
                    nullable: false,
                    default: None,
                },
            ],
            primary_key: PrimaryKey::Composite(vec!["user_id".into(), "role_id".into()]),
            indexes: vec![],
            foreign_keys: vec![],
        };

        let sql = render_create_table(&table, &PostgresDialect);
        assert!(sql.contains("CONSTRAINT \"user_roles_pkey\" PRIMARY KEY (\"user_id\", \"role_id\")"));
    }
}
