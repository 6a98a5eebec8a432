use schema_connector::Provider;

use crate::diff::expected_schema::ExpectedForeignKey;
use crate::flavour::SqlDialect;

use super::TablesByName;

pub fn find_expected_fk<'a>(
    expected_tables: &'a TablesByName<'a>,
    table_name: &str,
    constraint_name: &str,
) -> Option<&'a ExpectedForeignKey> {
    expected_tables
        .get(table_name)?
        .foreign_keys
        .iter()
        .find(|fk| fk.constraint_name == constraint_name)
}

/// `ALTER TABLE ... ADD CONSTRAINT ... FOREIGN KEY ...` (spec §4.2,
/// rendering rules). Missing referential actions default to `CASCADE`,
/// already resolved by the time an [`ExpectedForeignKey`] reaches here.
pub fn render_add_foreign_key(fk: &ExpectedForeignKey, dialect: &dyn SqlDialect) -> String {
    let local_cols: Vec<String> = fk.columns.iter().map(|c| dialect.quote_identifier(c)).collect();
    let ref_cols: Vec<String> = fk.referenced_columns.iter().map(|c| dialect.quote_identifier(c)).collect();

    format!(
        "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({}) ON DELETE {} ON UPDATE {};",
        dialect.quote_identifier(&fk.table),
        dialect.quote_identifier(&fk.constraint_name),
        local_cols.join(", "),
        dialect.quote_identifier(&fk.referenced_table),
        ref_cols.join(", "),
        fk.on_delete.as_sql(),
        fk.on_update.as_sql(),
    )
}

/// `DROP CONSTRAINT` (PostgreSQL/SQLite) or `DROP FOREIGN KEY` (MySQL),
/// named as the canonical dialect syntax (spec §4.2, rendering rules).
pub fn render_drop_foreign_key(table_name: &str, constraint_name: &str, dialect: &dyn SqlDialect) -> String {
    match dialect.provider() {
        Provider::Mysql => format!(
            "ALTER TABLE {} DROP FOREIGN KEY {};",
            dialect.quote_identifier(table_name),
            dialect.quote_identifier(constraint_name)
        ),
        Provider::Postgres | Provider::Sqlite => format!(
            "ALTER TABLE {} DROP CONSTRAINT {};",
            dialect.quote_identifier(table_name),
            dialect.quote_identifier(constraint_name)
        ),
    }
}
