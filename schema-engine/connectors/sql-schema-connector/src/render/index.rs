use schema_connector::{IndexCreate, IndexDrop};
use schema_connector::Provider;

use crate::diff::expected_schema::ExpectedTable;
use crate::flavour::SqlDialect;

pub fn render_create_index(create: &IndexCreate, expected: &ExpectedTable, dialect: &dyn SqlDialect) -> Option<String> {
    let index = expected.indexes.iter().find(|i| i.name == create.index_name)?;
    let quoted_cols: Vec<String> = index.columns.iter().map(|c| dialect.quote_identifier(c)).collect();

    Some(format!(
        "CREATE {}INDEX {} ON {} ({});",
        if index.unique { "UNIQUE " } else { "" },
        dialect.quote_identifier(&index.name),
        dialect.quote_identifier(&expected.name),
        quoted_cols.join(", ")
    ))
}

/// `DROP INDEX` is a standalone statement on PostgreSQL and SQLite, but on
/// MySQL an index belongs to its table and is dropped through it.
pub fn render_drop_index(drop: &IndexDrop, dialect: &dyn SqlDialect) -> String {
    match dialect.provider() {
        Provider::Mysql => format!(
            "ALTER TABLE {} DROP INDEX {};",
            dialect.quote_identifier(&drop.table_name),
            dialect.quote_identifier(&drop.index_name)
        ),
        Provider::Postgres | Provider::Sqlite => {
            format!("DROP INDEX {};", dialect.quote_identifier(&drop.index_name))
        }
    }
}
