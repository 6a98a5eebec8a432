mod mysql;
mod postgres;
mod sqlite;

use enumflags2::{bitflags, BitFlags};
use schema_connector::Provider;

pub use mysql::MysqlDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;

/// Per-dialect feature flags that change how the diff engine and DDL
/// emitter behave, rather than just how they spell things (spec §4.2's
/// "dialect layer", budgeted separately from rendering proper).
#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialectCapability {
    /// `ALTER TABLE ... ALTER COLUMN` is supported directly; SQLite lacks
    /// this and must recreate the table instead.
    AlterColumn,
    /// `CREATE EXTENSION` exists (PostgreSQL only); gates the pgcrypto
    /// extension-setup step.
    Extensions,
    /// Native `BOOLEAN` type; MySQL and SQLite fall back to an integer
    /// representation for the dialect-default mapping table.
    NativeBoolean,
}

pub type DialectCapabilities = BitFlags<DialectCapability>;

/// The dialect abstraction the diff engine and DDL emitter are generic
/// over (spec §4.2's dialect layer: identifier quoting, type mapping,
/// driver name). Each dialect is a zero-sized marker type; all of its
/// behavior is pure functions of the `SchemaDiff`/types it is asked to
/// render, never of any live connection state.
pub trait SqlDialect: Send + Sync {
    fn provider(&self) -> Provider;

    /// Quote a single identifier: `"x"` for PostgreSQL/SQLite, `` `x` ``
    /// for MySQL (spec §4.2, rendering rules).
    fn quote_identifier(&self, name: &str) -> String;

    fn quote_qualified(&self, table: &str, column: &str) -> String {
        format!("{}.{}", self.quote_identifier(table), self.quote_identifier(column))
    }

    fn capabilities(&self) -> DialectCapabilities;

    /// Dialect-default SQL type for a declared base type when no `db.*`
    /// override applies (spec §4.2, the mapping table).
    fn default_sql_type(&self, declared_base_type: &str) -> &'static str;

    /// The dialect-appropriate timestamp column type for ledger rows
    /// (spec §3.4): `TIMESTAMPTZ` / `DATETIME(3)` / `TEXT`.
    fn ledger_timestamp_type(&self) -> &'static str;

    /// Whether primary keys render as a named `CONSTRAINT ... PRIMARY KEY`
    /// (PostgreSQL, SQLite) or a bare `PRIMARY KEY (...)` (MySQL).
    fn names_primary_key_constraint(&self) -> bool;

    fn driver_name(&self) -> &'static str;
}

pub fn dialect_for(provider: Provider) -> Box<dyn SqlDialect> {
    match provider {
        Provider::Postgres => Box::new(PostgresDialect),
        Provider::Mysql => Box::new(MysqlDialect),
        Provider::Sqlite => Box::new(SqliteDialect),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgres_and_sqlite_quote_with_double_quotes_mysql_with_backticks() {
        assert_eq!(PostgresDialect.quote_identifier("users"), "\"users\"");
        assert_eq!(SqliteDialect.quote_identifier("users"), "\"users\"");
        assert_eq!(MysqlDialect.quote_identifier("users"), "`users`");
    }

    #[test]
    fn only_postgres_supports_extensions() {
        assert!(PostgresDialect.capabilities().contains(DialectCapability::Extensions));
        assert!(!MysqlDialect.capabilities().contains(DialectCapability::Extensions));
        assert!(!SqliteDialect.capabilities().contains(DialectCapability::Extensions));
    }

    #[test]
    fn sqlite_does_not_support_alter_column() {
        assert!(!SqliteDialect.capabilities().contains(DialectCapability::AlterColumn));
    }
}
