use enumflags2::make_bitflags;
use schema_connector::Provider;

use super::{DialectCapabilities, DialectCapability, SqlDialect};

pub struct SqliteDialect;

impl SqlDialect for SqliteDialect {
    fn provider(&self) -> Provider {
        Provider::Sqlite
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{name}\"")
    }

    /// SQLite has no `ALTER TABLE ... ALTER COLUMN`; callers rendering an
    /// alteration against this dialect must fall back to the
    /// recreate-temp-table-and-rename pattern instead.
    fn capabilities(&self) -> DialectCapabilities {
        make_bitflags!(DialectCapability::{})
    }

    fn default_sql_type(&self, declared_base_type: &str) -> &'static str {
        match declared_base_type {
            "String" => "TEXT",
            "Int" => "INTEGER",
            "BigInt" => "INTEGER",
            "Boolean" => "INTEGER",
            "DateTime" => "TEXT",
            "Float" => "REAL",
            "Decimal" => "TEXT",
            "Json" => "TEXT",
            "Bytes" => "BLOB",
            _ => "TEXT",
        }
    }

    fn ledger_timestamp_type(&self) -> &'static str {
        "TEXT"
    }

    fn names_primary_key_constraint(&self) -> bool {
        true
    }

    fn driver_name(&self) -> &'static str {
        "sqlite"
    }
}
