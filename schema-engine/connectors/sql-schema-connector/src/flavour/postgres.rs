use enumflags2::make_bitflags;
use schema_connector::Provider;

use super::{DialectCapabilities, DialectCapability, SqlDialect};

pub struct PostgresDialect;

impl SqlDialect for PostgresDialect {
    fn provider(&self) -> Provider {
        Provider::Postgres
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{name}\"")
    }

    fn capabilities(&self) -> DialectCapabilities {
        make_bitflags!(DialectCapability::{AlterColumn | Extensions | NativeBoolean})
    }

    fn default_sql_type(&self, declared_base_type: &str) -> &'static str {
        match declared_base_type {
            "String" => "VARCHAR(255)",
            "Int" => "INTEGER",
            "BigInt" => "BIGINT",
            "Boolean" => "BOOLEAN",
            "DateTime" => "TIMESTAMP",
            "Float" => "DOUBLE PRECISION",
            "Decimal" => "DECIMAL",
            "Json" => "JSONB",
            "Bytes" => "BYTEA",
            _ => "TEXT",
        }
    }

    fn ledger_timestamp_type(&self) -> &'static str {
        "TIMESTAMPTZ"
    }

    fn names_primary_key_constraint(&self) -> bool {
        true
    }

    fn driver_name(&self) -> &'static str {
        "postgresql"
    }
}
