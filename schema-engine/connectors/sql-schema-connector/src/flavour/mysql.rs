use enumflags2::make_bitflags;
use schema_connector::Provider;

use super::{DialectCapabilities, DialectCapability, SqlDialect};

pub struct MysqlDialect;

impl SqlDialect for MysqlDialect {
    fn provider(&self) -> Provider {
        Provider::Mysql
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("`{name}`")
    }

    fn capabilities(&self) -> DialectCapabilities {
        make_bitflags!(DialectCapability::{AlterColumn | NativeBoolean})
    }

    fn default_sql_type(&self, declared_base_type: &str) -> &'static str {
        match declared_base_type {
            "String" => "VARCHAR(255)",
            "Int" => "INT",
            "BigInt" => "BIGINT",
            "Boolean" => "BOOLEAN",
            "DateTime" => "DATETIME",
            "Float" => "DOUBLE",
            "Decimal" => "DECIMAL(65,30)",
            "Json" => "JSON",
            "Bytes" => "BLOB",
            _ => "TEXT",
        }
    }

    fn ledger_timestamp_type(&self) -> &'static str {
        "DATETIME(3)"
    }

    fn names_primary_key_constraint(&self) -> bool {
        false
    }

    fn driver_name(&self) -> &'static str {
        "mysql"
    }
}
