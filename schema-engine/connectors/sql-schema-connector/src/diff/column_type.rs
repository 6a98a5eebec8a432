use dml::{Attribute, AttributeValue};

use crate::flavour::SqlDialect;

fn int_arg(attr: &Attribute, index: usize, default: i64) -> i64 {
    match attr.positional_arg(index) {
        Some(AttributeValue::Int(n)) => *n,
        _ => default,
    }
}

/// Maps one `db.*` native-type attribute to its dialect SQL type (spec
/// §4.1 step 1's table). Returns `None` for attributes that aren't native
/// type modifiers at all (e.g. `@id`, `@unique`) — callers scan every
/// attribute on a field and take the last `Some`, so later `db.*`
/// attributes override earlier ones per the spec's "each overriding prior
/// choices" rule.
pub fn native_type_sql(attr: &Attribute, dialect: &dyn SqlDialect) -> Option<String> {
    let name = attr.native_type_name()?;
    let provider = dialect.provider();
    use schema_connector::Provider::*;

    let sql = match name {
        "Uuid" | "UUID" => "UUID".to_owned(),
        "VarChar" => format!("VARCHAR({})", int_arg(attr, 0, 255)),
        "Text" => "TEXT".to_owned(),
        "Char" => format!("CHAR({})", int_arg(attr, 0, 1)),
        "Date" => match provider {
            Postgres | Mysql => "DATE".to_owned(),
            Sqlite => "TEXT".to_owned(),
        },
        "Time" => match provider {
            Postgres | Mysql => "TIME".to_owned(),
            Sqlite => "TEXT".to_owned(),
        },
        "Timestamp" => match provider {
            Postgres => "TIMESTAMP".to_owned(),
            Mysql => "DATETIME".to_owned(),
            Sqlite => "TEXT".to_owned(),
        },
        "Timestamptz" => match provider {
            Postgres => "TIMESTAMPTZ".to_owned(),
            Mysql => "DATETIME".to_owned(),
            Sqlite => "TEXT".to_owned(),
        },
        "Decimal" => format!("DECIMAL({},{})", int_arg(attr, 0, 65), int_arg(attr, 1, 30)),
        "SmallInt" => match provider {
            Postgres | Mysql => "SMALLINT".to_owned(),
            Sqlite => "INTEGER".to_owned(),
        },
        "Integer" => match provider {
            Postgres => "INTEGER".to_owned(),
            Mysql => "INT".to_owned(),
            Sqlite => "INTEGER".to_owned(),
        },
        "BigInt" => match provider {
            Postgres | Mysql => "BIGINT".to_owned(),
            Sqlite => "INTEGER".to_owned(),
        },
        "Real" => match provider {
            Postgres => "REAL".to_owned(),
            Mysql => "FLOAT".to_owned(),
            Sqlite => "REAL".to_owned(),
        },
        "DoublePrecision" => match provider {
            Postgres => "DOUBLE PRECISION".to_owned(),
            Mysql => "DOUBLE".to_owned(),
            Sqlite => "REAL".to_owned(),
        },
        "Boolean" => match provider {
            Postgres | Mysql => "BOOLEAN".to_owned(),
            Sqlite => "INTEGER".to_owned(),
        },
        "Json" => match provider {
            Postgres | Mysql => "JSON".to_owned(),
            Sqlite => "TEXT".to_owned(),
        },
        "JsonB" => match provider {
            Postgres => "JSONB".to_owned(),
            Mysql => "JSON".to_owned(),
            Sqlite => "TEXT".to_owned(),
        },
        "Bytes" | "ByteA" => match provider {
            Postgres => "BYTEA".to_owned(),
            Mysql | Sqlite => "BLOB".to_owned(),
        },
        "Inet" | "Cidr" => match provider {
            Postgres if name == "Inet" => "INET".to_owned(),
            Postgres => "CIDR".to_owned(),
            Mysql => "VARCHAR(45)".to_owned(),
            Sqlite => "TEXT".to_owned(),
        },
        "Money" => match provider {
            Postgres => "MONEY".to_owned(),
            Mysql => "DECIMAL(19,4)".to_owned(),
            Sqlite => "TEXT".to_owned(),
        },
        "Bit" => format!("BIT({})", int_arg(attr, 0, 1)),
        "VarBit" => match provider {
            Postgres => format!("VARBIT({})", int_arg(attr, 0, 1)),
            Mysql | Sqlite => "TEXT".to_owned(),
        },
        _ => return None,
    };

    Some(sql)
}

/// Resolves a field's SQL type: the last matching `db.*` attribute wins
/// (spec §4.1 step 1); absent any override, the dialect's default mapping
/// for the declared base type applies.
pub fn resolve_sql_type(field: &dml::Field, dialect: &dyn SqlDialect) -> String {
    field
        .native_type_attributes()
        .filter_map(|attr| native_type_sql(attr, dialect))
        .last()
        .unwrap_or_else(|| dialect.default_sql_type(&field.field_type.base).to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flavour::PostgresDialect;
    use dml::{Attribute, AttributeArg, AttributeValue, Field, FieldType};

    #[test]
    fn varchar_defaults_to_255_when_no_argument_given() {
        let attr = Attribute::new("db.VarChar");
        assert_eq!(native_type_sql(&attr, &PostgresDialect), Some("VARCHAR(255)".to_owned()));
    }

    #[test]
    fn later_native_type_attribute_overrides_an_earlier_one() {
        let field = Field::new("id", FieldType::new("String"))
            .with_attribute(Attribute::new("db.Text"))
            .with_attribute(Attribute::with_args(
                "db.VarChar",
                vec![AttributeArg::unnamed(AttributeValue::Int(36))],
            ));

        assert_eq!(resolve_sql_type(&field, &PostgresDialect), "VARCHAR(36)");
    }

    #[test]
    fn falls_back_to_dialect_default_when_no_native_type_given() {
        let field = Field::new("email", FieldType::new("String"));
        assert_eq!(resolve_sql_type(&field, &PostgresDialect), "VARCHAR(255)");
    }
}
