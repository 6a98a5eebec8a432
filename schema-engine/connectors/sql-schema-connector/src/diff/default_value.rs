use dml::{AttributeValue, Field};

/// Extracts the SQL default-value expression for a field's `@default(x)`
/// argument (spec §4.1 step 3). Returns `None` when the field has no
/// default at all; returns `Some(String::new())` for `autoincrement()` and
/// `uuid()`, whose defaults are produced elsewhere (dialect-default serial
/// type, client-side generation) rather than as a literal SQL expression.
pub fn extract_default(field: &Field) -> Option<String> {
    let value = field.default_attribute()?.positional_arg(0)?;

    Some(match value {
        AttributeValue::String(s) => format!("'{}'", s.replace('\'', "''")),
        AttributeValue::Int(n) => n.to_string(),
        AttributeValue::Bool(b) => b.to_string(),
        AttributeValue::List(_) => return None,
        AttributeValue::Function { name, args } => match name.as_str() {
            "now" => "CURRENT_TIMESTAMP".to_owned(),
            "dbgenerated" => match args.first().map(|arg| &arg.value) {
                Some(AttributeValue::String(expr)) => expr.clone(),
                _ => String::new(),
            },
            "autoincrement" | "uuid" => String::new(),
            _ => String::new(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dml::{Attribute, AttributeArg, FieldType};

    fn field_with_default(value: AttributeValue) -> Field {
        Field::new("x", FieldType::new("String"))
            .with_attribute(Attribute::with_args("default", vec![AttributeArg::unnamed(value)]))
    }

    #[test]
    fn plain_string_becomes_a_quoted_sql_literal_with_doubled_quotes() {
        let field = field_with_default(AttributeValue::String("O'Brien".into()));
        assert_eq!(extract_default(&field).as_deref(), Some("'O''Brien'"));
    }

    #[test]
    fn now_becomes_current_timestamp() {
        let field = field_with_default(AttributeValue::Function {
            name: "now".into(),
            args: vec![],
        });
        assert_eq!(extract_default(&field).as_deref(), Some("CURRENT_TIMESTAMP"));
    }

    #[test]
    fn dbgenerated_is_emitted_unquoted() {
        let field = field_with_default(AttributeValue::Function {
            name: "dbgenerated".into(),
            args: vec![AttributeArg::unnamed(AttributeValue::String(
                "gen_random_uuid()".into(),
            ))],
        });
        assert_eq!(extract_default(&field).as_deref(), Some("gen_random_uuid()"));
    }

    #[test]
    fn autoincrement_and_uuid_extract_as_empty_markers() {
        let autoincrement = field_with_default(AttributeValue::Function {
            name: "autoincrement".into(),
            args: vec![],
        });
        let uuid = field_with_default(AttributeValue::Function {
            name: "uuid".into(),
            args: vec![],
        });

        assert_eq!(extract_default(&autoincrement).as_deref(), Some(""));
        assert_eq!(extract_default(&uuid).as_deref(), Some(""));
    }

    #[test]
    fn a_field_with_no_default_attribute_extracts_to_none() {
        let field = Field::new("x", FieldType::new("String"));
        assert_eq!(extract_default(&field), None);
    }
}
