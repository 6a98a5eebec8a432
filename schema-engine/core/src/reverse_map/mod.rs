use std::collections::BTreeMap;

use dml::{Attribute, AttributeArg, AttributeValue, Field, FieldType, Model, Schema};
use itertools::Itertools;
use sql_schema_describer::{ColumnInfo, DatabaseSchema, ForeignKeyInfo, TableInfo};

/// Derives a field's base type and any `db.*` native-type attribute from
/// a column's SQL type and `udt_name` — the inverse of the forward
/// mapping in §4.2 (spec §4.4). `known_enums` lets callers identify
/// columns whose `udt_name` names a user-defined enum type, which this
/// core does not introspect on its own.
fn reverse_type(column: &ColumnInfo, known_enums: &[String]) -> (String, Option<Attribute>) {
    if let Some(udt) = &column.udt_name {
        if known_enums.iter().any(|e| e == udt) {
            return (udt.clone(), None);
        }
    }

    let sql_type = column.sql_type.to_uppercase();

    if sql_type.starts_with("UUID") {
        return ("String".into(), Some(Attribute::new("db.Uuid")));
    }
    if sql_type.starts_with("VARCHAR") {
        let attr = match column.character_maximum_length {
            Some(len) => Attribute::with_args("db.VarChar", vec![AttributeArg::unnamed(AttributeValue::Int(len as i64))]),
            None => Attribute::new("db.VarChar"),
        };
        return ("String".into(), Some(attr));
    }
    if sql_type.starts_with("TEXT") {
        return ("String".into(), None);
    }
    if sql_type.starts_with("TIMESTAMPTZ") {
        let attr = match column.datetime_precision {
            Some(p) => Attribute::with_args("db.Timestamptz", vec![AttributeArg::unnamed(AttributeValue::Int(p as i64))]),
            None => Attribute::new("db.Timestamptz"),
        };
        return ("DateTime".into(), Some(attr));
    }
    if sql_type.starts_with("TIMESTAMP") || sql_type.starts_with("DATETIME") {
        let attr = match column.datetime_precision {
            Some(p) => Attribute::with_args("db.Timestamp", vec![AttributeArg::unnamed(AttributeValue::Int(p as i64))]),
            None => Attribute::new("db.Timestamp"),
        };
        return ("DateTime".into(), Some(attr));
    }
    if sql_type.starts_with("BIGINT") {
        return ("BigInt".into(), None);
    }
    if sql_type.starts_with("INT") || sql_type.starts_with("SMALLINT") {
        return ("Int".into(), None);
    }
    if sql_type.starts_with("BOOLEAN") || sql_type == "BOOL" {
        return ("Boolean".into(), None);
    }
    if sql_type.starts_with("DOUBLE") || sql_type.starts_with("REAL") || sql_type.starts_with("FLOAT") {
        return ("Float".into(), None);
    }
    if sql_type.starts_with("DECIMAL") || sql_type.starts_with("NUMERIC") {
        return ("Decimal".into(), None);
    }
    if sql_type.starts_with("JSONB") {
        return ("Json".into(), Some(Attribute::new("db.JsonB")));
    }
    if sql_type.starts_with("JSON") {
        return ("Json".into(), None);
    }
    if sql_type.starts_with("BYTEA") || sql_type.starts_with("BLOB") {
        return ("Bytes".into(), None);
    }

    // Unrecognized SQL type: fall back to a bare `String` field, but pin it
    // with an explicit `db.Text` override rather than leaving the dialect
    // default to fill in. Without the override, re-diffing the reconstructed
    // model would resolve `String` to `VARCHAR(255)` on Postgres/MySQL (the
    // dialect default for a bare `String`, not for an unknown column type)
    // and produce a spurious `alter_columns` entry against the very table
    // this mapped. `db.Text` renders as `TEXT` on every dialect, matching
    // this same fallback's forward-direction row in the dialect-default
    // table (spec §4.2).
    ("String".into(), Some(Attribute::new("db.Text")))
}

/// Best-effort reconstruction of a `@default(...)` attribute from the
/// column's raw SQL default expression (spec §4.4).
fn reverse_default(sql_default: &str) -> Option<Attribute> {
    let trimmed = sql_default.trim();

    if trimmed.starts_with("nextval(") {
        return Some(Attribute::with_args(
            "default",
            vec![AttributeArg::unnamed(AttributeValue::Function {
                name: "autoincrement".into(),
                args: vec![],
            })],
        ));
    }
    if trimmed == "gen_random_uuid()" {
        return Some(Attribute::with_args(
            "default",
            vec![AttributeArg::unnamed(AttributeValue::Function {
                name: "dbgenerated".into(),
                args: vec![AttributeArg::unnamed(AttributeValue::String(trimmed.to_owned()))],
            })],
        ));
    }
    if trimmed == "now()" || trimmed.eq_ignore_ascii_case("current_timestamp") {
        return Some(Attribute::with_args(
            "default",
            vec![AttributeArg::unnamed(AttributeValue::Function {
                name: "now".into(),
                args: vec![],
            })],
        ));
    }
    if trimmed == "'{}'" || trimmed == "{}" {
        return Some(Attribute::with_args(
            "default",
            vec![AttributeArg::unnamed(AttributeValue::String("{}".into()))],
        ));
    }
    if trimmed.starts_with('\'') && trimmed.ends_with('\'') && trimmed.len() >= 2 {
        let unquoted = &trimmed[1..trimmed.len() - 1];
        return Some(Attribute::with_args(
            "default",
            vec![AttributeArg::unnamed(AttributeValue::String(
                unquoted.replace("''", "'"),
            ))],
        ));
    }

    // A bare identifier with no quoting is treated as an enum label.
    Some(Attribute::with_args(
        "default",
        vec![AttributeArg::unnamed(AttributeValue::String(trimmed.to_owned()))],
    ))
}

fn reverse_field(column: &ColumnInfo, known_enums: &[String]) -> Field {
    let (base, native_type) = reverse_type(column, known_enums);
    let mut field = Field::new(&column.name, FieldType::new(base).optional_if(column.nullable));

    if column.is_primary_key {
        field = field.with_attribute(Attribute::new("id"));
    }
    if column.is_unique && !column.is_primary_key {
        field = field.with_attribute(Attribute::new("unique"));
    }
    if let Some(attr) = native_type {
        field = field.with_attribute(attr);
    }
    if let Some(default_sql) = &column.default {
        if let Some(attr) = reverse_default(default_sql) {
            field = field.with_attribute(attr);
        }
    }

    field
}

/// A distinct `(table, referenced_table)` relation between two models,
/// used to disambiguate names when more than one foreign key links the
/// same pair of tables (spec §4.4).
struct RelationSite<'a> {
    fk: &'a ForeignKeyInfo,
}

fn relation_name(site: &RelationSite<'_>) -> String {
    format!(
        "{}_{}To{}",
        site.fk.table,
        site.fk.columns.join("_"),
        site.fk.referenced_table
    )
}

fn build_model(table: &TableInfo, known_enums: &[String]) -> Model {
    let mut model = Model::new(&table.name);
    for column in table.columns() {
        model = model.with_field(reverse_field(column, known_enums));
    }
    model
}

fn add_relation_fields(models: &mut BTreeMap<String, Model>, db: &DatabaseSchema) {
    let mut sites_by_pair: Vec<RelationSite> = Vec::new();
    for table in db.tables() {
        for fk in &table.foreign_keys {
            sites_by_pair.push(RelationSite { fk });
        }
    }

    let counts = sites_by_pair
        .iter()
        .map(|site| (site.fk.table.clone(), site.fk.referenced_table.clone()))
        .counts();

    for site in &sites_by_pair {
        let pair_key = (site.fk.table.clone(), site.fk.referenced_table.clone());
        let disambiguate = counts.get(&pair_key).copied().unwrap_or(0) > 1;
        let name = disambiguate.then(|| relation_name(site));

        let mut relation_args = vec![
            AttributeArg::named("fields", AttributeValue::List(site.fk.columns.clone())),
            AttributeArg::named("references", AttributeValue::List(site.fk.referenced_columns.clone())),
        ];
        if let Some(name) = &name {
            relation_args.push(AttributeArg::named("name", AttributeValue::String(name.clone())));
        }

        let is_nullable_fk = models
            .get(&site.fk.table)
            .and_then(|m| site.fk.columns.first().and_then(|c| m.field(c)))
            .map(|f| f.field_type.is_optional)
            .unwrap_or(false);

        if let Some(owning) = models.get_mut(&site.fk.table) {
            let scalar_field_name = site
                .fk
                .columns
                .first()
                .map(|c| c.trim_end_matches("Id").trim_end_matches("_id").to_owned())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| site.fk.referenced_table.to_lowercase());

            let field_type = FieldType::new(site.fk.referenced_table.clone()).optional_if(is_nullable_fk);
            owning.fields.push(
                Field::new(scalar_field_name, field_type)
                    .with_attribute(Attribute::with_args("relation", relation_args)),
            );
        }

        if let Some(referenced) = models.get_mut(&site.fk.referenced_table) {
            let back_field_name = format!("{}s", site.fk.table.to_lowercase());
            referenced.fields.push(Field::new(
                back_field_name,
                FieldType::new(site.fk.table.clone()).array(),
            ));
        }
    }
}

fn add_index_attributes(model: &mut Model, table: &TableInfo) {
    for index in &table.indexes {
        let columns: Vec<String> = index.columns.iter().map(|c| c.name.clone()).collect();
        let default_name = if index.is_unique {
            format!("{}_{}_key", table.name, columns[0])
        } else {
            format!("{}_{}_idx", table.name, columns[0])
        };

        let mut args = vec![AttributeArg::unnamed(AttributeValue::List(columns))];
        if index.name != default_name {
            args.push(AttributeArg::named("map", AttributeValue::String(index.name.clone())));
        }

        let attribute_name = if index.is_unique { "unique" } else { "index" };
        model.attributes.push(Attribute::with_args(attribute_name, args));
    }
}

/// Synthesizes a [`Schema`] from a [`DatabaseSchema`] for the `introspect`
/// flow (spec §4.4). `known_enums` names the enum types the introspector
/// separately discovered; columns whose `udt_name` matches one are mapped
/// to that enum rather than a scalar type.
pub fn reverse_map(db: &DatabaseSchema, known_enums: &[String]) -> Schema {
    let mut models: BTreeMap<String, Model> = db
        .tables()
        .map(|table| (table.name.clone(), build_model(table, known_enums)))
        .collect();

    add_relation_fields(&mut models, db);

    for table in db.tables() {
        if let Some(model) = models.get_mut(&table.name) {
            add_index_attributes(model, table);
        }
    }

    let mut schema = Schema::new();
    for table in db.tables() {
        if let Some(model) = models.remove(&table.name) {
            schema = schema.with_model(model);
        }
    }
    schema
}

trait OptionalIf {
    fn optional_if(self, condition: bool) -> Self;
}

impl OptionalIf for FieldType {
    fn optional_if(self, condition: bool) -> Self {
        if condition {
            self.optional()
        } else {
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sql_schema_describer::ColumnInfo;

    #[test]
    fn a_uuid_column_maps_back_to_string_with_a_db_uuid_attribute() {
        let column = ColumnInfo::new("id", "UUID");
        let (base, attr) = reverse_type(&column, &[]);
        assert_eq!(base, "String");
        assert_eq!(attr.unwrap().name, "db.Uuid");
    }

    #[test]
    fn a_table_with_no_relations_reverse_maps_to_a_model_with_matching_columns() {
        let table = TableInfo::new("users")
            .with_column(ColumnInfo::new("id", "INTEGER"))
            .with_column(ColumnInfo::new("email", "VARCHAR(255)"));
        let db = DatabaseSchema::new().with_table(table);

        let schema = reverse_map(&db, &[]);
        let model = schema.find_model("users").unwrap();
        assert_eq!(model.fields.len(), 2);
    }

    #[test]
    fn an_unrecognized_sql_type_falls_back_to_string_pinned_with_db_text() {
        let column = ColumnInfo::new("payload", "HSTORE");
        let (base, attr) = reverse_type(&column, &[]);
        assert_eq!(base, "String");
        assert_eq!(attr.unwrap().name, "db.Text");
    }

    #[test]
    fn nextval_reconstructs_as_autoincrement() {
        let attr = reverse_default("nextval('users_id_seq'::regclass)").unwrap();
        assert_eq!(attr.positional_arg(0).unwrap().function_name(), Some("autoincrement"));
    }
}
