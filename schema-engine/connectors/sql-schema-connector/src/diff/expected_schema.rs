use dml::{Model, PrimaryKey, ReferentialAction, Schema};
use itertools::Itertools;
use sql_schema_describer::ForeignKeyAction;

use crate::flavour::SqlDialect;

use super::column_type::resolve_sql_type;
use super::default_value::extract_default;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedColumn {
    pub name: String,
    pub sql_type: String,
    pub nullable: bool,
    pub default: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedIndex {
    pub name: String,
    pub table: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedForeignKey {
    pub constraint_name: String,
    pub table: String,
    pub columns: Vec<String>,
    pub referenced_table: String,
    pub referenced_columns: Vec<String>,
    pub on_delete: ForeignKeyAction,
    pub on_update: ForeignKeyAction,
}

impl ExpectedForeignKey {
    pub fn structural_key(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.table.to_lowercase(),
            self.columns.iter().map(|c| c.to_lowercase()).join(","),
            self.referenced_table.to_lowercase(),
            self.referenced_columns.iter().map(|c| c.to_lowercase()).join(","),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedTable {
    pub name: String,
    pub columns: Vec<ExpectedColumn>,
    pub primary_key: PrimaryKey,
    pub indexes: Vec<ExpectedIndex>,
    pub foreign_keys: Vec<ExpectedForeignKey>,
}

fn to_foreign_key_action(action: ReferentialAction) -> ForeignKeyAction {
    match action {
        ReferentialAction::Cascade => ForeignKeyAction::Cascade,
        ReferentialAction::Restrict => ForeignKeyAction::Restrict,
        ReferentialAction::SetNull => ForeignKeyAction::SetNull,
        ReferentialAction::SetDefault => ForeignKeyAction::SetDefault,
        ReferentialAction::NoAction => ForeignKeyAction::NoAction,
    }
}

fn build_columns(model: &Model, schema: &Schema, dialect: &dyn SqlDialect) -> Vec<ExpectedColumn> {
    model
        .scalar_fields(schema)
        .map(|field| ExpectedColumn {
            name: field.column_name(),
            sql_type: resolve_sql_type(field, dialect),
            nullable: field.field_type.is_optional && !field.is_id(),
            default: extract_default(field),
        })
        .collect()
}

/// Expected indexes per spec §4.1 step 5: field-level `@unique`,
/// model-level `@@unique`, and model-level `@@index`, each with the
/// canonical name used when no `map:` argument overrides it.
fn build_indexes(model: &Model, table_name: &str) -> Vec<ExpectedIndex> {
    let mut indexes = Vec::new();

    for field in &model.fields {
        if field.is_unique() {
            let column = field.column_name();
            indexes.push(ExpectedIndex {
                name: format!("{table_name}_{column}_key"),
                table: table_name.to_owned(),
                columns: vec![column],
                unique: true,
            });
        }
    }

    for index in model.unique_indexes() {
        let name = index
            .map
            .clone()
            .unwrap_or_else(|| format!("{table_name}_{}_key", index.fields[0]));
        indexes.push(ExpectedIndex {
            name,
            table: table_name.to_owned(),
            columns: index.fields,
            unique: true,
        });
    }

    for index in model.plain_indexes() {
        let name = index
            .map
            .clone()
            .unwrap_or_else(|| format!("{table_name}_{}_idx", index.fields[0]));
        indexes.push(ExpectedIndex {
            name,
            table: table_name.to_owned(),
            columns: index.fields,
            unique: false,
        });
    }

    indexes
}

/// Expected foreign keys per spec §4.1 step 6. Fields whose `@relation`
/// does not resolve (missing `fields`/`references`, or pointing at an
/// unknown model) are silently skipped — an ambiguous relation does not
/// abort migration generation (spec §7).
fn build_foreign_keys(model: &Model, schema: &Schema, table_name: &str) -> Vec<ExpectedForeignKey> {
    model
        .relation_fields(schema)
        .filter_map(|field| {
            let info = field.relation_info()?;
            let referenced_model = schema.find_model(&field.field_type.base)?;
            let referenced_table = referenced_model.table_name();

            let columns: Vec<String> = info
                .fields
                .iter()
                .map(|name| model.field(name).map(|f| f.column_name()).unwrap_or_else(|| name.clone()))
                .collect();
            let referenced_columns: Vec<String> = info
                .references
                .iter()
                .map(|name| {
                    referenced_model
                        .field(name)
                        .map(|f| f.column_name())
                        .unwrap_or_else(|| name.clone())
                })
                .collect();

            let constraint_name = format!("{table_name}_{}_fkey", columns[0]);

            Some(ExpectedForeignKey {
                constraint_name,
                table: table_name.to_owned(),
                columns,
                referenced_table,
                referenced_columns,
                on_delete: to_foreign_key_action(info.on_delete.unwrap_or_default()),
                on_update: to_foreign_key_action(info.on_update.unwrap_or_default()),
            })
        })
        .collect()
}

/// Builds the expected physical schema from the declarative model (spec
/// §4.1 steps 1-3, 5-6). Step 4 (table comparison against the live
/// database) happens in [`super::calculate_diff`].
pub fn build_expected_tables(schema: &Schema, dialect: &dyn SqlDialect) -> Vec<ExpectedTable> {
    schema
        .models
        .iter()
        .map(|model| {
            let table_name = model.table_name();
            ExpectedTable {
                columns: build_columns(model, schema, dialect),
                primary_key: model.primary_key(),
                indexes: build_indexes(model, &table_name),
                foreign_keys: build_foreign_keys(model, schema, &table_name),
                name: table_name,
            }
        })
        .collect()
}
