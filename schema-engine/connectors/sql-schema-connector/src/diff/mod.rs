pub mod column_type;
pub mod default_value;
pub mod expected_schema;

use std::collections::BTreeSet;

use dml::Schema;
use schema_connector::{
    ColumnAddition, ColumnAlteration, ColumnDrop, ForeignKeyAlter, ForeignKeyCreate, ForeignKeyDrop,
    IndexCreate, IndexDrop, SchemaDiff, TableAlteration,
};
use sql_schema_describer::DatabaseSchema;

use crate::flavour::SqlDialect;

use expected_schema::{build_expected_tables, ExpectedTable};

fn build_table_alteration(expected: &ExpectedTable, db: &DatabaseSchema) -> Option<TableAlteration> {
    let db_table = db.table(&expected.name)?;

    let mut alteration = TableAlteration::new(&expected.name);

    for column in &expected.columns {
        if db_table.column(&column.name).is_none() {
            alteration.add_columns.push(ColumnAddition {
                column_name: column.name.clone(),
            });
        }
    }

    let expected_names: BTreeSet<&str> = expected.columns.iter().map(|c| c.name.as_str()).collect();
    for db_column in db_table.columns() {
        if !expected_names.contains(db_column.name.as_str()) {
            alteration.drop_columns.push(ColumnDrop {
                column_name: db_column.name.clone(),
            });
        }
    }

    for column in &expected.columns {
        if let Some(db_column) = db_table.column(&column.name) {
            if db_column.sql_type != column.sql_type || db_column.nullable != column.nullable {
                alteration.alter_columns.push(ColumnAlteration {
                    column_name: column.name.clone(),
                    new_sql_type: column.sql_type.clone(),
                    new_nullable: column.nullable,
                });
            }
        }
    }

    Some(alteration)
}

fn diff_tables(expected_tables: &[ExpectedTable], db: &DatabaseSchema) -> (Vec<String>, Vec<TableAlteration>, Vec<String>) {
    let mut tables_to_create = Vec::new();
    let mut tables_to_alter = Vec::new();

    for expected in expected_tables {
        if !db.contains_table(&expected.name) {
            tables_to_create.push(expected.name.clone());
            continue;
        }

        if let Some(alteration) = build_table_alteration(expected, db) {
            if !alteration.is_empty() {
                tables_to_alter.push(alteration);
            }
        }
    }

    let expected_names: BTreeSet<&str> = expected_tables.iter().map(|t| t.name.as_str()).collect();
    let tables_to_drop: Vec<String> = db
        .table_names()
        .filter(|name| !expected_names.contains(name))
        .map(str::to_owned)
        .collect();

    (tables_to_create, tables_to_alter, tables_to_drop)
}

fn diff_indexes(expected_tables: &[ExpectedTable], db: &DatabaseSchema) -> (Vec<IndexCreate>, Vec<IndexDrop>) {
    let mut indexes_to_create = Vec::new();
    let mut indexes_to_drop = Vec::new();

    for expected in expected_tables {
        let Some(db_table) = db.table(&expected.name) else {
            continue;
        };

        for index in &expected.indexes {
            let matched_by_name = db_table
                .indexes
                .iter()
                .any(|db_index| db_index.name.eq_ignore_ascii_case(&index.name));
            let matched_by_columns = db_table.indexes.iter().any(|db_index| {
                db_index.columns.len() == index.columns.len()
                    && db_index
                        .columns
                        .iter()
                        .zip(index.columns.iter())
                        .all(|(db_col, expected_col)| db_col.name.eq_ignore_ascii_case(expected_col))
            });

            if !matched_by_name && !matched_by_columns {
                indexes_to_create.push(IndexCreate {
                    table_name: expected.name.clone(),
                    index_name: index.name.clone(),
                });
            }
        }

        for db_index in &db_table.indexes {
            let still_expected = expected
                .indexes
                .iter()
                .any(|index| index.name.eq_ignore_ascii_case(&db_index.name));
            if !still_expected {
                indexes_to_drop.push(IndexDrop {
                    table_name: expected.name.clone(),
                    index_name: db_index.name.clone(),
                });
            }
        }
    }

    (indexes_to_create, indexes_to_drop)
}

fn diff_foreign_keys(
    expected_tables: &[ExpectedTable],
    db: &DatabaseSchema,
    tables_to_drop: &[String],
) -> (Vec<ForeignKeyCreate>, Vec<ForeignKeyAlter>, Vec<ForeignKeyDrop>) {
    let db_fks: Vec<_> = db.tables().flat_map(|table| table.foreign_keys.iter()).collect();

    let mut foreign_keys_to_create = Vec::new();
    let mut foreign_keys_to_alter = Vec::new();
    let mut matched_keys: BTreeSet<String> = BTreeSet::new();

    for expected in expected_tables {
        for fk in &expected.foreign_keys {
            let key = fk.structural_key();
            let existing = db_fks.iter().find(|db_fk| db_fk.structural_key() == key);

            match existing {
                None => {
                    foreign_keys_to_create.push(ForeignKeyCreate {
                        table_name: fk.table.clone(),
                        constraint_name: Some(fk.constraint_name.clone()),
                    });
                }
                Some(db_fk) if db_fk.on_delete != fk.on_delete || db_fk.on_update != fk.on_update => {
                    foreign_keys_to_alter.push(ForeignKeyAlter {
                        table_name: fk.table.clone(),
                        constraint_name: Some(fk.constraint_name.clone()),
                    });
                }
                Some(_) => {}
            }

            matched_keys.insert(key);
        }
    }

    let dropped: BTreeSet<&str> = tables_to_drop.iter().map(String::as_str).collect();
    let foreign_keys_to_drop: Vec<ForeignKeyDrop> = db_fks
        .iter()
        .filter(|db_fk| !matched_keys.contains(&db_fk.structural_key()))
        .filter(|db_fk| !dropped.contains(db_fk.table.as_str()))
        .map(|db_fk| ForeignKeyDrop {
            table_name: db_fk.table.clone(),
            constraint_name: db_fk.constraint_name.clone(),
        })
        .collect();

    (foreign_keys_to_create, foreign_keys_to_alter, foreign_keys_to_drop)
}

/// Produces a [`SchemaDiff`] that, when emitted and applied, transforms
/// `db` into a physical realization of `schema` (spec §4.1). Determinism:
/// every intermediate collection here is built by iterating `schema`'s
/// own declaration order, so repeated calls with the same inputs always
/// yield the same sequences (spec §4.1, "Determinism").
pub fn calculate_diff(schema: &Schema, db: &DatabaseSchema, dialect: &dyn SqlDialect) -> SchemaDiff {
    let expected_tables = build_expected_tables(schema, dialect);

    let (tables_to_create, tables_to_alter, tables_to_drop) = diff_tables(&expected_tables, db);
    let (indexes_to_create, indexes_to_drop) = diff_indexes(&expected_tables, db);
    let (foreign_keys_to_create, foreign_keys_to_alter, foreign_keys_to_drop) =
        diff_foreign_keys(&expected_tables, db, &tables_to_drop);

    SchemaDiff {
        tables_to_create,
        tables_to_alter,
        tables_to_drop,
        indexes_to_create,
        indexes_to_drop,
        foreign_keys_to_create,
        foreign_keys_to_alter,
        foreign_keys_to_drop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flavour::PostgresDialect;
    use dml::{Attribute, Field, FieldType, Model};
    use pretty_assertions::assert_eq;
    use sql_schema_describer::{ColumnInfo, TableInfo};

    #[test]
    fn an_empty_database_against_one_model_yields_a_single_table_creation() {
        let schema = Schema::new().with_model(
            Model::new("User").with_field(Field::new("id", FieldType::new("Int")).with_attribute(Attribute::new("id"))),
        );
        let db = DatabaseSchema::new();

        let diff = calculate_diff(&schema, &db, &PostgresDialect);

        assert_eq!(diff.tables_to_create, vec!["User".to_owned()]);
        assert!(diff.tables_to_alter.is_empty());
    }

    #[test]
    fn a_schema_matching_the_database_exactly_produces_no_table_level_changes() {
        let schema = Schema::new().with_model(
            Model::new("User").with_field(Field::new("id", FieldType::new("Int")).with_attribute(Attribute::new("id"))),
        );
        let db = DatabaseSchema::new().with_table(TableInfo::new("User").with_column(ColumnInfo::new("id", "INTEGER")));

        let diff = calculate_diff(&schema, &db, &PostgresDialect);

        assert!(diff.tables_to_create.is_empty());
        assert!(diff.tables_to_alter.is_empty());
        assert!(diff.tables_to_drop.is_empty());
    }

    #[test]
    fn a_table_absent_from_the_model_is_dropped() {
        let schema = Schema::new();
        let db = DatabaseSchema::new().with_table(TableInfo::new("Orphan").with_column(ColumnInfo::new("id", "INTEGER")));

        let diff = calculate_diff(&schema, &db, &PostgresDialect);

        assert_eq!(diff.tables_to_drop, vec!["Orphan".to_owned()]);
    }
}
