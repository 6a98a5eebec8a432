/// A single column addition, removal, or type/nullability/default change
/// inside a table that survives the diff (spec §3.3).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ColumnAddition {
    pub column_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ColumnDrop {
    pub column_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ColumnAlteration {
    pub column_name: String,
    pub new_sql_type: String,
    pub new_nullable: bool,
}

/// Everything that changed about one table that isn't itself created or
/// dropped wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TableAlteration {
    pub table_name: String,
    pub add_columns: Vec<ColumnAddition>,
    pub drop_columns: Vec<ColumnDrop>,
    pub alter_columns: Vec<ColumnAlteration>,
}

impl TableAlteration {
    pub fn new(table_name: impl Into<String>) -> Self {
        TableAlteration {
            table_name: table_name.into(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.add_columns.is_empty() && self.drop_columns.is_empty() && self.alter_columns.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IndexCreate {
    pub table_name: String,
    pub index_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IndexDrop {
    pub table_name: String,
    pub index_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ForeignKeyCreate {
    pub table_name: String,
    pub constraint_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ForeignKeyAlter {
    pub table_name: String,
    pub constraint_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ForeignKeyDrop {
    pub table_name: String,
    pub constraint_name: Option<String>,
}

/// A record of nine ordered sequences comparing the expected schema to the
/// physical schema (spec §3.3). Nothing in a `SchemaDiff` is itself SQL —
/// it is rendered into DDL by a separate stage, and is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SchemaDiff {
    pub tables_to_create: Vec<String>,
    pub tables_to_alter: Vec<TableAlteration>,
    pub tables_to_drop: Vec<String>,
    pub indexes_to_create: Vec<IndexCreate>,
    pub indexes_to_drop: Vec<IndexDrop>,
    pub foreign_keys_to_create: Vec<ForeignKeyCreate>,
    pub foreign_keys_to_alter: Vec<ForeignKeyAlter>,
    pub foreign_keys_to_drop: Vec<ForeignKeyDrop>,
}

impl SchemaDiff {
    /// A diff with nothing in any of the nine sequences represents no
    /// schema change at all (spec §8, "empty diff" property).
    pub fn is_empty(&self) -> bool {
        self.tables_to_create.is_empty()
            && self.tables_to_alter.iter().all(TableAlteration::is_empty)
            && self.tables_to_drop.is_empty()
            && self.indexes_to_create.is_empty()
            && self.indexes_to_drop.is_empty()
            && self.foreign_keys_to_create.is_empty()
            && self.foreign_keys_to_alter.is_empty()
            && self.foreign_keys_to_drop.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_diff_is_empty() {
        assert!(SchemaDiff::default().is_empty());
    }

    #[test]
    fn a_table_alteration_with_no_column_changes_does_not_count_against_emptiness() {
        let mut diff = SchemaDiff::default();
        diff.tables_to_alter.push(TableAlteration::new("User"));
        assert!(diff.is_empty());
    }

    #[test]
    fn a_real_column_addition_makes_the_diff_non_empty() {
        let mut diff = SchemaDiff::default();
        let mut alteration = TableAlteration::new("User");
        alteration.add_columns.push(ColumnAddition {
            column_name: "nickname".into(),
        });
        diff.tables_to_alter.push(alteration);
        assert!(!diff.is_empty());
    }
}
