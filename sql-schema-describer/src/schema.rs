use std::collections::BTreeMap;

/// Sort direction of one column within an index (spec §3.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Asc
    }
}

/// The referential action a foreign key enforces on delete/update of the
/// referenced row. Kept local to the physical model rather than shared with
/// `dml::ReferentialAction` — the two travel through different
/// serializations (SQL keywords here, PSL literals there) even though the
/// variant set coincides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ForeignKeyAction {
    Cascade,
    Restrict,
    SetNull,
    SetDefault,
    NoAction,
}

impl ForeignKeyAction {
    pub fn as_sql(self) -> &'static str {
        match self {
            ForeignKeyAction::Cascade => "CASCADE",
            ForeignKeyAction::Restrict => "RESTRICT",
            ForeignKeyAction::SetNull => "SET NULL",
            ForeignKeyAction::SetDefault => "SET DEFAULT",
            ForeignKeyAction::NoAction => "NO ACTION",
        }
    }
}

impl Default for ForeignKeyAction {
    fn default() -> Self {
        ForeignKeyAction::Cascade
    }
}

/// One column as introspected from a live database (spec §3.2).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub sql_type: String,
    pub nullable: bool,
    pub is_primary_key: bool,
    pub is_unique: bool,
    pub default: Option<String>,
    pub udt_name: Option<String>,
    pub character_maximum_length: Option<u32>,
    pub datetime_precision: Option<u32>,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        ColumnInfo {
            name: name.into(),
            sql_type: sql_type.into(),
            nullable: false,
            is_primary_key: false,
            is_unique: false,
            default: None,
            udt_name: None,
            character_maximum_length: None,
            datetime_precision: None,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn with_default(mut self, expr: impl Into<String>) -> Self {
        self.default = Some(expr.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IndexColumn {
    pub name: String,
    pub sort_order: SortOrder,
}

/// One index as introspected (spec §3.2).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct IndexInfo {
    pub name: String,
    pub table: String,
    pub columns: Vec<IndexColumn>,
    pub is_unique: bool,
}

/// One foreign key constraint as introspected (spec §3.2).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ForeignKeyInfo {
    pub constraint_name: Option<String>,
    pub table: String,
    pub columns: Vec<String>,
    pub referenced_table: String,
    pub referenced_columns: Vec<String>,
    pub on_delete: ForeignKeyAction,
    pub on_update: ForeignKeyAction,
}

impl ForeignKeyInfo {
    /// The structural key used for FK matching independent of constraint
    /// name: `lower(table)|lower(cols)|lower(ref_table)|lower(ref_cols)`
    /// (spec §4.1 step 6). Symmetric case-insensitive equality (spec §8,
    /// property 6) follows directly from lower-casing every component.
    pub fn structural_key(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.table.to_lowercase(),
            self.columns.iter().map(|c| c.to_lowercase()).collect::<Vec<_>>().join(","),
            self.referenced_table.to_lowercase(),
            self.referenced_columns
                .iter()
                .map(|c| c.to_lowercase())
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}

/// One table as introspected, preserving original column order (spec
/// §3.2).
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct TableInfo {
    pub name: String,
    columns: BTreeMap<String, ColumnInfo>,
    column_order: Vec<String>,
    pub indexes: Vec<IndexInfo>,
    pub foreign_keys: Vec<ForeignKeyInfo>,
}

impl TableInfo {
    pub fn new(name: impl Into<String>) -> Self {
        TableInfo {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_column(mut self, column: ColumnInfo) -> Self {
        self.push_column(column);
        self
    }

    pub fn push_column(&mut self, column: ColumnInfo) {
        if !self.columns.contains_key(&column.name) {
            self.column_order.push(column.name.clone());
        }
        self.columns.insert(column.name.clone(), column);
    }

    pub fn with_index(mut self, index: IndexInfo) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn with_foreign_key(mut self, fk: ForeignKeyInfo) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.get(name)
    }

    /// Columns in original `ordinal_position` order.
    pub fn columns(&self) -> impl Iterator<Item = &ColumnInfo> {
        self.column_order.iter().filter_map(move |name| self.columns.get(name))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.column_order.iter().map(String::as_str)
    }
}

/// A mapping from table name to [`TableInfo`] (spec §3.2). Freshly
/// introspected on demand; never persisted.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct DatabaseSchema {
    tables: BTreeMap<String, TableInfo>,
}

impl DatabaseSchema {
    pub fn new() -> Self {
        DatabaseSchema::default()
    }

    pub fn with_table(mut self, table: TableInfo) -> Self {
        self.tables.insert(table.name.clone(), table);
        self
    }

    pub fn table(&self, name: &str) -> Option<&TableInfo> {
        self.tables.get(name)
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableInfo> {
        self.tables.values()
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn contains_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn columns_are_reported_in_insertion_order_not_sorted_order() {
        let table = TableInfo::new("users")
            .with_column(ColumnInfo::new("email", "VARCHAR(255)"))
            .with_column(ColumnInfo::new("id", "UUID"));

        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(names, vec!["email", "id"]);
    }

    #[test]
    fn structural_key_is_case_insensitive() {
        let a = ForeignKeyInfo {
            constraint_name: Some("books_author_id_fkey".into()),
            table: "Books".into(),
            columns: vec!["Author_Id".into()],
            referenced_table: "AUTHORS".into(),
            referenced_columns: vec!["ID".into()],
            on_delete: ForeignKeyAction::Cascade,
            on_update: ForeignKeyAction::Cascade,
        };
        let b = ForeignKeyInfo {
            constraint_name: None,
            table: "books".into(),
            columns: vec!["author_id".into()],
            referenced_table: "authors".into(),
            referenced_columns: vec!["id".into()],
            on_delete: ForeignKeyAction::Restrict,
            on_update: ForeignKeyAction::Restrict,
        };

        assert_eq!(a.structural_key(), b.structural_key());
    }
}
