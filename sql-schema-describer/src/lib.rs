//! The physical schema model (what introspection produces) and the
//! introspector contract that produces it.

mod describer;
mod schema;

pub use describer::SchemaDescriber;
pub use schema::{
    ColumnInfo, DatabaseSchema, ForeignKeyAction, ForeignKeyInfo, IndexColumn, IndexInfo, SortOrder,
    TableInfo,
};
