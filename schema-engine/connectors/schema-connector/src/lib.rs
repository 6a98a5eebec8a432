//! Shared contracts consumed by the rest of the schema-diffing and
//! migration-generation core: the diff model, the driver contract, and
//! connector errors. Nothing in this crate talks to a real database — it
//! defines the shapes other crates agree on.

mod diff;
mod error;
mod executor;
mod migration_directory;
mod provider;

pub use diff::{
    ColumnAddition, ColumnAlteration, ColumnDrop, ForeignKeyAlter, ForeignKeyCreate, ForeignKeyDrop,
    IndexCreate, IndexDrop, SchemaDiff, TableAlteration,
};
pub use error::{ConnectorError, ConnectorResult};
pub use executor::{Connection, Executor, ParamValue, Row, Transaction};
pub use migration_directory::{list_migration_directories, MigrationDirectory};
pub use provider::Provider;
