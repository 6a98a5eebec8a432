//! The migration engine core: the migration ledger (spec §4.3), drift
//! detection and developer diagnostics (spec §4.3.3), the `create migration`
//! file-writing operation (spec §6.1), and the introspection reverse
//! mapper (spec §4.4). Diffing and DDL rendering themselves live in
//! `sql-schema-connector`; this crate is the orchestration layer on top.

pub mod create_migration;
pub mod drift;
pub mod ledger;
pub mod reverse_map;

pub use create_migration::{create_migration, CreateMigrationError};
pub use drift::{detect_drift, developer_diagnostic, format_drift_summary, DeveloperAction};
pub use ledger::{compute_checksum, create_migrations_table_sql, normalize, Ledger, MigrationRecord, MANUAL_CHECKSUM};
pub use reverse_map::reverse_map;
