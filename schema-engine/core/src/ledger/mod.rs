mod apply;
mod checksum;
mod directory;
mod mark;
mod record;
mod statement_splitter;
mod table;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use schema_connector::{Connection, ConnectorResult, MigrationDirectory, Provider, Row};
use sql_schema_connector::dialect_for;

pub use checksum::{checksum as compute_checksum, normalize, MANUAL_CHECKSUM};
pub use record::MigrationRecord;
pub use statement_splitter::split_statements;
pub use table::create_migrations_table_sql;

fn parse_timestamp(text: Option<&str>) -> Option<DateTime<Utc>> {
    text.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn row_to_record(row: &Row) -> Option<MigrationRecord> {
    Some(MigrationRecord {
        id: row.text_at(0)?.parse().ok()?,
        checksum: row.text_at(1)?.to_owned(),
        migration_name: row.text_at(2)?.to_owned(),
        started_at: parse_timestamp(row.text_at(3))?,
        finished_at: parse_timestamp(row.text_at(4)),
        rolled_back_at: parse_timestamp(row.text_at(5)),
        logs: row.text_at(6).map(str::to_owned),
        applied_steps_count: row.int_at(7).unwrap_or(0) as i32,
    })
}

/// The migration ledger for one invocation: the `_prisma_migrations`
/// table, the `migration_lock.toml` sibling, and the directory of local
/// migration folders (spec §4.3).
pub struct Ledger<'a> {
    connection: &'a dyn Connection,
    provider: Provider,
    migrations_root: PathBuf,
}

impl<'a> Ledger<'a> {
    pub fn new(connection: &'a dyn Connection, provider: Provider, migrations_root: impl Into<PathBuf>) -> Self {
        Ledger {
            connection,
            provider,
            migrations_root: migrations_root.into(),
        }
    }

    pub async fn ensure_table(&self) -> ConnectorResult<()> {
        self.connection.raw_cmd(&create_migrations_table_sql(self.provider)).await
    }

    pub fn ensure_lockfile(&self) -> ConnectorResult<()> {
        directory::ensure_lockfile(&self.migrations_root, self.provider)
    }

    pub fn list_local(&self) -> ConnectorResult<Vec<MigrationDirectory>> {
        directory::list_local(&self.migrations_root)
    }

    /// `SELECT migration_name FROM _prisma_migrations WHERE finished_at IS
    /// NOT NULL ORDER BY started_at` (spec §4.3, "List applied").
    pub async fn list_applied(&self) -> ConnectorResult<Vec<MigrationRecord>> {
        let dialect = dialect_for(self.provider);
        let table = dialect.quote_identifier("_prisma_migrations");
        let sql = format!(
            "SELECT id, checksum, migration_name, started_at, finished_at, rolled_back_at, logs, applied_steps_count \
             FROM {table} WHERE finished_at IS NOT NULL ORDER BY started_at"
        );
        let rows = self.connection.query(&sql, &[]).await?;
        Ok(rows.iter().filter_map(row_to_record).collect())
    }

    /// Local migrations not yet applied, preserving local (chronological)
    /// order (spec §4.3, "List pending").
    pub async fn list_pending(&self) -> ConnectorResult<Vec<MigrationDirectory>> {
        let local = self.list_local()?;
        let applied = self.list_applied().await?;
        let applied_names: std::collections::BTreeSet<&str> =
            applied.iter().map(|r| r.migration_name.as_str()).collect();

        Ok(local
            .into_iter()
            .filter(|dir| !applied_names.contains(dir.migration_name()))
            .collect())
    }

    /// Applied rows whose local directory has been deleted (spec §4.3,
    /// "List missing").
    pub async fn list_missing(&self) -> ConnectorResult<Vec<String>> {
        let local = self.list_local()?;
        let applied = self.list_applied().await?;
        let local_names: std::collections::BTreeSet<&str> = local.iter().map(|dir| dir.migration_name()).collect();

        Ok(applied
            .into_iter()
            .map(|r| r.migration_name)
            .filter(|name| !local_names.contains(name.as_str()))
            .collect())
    }

    /// Applied rows whose current local script no longer matches the
    /// stored checksum, excluding rows marked `"manual"` (spec §4.3, "List
    /// modified").
    pub async fn list_modified(&self) -> ConnectorResult<Vec<String>> {
        let local = self.list_local()?;
        let applied = self.list_applied().await?;

        let mut modified = Vec::new();
        for record in &applied {
            let Some(dir) = local.iter().find(|d| d.migration_name() == record.migration_name) else {
                continue;
            };
            let Ok(script) = dir.read_migration_script() else {
                continue;
            };
            let recomputed = compute_checksum(&script);
            if record.is_modified(&recomputed) {
                modified.push(record.migration_name.clone());
            }
        }

        Ok(modified)
    }

    pub async fn apply_one(&self, directory: &MigrationDirectory) -> ConnectorResult<MigrationRecord> {
        apply::apply_migration(self.connection, self.provider, directory).await
    }

    pub async fn mark_applied(&self, migration_name: &str) -> ConnectorResult<MigrationRecord> {
        mark::mark_applied(self.connection, self.provider, migration_name).await
    }

    pub async fn mark_rolled_back(&self, migration_name: &str) -> ConnectorResult<MigrationRecord> {
        mark::mark_rolled_back(self.connection, self.provider, migration_name).await
    }

    pub fn migrations_root(&self) -> &Path {
        &self.migrations_root
    }
}
