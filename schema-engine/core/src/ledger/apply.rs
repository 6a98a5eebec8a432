use chrono::Utc;
use schema_connector::{Connection, ConnectorError, ConnectorResult, MigrationDirectory, ParamValue, Provider};
use sql_schema_connector::dialect_for;

use super::checksum::checksum;
use super::record::MigrationRecord;
use super::statement_splitter::split_statements;

/// Applies one migration transactionally (spec §4.3, "Apply one
/// migration"): open a transaction, insert the ledger row, execute every
/// statement of the script in order on that transaction, stamp
/// `finished_at`, and commit. Any statement failure rolls the whole
/// transaction back and the ledger row is never committed, so the
/// migration is not recorded as applied and a retry resumes at the same
/// migration.
#[tracing::instrument(skip(connection, directory), fields(migration = %directory.migration_name()))]
pub async fn apply_migration(
    connection: &dyn Connection,
    provider: Provider,
    directory: &MigrationDirectory,
) -> ConnectorResult<MigrationRecord> {
    let script = directory.read_migration_script()?;
    let migration_name = directory.migration_name().to_owned();
    let checksum = checksum(&script);
    let statements = split_statements(&script);

    let tx = connection.begin_transaction().await?;
    let dialect = dialect_for(provider);
    let table = dialect.quote_identifier("_prisma_migrations");

    let mut record = MigrationRecord::new(&migration_name, &checksum, Utc::now());

    let insert_sql = format!(
        "INSERT INTO {table} (id, checksum, migration_name, started_at, applied_steps_count) VALUES ({}, {}, {}, {}, {})",
        provider.placeholder(1),
        provider.placeholder(2),
        provider.placeholder(3),
        provider.placeholder(4),
        provider.placeholder(5),
    );
    tx.execute(
        &insert_sql,
        &[
            ParamValue::Text(record.id.to_string()),
            ParamValue::Text(record.checksum.clone()),
            ParamValue::Text(record.migration_name.clone()),
            ParamValue::Text(record.started_at.to_rfc3339()),
            ParamValue::Int(1),
        ],
    )
    .await?;

    for (index, statement) in statements.iter().enumerate() {
        if let Err(source) = tx.execute(statement, &[]).await {
            let excerpt: String = statement.chars().take(120).collect();
            tracing::warn!(statement_index = index, "migration statement failed");
            return Err(ConnectorError::migration_application_failed(
                migration_name.clone(),
                excerpt,
                StatementFailure {
                    index,
                    inner: source.to_string(),
                },
            ));
        }
    }

    record.finished_at = Some(Utc::now());
    record.applied_steps_count = statements.len() as i32;
    tracing::info!(steps = record.applied_steps_count, "migration applied");

    let update_sql = format!(
        "UPDATE {table} SET finished_at = {}, applied_steps_count = {} WHERE id = {}",
        provider.placeholder(1),
        provider.placeholder(2),
        provider.placeholder(3),
    );
    tx.execute(
        &update_sql,
        &[
            ParamValue::Text(record.finished_at.unwrap().to_rfc3339()),
            ParamValue::Int(record.applied_steps_count as i64),
            ParamValue::Text(record.id.to_string()),
        ],
    )
    .await?;

    tx.commit().await?;

    Ok(record)
}

#[derive(Debug)]
struct StatementFailure {
    index: usize,
    inner: String,
}

impl std::fmt::Display for StatementFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "statement #{}: {}", self.index, self.inner)
    }
}

impl std::error::Error for StatementFailure {}
