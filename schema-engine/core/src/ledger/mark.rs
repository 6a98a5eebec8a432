use chrono::Utc;
use schema_connector::{Connection, ConnectorResult, ParamValue, Provider};
use sql_schema_connector::dialect_for;

use super::record::MigrationRecord;

async fn upsert(connection: &dyn Connection, provider: Provider, record: &MigrationRecord) -> ConnectorResult<()> {
    let dialect = dialect_for(provider);
    let table = dialect.quote_identifier("_prisma_migrations");

    connection
        .execute(
            &format!("DELETE FROM {table} WHERE migration_name = {}", provider.placeholder(1)),
            &[ParamValue::Text(record.migration_name.clone())],
        )
        .await?;

    connection
        .execute(
            &format!(
                "INSERT INTO {table} (id, checksum, migration_name, started_at, finished_at, rolled_back_at, applied_steps_count) \
                 VALUES ({}, {}, {}, {}, {}, {}, {})",
                provider.placeholder(1),
                provider.placeholder(2),
                provider.placeholder(3),
                provider.placeholder(4),
                provider.placeholder(5),
                provider.placeholder(6),
                provider.placeholder(7),
            ),
            &[
                ParamValue::Text(record.id.to_string()),
                ParamValue::Text(record.checksum.clone()),
                ParamValue::Text(record.migration_name.clone()),
                ParamValue::Text(record.started_at.to_rfc3339()),
                ParamValue::from(record.finished_at.map(|t| t.to_rfc3339())),
                ParamValue::from(record.rolled_back_at.map(|t| t.to_rfc3339())),
                ParamValue::Int(record.applied_steps_count as i64),
            ],
        )
        .await?;

    Ok(())
}

/// Marks a migration as applied without actually running it — used when a
/// database already reflects the migration's effect (spec §4.3, "Mark
/// applied"). The row gets the `"manual"` checksum placeholder so it is
/// never reported as modified.
pub async fn mark_applied(connection: &dyn Connection, provider: Provider, migration_name: &str) -> ConnectorResult<MigrationRecord> {
    let record = MigrationRecord::marked_applied(migration_name, Utc::now());
    upsert(connection, provider, &record).await?;
    Ok(record)
}

/// Marks a previously-applied migration as rolled back (spec §4.3, "Mark
/// rolled back"): `rolled_back_at` is set and `finished_at` cleared.
pub async fn mark_rolled_back(
    connection: &dyn Connection,
    provider: Provider,
    migration_name: &str,
) -> ConnectorResult<MigrationRecord> {
    let record = MigrationRecord::marked_rolled_back(migration_name, Utc::now());
    upsert(connection, provider, &record).await?;
    Ok(record)
}
