use dml::Schema;
use schema_connector::{ConnectorResult, SchemaDiff, TableAlteration};
use sql_schema_connector::{calculate_diff, SqlDialect};
use sql_schema_describer::DatabaseSchema;

use crate::ledger::Ledger;

/// `true` iff the diff contains any change the drift detector considers
/// (spec §4.3.3): table and index changes, deliberately excluding
/// foreign-key-only differences — an FK whose `onDelete`/`onUpdate`
/// changed, with nothing else, does not by itself constitute drift.
fn diff_indicates_drift(diff: &SchemaDiff) -> bool {
    !diff.tables_to_create.is_empty()
        || !diff.tables_to_alter.iter().all(TableAlteration::is_empty)
        || !diff.tables_to_drop.is_empty()
        || !diff.indexes_to_create.is_empty()
        || !diff.indexes_to_drop.is_empty()
}

/// Drift detection (spec §4.3.3): if any local migration is unapplied,
/// analysis is refused and reports no drift — the pending migration
/// itself explains the discrepancy, so diffing against the live database
/// would be comparing against a moving target.
pub async fn detect_drift(
    ledger: &Ledger<'_>,
    schema: &Schema,
    db: &DatabaseSchema,
    dialect: &dyn SqlDialect,
) -> ConnectorResult<Option<SchemaDiff>> {
    if !ledger.list_pending().await?.is_empty() {
        return Ok(None);
    }

    let diff = calculate_diff(schema, db, dialect);
    Ok(if diff_indicates_drift(&diff) { Some(diff) } else { None })
}

/// The human-readable drift summary (spec §4.3.3): added/removed tables,
/// per-table added/removed/changed columns, and added/removed indexes,
/// using the bracketed-tag convention.
pub fn format_drift_summary(diff: &SchemaDiff) -> String {
    let mut lines = Vec::new();

    for table in &diff.tables_to_create {
        lines.push(format!("[+] Added table `{table}`"));
    }
    for table in &diff.tables_to_drop {
        lines.push(format!("[-] Removed table `{table}`"));
    }
    for alteration in &diff.tables_to_alter {
        for column in &alteration.add_columns {
            lines.push(format!(
                "[+] Added column `{}` on `{}`",
                column.column_name, alteration.table_name
            ));
        }
        for column in &alteration.drop_columns {
            lines.push(format!(
                "[-] Removed column `{}` on `{}`",
                column.column_name, alteration.table_name
            ));
        }
        for column in &alteration.alter_columns {
            lines.push(format!(
                "[*] Changed column `{}` on `{}`",
                column.column_name, alteration.table_name
            ));
        }
    }
    for index in &diff.indexes_to_create {
        lines.push(format!("[+] Added index `{}`", index.index_name));
    }
    for index in &diff.indexes_to_drop {
        lines.push(format!("[-] Removed index `{}`", index.index_name));
    }

    lines.join("\n")
}

/// The action the developer-facing workflow should take next (spec
/// §4.3.3, "developer diagnostic"), in priority order: modified
/// migrations outrank missing ones, which outrank plain drift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeveloperAction {
    Reset { reason: String },
    CreateMigration,
}

#[tracing::instrument(skip_all)]
pub async fn developer_diagnostic(
    ledger: &Ledger<'_>,
    schema: &Schema,
    db: &DatabaseSchema,
    dialect: &dyn SqlDialect,
) -> ConnectorResult<DeveloperAction> {
    let modified = ledger.list_modified().await?;
    if !modified.is_empty() {
        tracing::info!(count = modified.len(), "modified migrations detected");
        return Ok(DeveloperAction::Reset {
            reason: format!(
                "The following migration(s) have been modified since they were applied: {}",
                modified.join(", ")
            ),
        });
    }

    let missing = ledger.list_missing().await?;
    if !missing.is_empty() {
        tracing::info!(count = missing.len(), "missing migrations detected");
        return Ok(DeveloperAction::Reset {
            reason: format!(
                "The following migration(s) are recorded as applied but are missing locally: {}",
                missing.join(", ")
            ),
        });
    }

    if let Some(diff) = detect_drift(ledger, schema, db, dialect).await? {
        tracing::info!("schema drift detected");
        return Ok(DeveloperAction::Reset {
            reason: format_drift_summary(&diff),
        });
    }

    Ok(DeveloperAction::CreateMigration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schema_connector::{ColumnAddition, ColumnDrop};

    #[test]
    fn a_diff_with_only_a_foreign_key_change_does_not_indicate_drift() {
        let mut diff = SchemaDiff::default();
        diff.foreign_keys_to_alter.push(schema_connector::ForeignKeyAlter {
            table_name: "Book".into(),
            constraint_name: Some("Book_author_id_fkey".into()),
        });

        assert!(!diff_indicates_drift(&diff));
    }

    #[test]
    fn a_diff_with_a_table_creation_indicates_drift() {
        let mut diff = SchemaDiff::default();
        diff.tables_to_create.push("User".into());
        assert!(diff_indicates_drift(&diff));
    }

    #[test]
    fn drift_summary_uses_bracketed_tags() {
        let mut diff = SchemaDiff::default();
        diff.tables_to_create.push("User".into());
        let mut alteration = TableAlteration::new("Post");
        alteration.add_columns.push(ColumnAddition {
            column_name: "title".into(),
        });
        alteration.drop_columns.push(ColumnDrop {
            column_name: "legacy".into(),
        });
        diff.tables_to_alter.push(alteration);

        let summary = format_drift_summary(&diff);
        assert!(summary.contains("[+] Added table `User`"));
        assert!(summary.contains("[+] Added column `title` on `Post`"));
        assert!(summary.contains("[-] Removed column `legacy` on `Post`"));
    }
}
