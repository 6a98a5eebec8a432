use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use schema_connector::{list_migration_directories, ConnectorError, ConnectorResult, MigrationDirectory, Provider};
use serde::{Deserialize, Serialize};

const LOCK_FILE_NAME: &str = "migration_lock.toml";

static MIGRATION_NAME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{14}_.+$").expect("static regex is valid"));

#[derive(Debug, Serialize, Deserialize)]
struct MigrationLockFile {
    provider: String,
}

/// Enumerates local migration directories whose name matches
/// `^[0-9]{14}_.+$` and that contain a readable `migration.sql`, sorted
/// ascending by name (spec §4.3, "List local").
pub fn list_local(migrations_root: &Path) -> ConnectorResult<Vec<MigrationDirectory>> {
    let directories = list_migration_directories(migrations_root)?;
    Ok(directories
        .into_iter()
        .filter(|dir| MIGRATION_NAME_PATTERN.is_match(dir.migration_name()))
        .collect())
}

fn lock_file_path(migrations_root: &Path) -> std::path::PathBuf {
    migrations_root.join(LOCK_FILE_NAME)
}

/// Writes `migration_lock.toml` if absent; if present with a different
/// provider, fails with a mismatch error (spec §4.3, "Ensure lockfile").
pub fn ensure_lockfile(migrations_root: &Path, provider: Provider) -> ConnectorResult<()> {
    let path = lock_file_path(migrations_root);

    if !path.exists() {
        std::fs::create_dir_all(migrations_root)
            .map_err(|err| ConnectorError::from_msg(format!("Failed to create migrations directory: {err}")))?;
        let contents = format!("provider = \"{}\"\n", provider.as_psl_name());
        std::fs::write(&path, contents)
            .map_err(|err| ConnectorError::from_msg(format!("Failed to write migration lockfile: {err}")))?;
        return Ok(());
    }

    let found = read_lockfile_provider(migrations_root)?;
    if found != provider.as_psl_name() {
        return Err(ConnectorError::LockfileProviderMismatch {
            expected: found,
            found: provider.as_psl_name().to_owned(),
        });
    }

    Ok(())
}

pub fn read_lockfile_provider(migrations_root: &Path) -> ConnectorResult<String> {
    let path = lock_file_path(migrations_root);
    let contents = std::fs::read_to_string(&path)
        .map_err(|err| ConnectorError::from_msg(format!("Failed to read migration lockfile: {err}")))?;
    let parsed: MigrationLockFile =
        toml::from_str(&contents).map_err(|err| ConnectorError::from_msg(format!("Invalid migration lockfile: {err}")))?;
    Ok(parsed.provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_lockfile_writes_the_provider_on_first_run() {
        let dir = std::env::temp_dir().join(format!("schema-core-test-{}", uuid::Uuid::new_v4()));
        ensure_lockfile(&dir, Provider::Postgres).unwrap();

        assert_eq!(read_lockfile_provider(&dir).unwrap(), "postgresql");
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn ensure_lockfile_rejects_a_provider_mismatch_on_a_second_run() {
        let dir = std::env::temp_dir().join(format!("schema-core-test-{}", uuid::Uuid::new_v4()));
        ensure_lockfile(&dir, Provider::Postgres).unwrap();

        let result = ensure_lockfile(&dir, Provider::Mysql);
        assert!(matches!(result, Err(ConnectorError::LockfileProviderMismatch { .. })));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
