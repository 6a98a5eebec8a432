use std::path::{Path, PathBuf};

use crate::error::{ConnectorError, ConnectorResult};

/// One directory on disk holding a single migration's `migration.sql` (spec
/// §6.1). The core treats the migrations directory as a plain filesystem
/// tree; reading and writing it is not behind any trait because there is
/// only ever one implementation (the local filesystem).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationDirectory {
    path: PathBuf,
}

const SCRIPT_FILE_NAME: &str = "migration.sql";

impl MigrationDirectory {
    pub fn new(path: PathBuf) -> Self {
        MigrationDirectory { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The directory's own name, e.g. `20231004123045_init`. This is also
    /// the ledger's `migration_name`.
    pub fn migration_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }

    /// The 14-digit timestamp prefix, sorted lexicographically as the
    /// application order (spec §6.1).
    pub fn timestamp_prefix(&self) -> Option<&str> {
        self.migration_name().split_once('_').map(|(prefix, _)| prefix)
    }

    pub fn script_path(&self) -> PathBuf {
        self.path.join(SCRIPT_FILE_NAME)
    }

    pub fn read_migration_script(&self) -> ConnectorResult<String> {
        std::fs::read_to_string(self.script_path()).map_err(|err| {
            ConnectorError::from_msg(format!(
                "Failed to read migration script for `{}`: {err}",
                self.migration_name()
            ))
        })
    }
}

/// Lists migration directories under `migrations_root`, sorted by name
/// (and therefore by timestamp prefix), skipping anything that doesn't
/// look like a migration directory.
pub fn list_migration_directories(migrations_root: &Path) -> ConnectorResult<Vec<MigrationDirectory>> {
    if !migrations_root.exists() {
        return Ok(Vec::new());
    }

    let mut entries: Vec<MigrationDirectory> = std::fs::read_dir(migrations_root)
        .map_err(|err| ConnectorError::from_msg(format!("Failed to read migrations directory: {err}")))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .map(|entry| MigrationDirectory::new(entry.path()))
        .filter(|dir| dir.script_path().is_file())
        .collect();

    entries.sort_by(|a, b| a.migration_name().cmp(b.migration_name()));

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migration_name_is_the_directory_basename() {
        let dir = MigrationDirectory::new(PathBuf::from("/migrations/20231004123045_init"));
        assert_eq!(dir.migration_name(), "20231004123045_init");
    }

    #[test]
    fn timestamp_prefix_splits_on_first_underscore() {
        let dir = MigrationDirectory::new(PathBuf::from("/migrations/20231004123045_add_users"));
        assert_eq!(dir.timestamp_prefix(), Some("20231004123045"));
    }

    #[test]
    fn missing_migrations_root_yields_an_empty_list_not_an_error() {
        let result = list_migration_directories(Path::new("/nonexistent/migrations/root")).unwrap();
        assert!(result.is_empty());
    }
}
