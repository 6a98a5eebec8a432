use std::fs;
use std::path::{Path, PathBuf};

use dml::Schema;
use schema_connector::SchemaDiff;
use sql_schema_connector::{build_expected_tables, calculate_diff, render_migration, SqlDialect};
use sql_schema_describer::DatabaseSchema;

/// Errors specific to writing a new migration directory to disk — a
/// surface the connector-level error kinds (spec §7) don't cover, since
/// they describe database operations rather than local file layout.
#[derive(Debug, thiserror::Error)]
pub enum CreateMigrationError {
    #[error("Could not create migration directory `{path}`: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write migration script `{path}`: {source}")]
    WriteScript {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn slugify(name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    if slug.is_empty() {
        "migration".to_owned()
    } else {
        slug
    }
}

/// Computes the pending diff between `schema` and `db`, renders it, and
/// writes it to a freshly created `<migrations_root>/<timestamp>_<slug>/
/// migration.sql` (spec §6.1). Returns the diff and the directory path;
/// an empty diff still produces an (empty) migration.sql, mirroring the
/// reference tool's behaviour of always recording intent.
pub fn create_migration(
    migrations_root: &Path,
    timestamp: &str,
    name: &str,
    schema: &Schema,
    db: &DatabaseSchema,
    dialect: &dyn SqlDialect,
) -> Result<(SchemaDiff, PathBuf), CreateMigrationError> {
    let diff = calculate_diff(schema, db, dialect);
    let expected_tables = build_expected_tables(schema, dialect);
    let script = render_migration(&diff, &expected_tables, dialect);

    let dir_name = format!("{timestamp}_{}", slugify(name));
    let dir_path = migrations_root.join(dir_name);

    fs::create_dir_all(&dir_path).map_err(|source| CreateMigrationError::CreateDir {
        path: dir_path.clone(),
        source,
    })?;

    let script_path = dir_path.join("migration.sql");
    fs::write(&script_path, script).map_err(|source| CreateMigrationError::WriteScript {
        path: script_path,
        source,
    })?;

    tracing::info!(directory = %dir_path.display(), "wrote migration script");

    Ok((diff, dir_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_with_spaces_and_punctuation_slugify_to_lowercase_underscored() {
        assert_eq!(slugify("Add User Table!"), "add_user_table_");
    }

    #[test]
    fn an_empty_name_falls_back_to_a_generic_slug() {
        assert_eq!(slugify(""), "migration");
    }
}
