use indoc::formatdoc;
use schema_connector::Provider;
use sql_schema_connector::{dialect_for, SqlDialect};

/// `CREATE TABLE IF NOT EXISTS` for `_prisma_migrations`, dialect-specific
/// only in its timestamp column type and identifier quoting (spec §3.4,
/// §6.2).
pub fn create_migrations_table_sql(provider: Provider) -> String {
    let dialect = dialect_for(provider);
    let ts_type = dialect.ledger_timestamp_type();
    let table = dialect.quote_identifier("_prisma_migrations");

    match provider {
        Provider::Postgres | Provider::Sqlite => formatdoc! {r#"
            CREATE TABLE IF NOT EXISTS {table} (
                "id"                    VARCHAR(36) NOT NULL,
                "checksum"              VARCHAR(64) NOT NULL,
                "migration_name"        VARCHAR(255) NOT NULL,
                "started_at"            {ts_type} NOT NULL,
                "finished_at"           {ts_type},
                "rolled_back_at"        {ts_type},
                "logs"                  TEXT,
                "applied_steps_count"   INTEGER NOT NULL DEFAULT 0,

                CONSTRAINT "_prisma_migrations_pkey" PRIMARY KEY ("id")
            );
        "#},
        Provider::Mysql => formatdoc! {r#"
            CREATE TABLE IF NOT EXISTS {table} (
                `id`                    VARCHAR(36) NOT NULL,
                `checksum`              VARCHAR(64) NOT NULL,
                `migration_name`        VARCHAR(255) NOT NULL,
                `started_at`            {ts_type} NOT NULL,
                `finished_at`           {ts_type},
                `rolled_back_at`        {ts_type},
                `logs`                  TEXT,
                `applied_steps_count`   INTEGER NOT NULL DEFAULT 0,

                PRIMARY KEY (`id`)
            );
        "#},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    #[test]
    fn sqlite_ledger_table_renders_exactly() {
        expect![[r#"
            CREATE TABLE IF NOT EXISTS "_prisma_migrations" (
                "id"                    VARCHAR(36) NOT NULL,
                "checksum"              VARCHAR(64) NOT NULL,
                "migration_name"        VARCHAR(255) NOT NULL,
                "started_at"            TEXT NOT NULL,
                "finished_at"           TEXT,
                "rolled_back_at"        TEXT,
                "logs"                  TEXT,
                "applied_steps_count"   INTEGER NOT NULL DEFAULT 0,

                CONSTRAINT "_prisma_migrations_pkey" PRIMARY KEY ("id")
            );
        "#]]
        .assert_eq(&create_migrations_table_sql(Provider::Sqlite));
    }

    #[test]
    fn postgres_uses_timestamptz() {
        assert!(create_migrations_table_sql(Provider::Postgres).contains("TIMESTAMPTZ"));
    }

    #[test]
    fn mysql_uses_datetime_with_millisecond_precision() {
        assert!(create_migrations_table_sql(Provider::Mysql).contains("DATETIME(3)"));
    }

    #[test]
    fn sqlite_uses_text_timestamps() {
        let sql = create_migrations_table_sql(Provider::Sqlite);
        assert!(sql.contains("\"started_at\"            TEXT NOT NULL"));
    }
}
