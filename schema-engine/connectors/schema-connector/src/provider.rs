use crate::error::ConnectorError;

/// The dialect a datasource URL resolves to (spec §6.3). Determined purely
/// from the URL scheme; the core never needs to open a connection to know
/// which dialect it is rendering SQL for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Postgres,
    Mysql,
    Sqlite,
}

impl Provider {
    /// `postgres://` / `postgresql://` → PostgreSQL; `mysql://` → MySQL;
    /// `sqlite://` or `file:` → SQLite. Uses `url::Url` for scheme
    /// extraction rather than a manual split so datasource URLs with
    /// embedded credentials or query strings parse the same way a real
    /// driver would see them.
    pub fn from_url(url: &str) -> Result<Self, ConnectorError> {
        let scheme = url::Url::parse(url)
            .map(|parsed| parsed.scheme().to_owned())
            .unwrap_or_else(|_| url.split_once(':').map(|(scheme, _)| scheme).unwrap_or(url).to_owned());

        match scheme.as_str() {
            "postgres" | "postgresql" => Ok(Provider::Postgres),
            "mysql" => Ok(Provider::Mysql),
            "sqlite" | "file" => Ok(Provider::Sqlite),
            other => Err(ConnectorError::Configuration(format!(
                "Unknown datasource provider scheme `{other}` in URL `{url}`"
            ))),
        }
    }

    pub fn as_psl_name(self) -> &'static str {
        match self {
            Provider::Postgres => "postgresql",
            Provider::Mysql => "mysql",
            Provider::Sqlite => "sqlite",
        }
    }

    /// Dialect-appropriate bound-parameter placeholder style (spec §6.3).
    pub fn placeholder(self, position: usize) -> String {
        match self {
            Provider::Postgres => format!("${position}"),
            Provider::Mysql | Provider::Sqlite => "?".to_owned(),
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_psl_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn recognizes_every_supported_scheme() {
        assert_eq!(Provider::from_url("postgres://localhost/db").unwrap(), Provider::Postgres);
        assert_eq!(
            Provider::from_url("postgresql://localhost/db").unwrap(),
            Provider::Postgres
        );
        assert_eq!(Provider::from_url("mysql://localhost/db").unwrap(), Provider::Mysql);
        assert_eq!(Provider::from_url("sqlite://dev.db").unwrap(), Provider::Sqlite);
        assert_eq!(Provider::from_url("file:dev.db").unwrap(), Provider::Sqlite);
    }

    #[test]
    fn rejects_unknown_schemes() {
        assert!(Provider::from_url("mongodb://localhost/db").is_err());
    }

    #[test]
    fn placeholders_are_dialect_specific() {
        assert_eq!(Provider::Postgres.placeholder(3), "$3");
        assert_eq!(Provider::Mysql.placeholder(3), "?");
        assert_eq!(Provider::Sqlite.placeholder(3), "?");
    }
}
