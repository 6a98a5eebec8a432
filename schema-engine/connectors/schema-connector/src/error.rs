use crate::provider::Provider;

/// The error kinds the core surfaces (spec §7). Drift/modified/missing
/// migrations are *not* errors — they travel through the diagnostic
/// decision channel (`schema-core`'s developer diagnostic) as informational
/// results instead.
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    /// A missing or invalid datasource, or an unexpanded environment
    /// reference. Fatal at entry; the message names the missing piece.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Surfaced verbatim from the AST provider. The parser is out of scope
    /// here, so this variant exists to pass its rejection through unwrapped.
    #[error("{0}")]
    ParserRejection(String),

    /// A driver error encountered while executing a migration statement.
    /// Carries enough context to point at the offending statement without
    /// leaking the full driver error chain.
    #[error("Error executing migration `{migration_name}`: {statement_excerpt}")]
    MigrationApplicationFailed {
        migration_name: String,
        statement_excerpt: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A driver error outside the context of applying a specific migration
    /// (e.g. during introspection or a ledger read).
    #[error("Database operation failed: {0}")]
    Driver(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// `migration_lock.toml` already exists and names a different provider
    /// than the one the core was invoked with.
    #[error("The migrations lockfile expects provider `{expected}`, but `{found}` was configured")]
    LockfileProviderMismatch { expected: String, found: String },

    /// MySQL/SQLite introspection is not implemented by this core; only
    /// PostgreSQL introspection is authoritative (spec §6.5).
    #[error("Introspection for `{0}` is not yet implemented")]
    UnsupportedIntrospection(Provider),

    /// A generic, already-safe-to-display message.
    #[error("{0}")]
    Generic(String),
}

impl ConnectorError {
    pub fn from_msg(message: impl Into<String>) -> Self {
        ConnectorError::Generic(message.into())
    }

    pub fn migration_application_failed(
        migration_name: impl Into<String>,
        statement_excerpt: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ConnectorError::MigrationApplicationFailed {
            migration_name: migration_name.into(),
            statement_excerpt: statement_excerpt.into(),
            source: Box::new(source),
        }
    }

    /// Collapses any message that could reveal SQL state, table/column
    /// names, or constraint details to a single generic string — the
    /// hardened/production-mode sanitizer (spec §7, last paragraph).
    pub fn sanitize_for_production(&self) -> String {
        match self {
            ConnectorError::Configuration(_) | ConnectorError::LockfileProviderMismatch { .. } => {
                "database operation failed".to_owned()
            }
            ConnectorError::ParserRejection(_) => "database operation failed".to_owned(),
            ConnectorError::MigrationApplicationFailed { .. } | ConnectorError::Driver(_) => {
                "database operation failed".to_owned()
            }
            ConnectorError::UnsupportedIntrospection(_) => "database operation failed".to_owned(),
            ConnectorError::Generic(_) => "database operation failed".to_owned(),
        }
    }
}

pub type ConnectorResult<T> = Result<T, ConnectorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizer_always_collapses_to_the_generic_message() {
        let err = ConnectorError::MigrationApplicationFailed {
            migration_name: "20240101000000_init".into(),
            statement_excerpt: "ALTER TABLE secrets ADD COLUMN api_key TEXT".into(),
            source: Box::new(std::io::Error::other("constraint violation on secrets.api_key")),
        };

        assert_eq!(err.sanitize_for_production(), "database operation failed");
    }
}
