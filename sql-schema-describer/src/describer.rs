use schema_connector::{ConnectorResult, Executor, Provider};

use crate::schema::DatabaseSchema;

/// Given a connection and a provider, returns a [`DatabaseSchema`] (spec
/// §6.5). No concrete per-database introspection query set lives in this
/// core — that is an external collaborator's job. Implementations that
/// don't yet support a given provider should return
/// `ConnectorError::UnsupportedIntrospection` (spec §7) rather than
/// guessing at a schema shape the engine has not validated.
#[async_trait::async_trait]
pub trait SchemaDescriber: Send + Sync {
    async fn describe(&self, executor: &dyn Executor, provider: Provider) -> ConnectorResult<DatabaseSchema>;
}
