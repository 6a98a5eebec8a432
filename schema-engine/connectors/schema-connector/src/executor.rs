use crate::error::ConnectorResult;

/// A bound parameter value. Intentionally minimal — the core only ever
/// binds the handful of scalar types that appear in ledger bookkeeping
/// queries (ids, checksums, timestamps, counters); it never needs the full
/// value domain a query engine would.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Null,
    Int(i64),
    Text(String),
    Bool(bool),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl<T> From<Option<T>> for ParamValue
where
    T: Into<ParamValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ParamValue::Null)
    }
}

/// One result row, as a positional list of values. Callers index by column
/// position because the engine always knows its own `SELECT` list order.
#[derive(Debug, Clone, Default)]
pub struct Row {
    values: Vec<ParamValue>,
}

impl Row {
    pub fn new(values: Vec<ParamValue>) -> Self {
        Row { values }
    }

    pub fn at(&self, index: usize) -> Option<&ParamValue> {
        self.values.get(index)
    }

    pub fn text_at(&self, index: usize) -> Option<&str> {
        match self.at(index) {
            Some(ParamValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn int_at(&self, index: usize) -> Option<i64> {
        match self.at(index) {
            Some(ParamValue::Int(i)) => Some(*i),
            _ => None,
        }
    }
}

/// The minimal statement-executor abstraction the core consumes (spec
/// §6.3). The database driver itself is an external collaborator; this
/// trait is the entire contract the core requires of it.
#[async_trait::async_trait]
pub trait Executor: Send + Sync {
    /// Execute a non-returning statement with bound parameters.
    async fn execute(&self, sql: &str, params: &[ParamValue]) -> ConnectorResult<u64>;

    /// Execute a statement that returns rows.
    async fn query(&self, sql: &str, params: &[ParamValue]) -> ConnectorResult<Vec<Row>>;

    /// Execute a statement with no parameters and no expectation of rows —
    /// used for raw, already-interpolated DDL such as a migration's SQL
    /// text or `CREATE EXTENSION`.
    async fn raw_cmd(&self, sql: &str) -> ConnectorResult<()> {
        self.execute(sql, &[]).await.map(|_| ())
    }

    /// Liveness check.
    async fn ping(&self) -> ConnectorResult<()>;

    /// The underlying driver's name, for diagnostics (e.g. `"postgresql"`).
    fn driver_name(&self) -> &str;
}

/// A transaction scope: the same capabilities as [`Executor`], plus commit
/// and rollback. Dropping a `Transaction` without calling either is
/// equivalent to rollback, matching ordinary SQL driver semantics.
#[async_trait::async_trait]
pub trait Transaction: Executor {
    async fn commit(self: Box<Self>) -> ConnectorResult<()>;
    async fn rollback(self: Box<Self>) -> ConnectorResult<()>;
}

/// A connection capable of opening transactions, the entry point callers
/// hand the core.
#[async_trait::async_trait]
pub trait Connection: Executor {
    async fn begin_transaction(&self) -> ConnectorResult<Box<dyn Transaction>>;
}
