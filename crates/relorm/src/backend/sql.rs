use crate::Result;

use relorm_core::{
    async_trait,
    driver::{Backend, Capability, Response, Row},
    stmt::{Statement, Value},
    Error,
};
use relorm_sql::{Dialect, Translated};

use log::debug;
use std::{fmt::Debug, sync::Arc};

/// A connection to a SQL engine.
///
/// Receives rendered statement text and positional arguments.
#[async_trait]
pub trait Executor: Debug + Send + Sync + 'static {
    /// Runs a statement that returns no rows.
    async fn execute(&self, sql: &str, args: &[Value]) -> Result<ExecResult>;

    /// Runs a statement returning rows, keyed by column name.
    async fn query(&self, sql: &str, args: &[Value]) -> Result<Vec<Row>>;

    /// Starts a transaction, returning an executor bound to it.
    async fn begin(&self) -> Result<Arc<dyn Executor>> {
        Err(Error::unsupported_construct("transactions"))
    }

    async fn commit(&self) -> Result<()> {
        Err(Error::unsupported_construct("commit outside a transaction"))
    }

    async fn rollback(&self) -> Result<()> {
        Err(Error::unsupported_construct("rollback outside a transaction"))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    pub affected: u64,
    pub last_insert_id: Option<i64>,
}

impl ExecResult {
    pub fn affected(affected: u64) -> ExecResult {
        ExecResult {
            affected,
            last_insert_id: None,
        }
    }

    pub fn inserted(last_insert_id: i64) -> ExecResult {
        ExecResult {
            affected: 1,
            last_insert_id: Some(last_insert_id),
        }
    }
}

/// A backend speaking SQL through a dialect and an executor.
#[derive(Debug, Clone)]
pub struct SqlBackend {
    dialect: Arc<dyn Dialect>,
    executor: Arc<dyn Executor>,
}

impl SqlBackend {
    pub fn new(dialect: impl Dialect + 'static, executor: impl Executor) -> SqlBackend {
        SqlBackend {
            dialect: Arc::new(dialect),
            executor: Arc::new(executor),
        }
    }

    pub fn dialect(&self) -> &dyn Dialect {
        &*self.dialect
    }

    pub fn executor(&self) -> &Arc<dyn Executor> {
        &self.executor
    }
}

#[async_trait]
impl Backend for SqlBackend {
    fn capability(&self) -> &Capability {
        self.dialect.capability()
    }

    async fn exec(&self, stmt: Statement) -> Result<Response> {
        let (generated_key, returning) = match &stmt {
            Statement::Insert(insert) => (
                insert.generated_key.clone(),
                self.capability().returning && insert.generated_key.is_some(),
            ),
            _ => (None, false),
        };

        let Translated { sql, args } = relorm_sql::translate(&*self.dialect, &stmt)?;
        debug!("{}: {sql}; args={}", self.dialect.name(), args.len());

        if stmt.is_select() {
            let rows = self.executor.query(&sql, &args).await?;
            return Ok(Response::rows(rows));
        }

        if returning {
            let rows = self.executor.query(&sql, &args).await?;
            let key = rows.first().and_then(|row| {
                generated_key
                    .as_deref()
                    .and_then(|column| row.get(column))
                    .or_else(|| row.first())
                    .cloned()
            });
            return Ok(Response::count(rows.len() as u64).with_generated_key(key));
        }

        let result = self.executor.execute(&sql, &args).await?;
        let key = match generated_key {
            Some(_) => result.last_insert_id.map(Value::from),
            None => None,
        };

        Ok(Response::count(result.affected).with_generated_key(key))
    }

    async fn begin(&self) -> Result<Arc<dyn Backend>> {
        let executor = self.executor.begin().await?;
        debug!("{}: BEGIN", self.dialect.name());

        Ok(Arc::new(SqlBackend {
            dialect: self.dialect.clone(),
            executor,
        }))
    }

    async fn commit(&self) -> Result<()> {
        debug!("{}: COMMIT", self.dialect.name());
        self.executor.commit().await
    }

    async fn rollback(&self) -> Result<()> {
        debug!("{}: ROLLBACK", self.dialect.name());
        self.executor.rollback().await
    }
}
