mod capability;
pub use capability::Capability;

mod response;
pub use response::{Response, Rows};

mod row;
pub use row::Row;

use crate::{async_trait, stmt::Statement, Error, Result};

use std::{fmt::Debug, sync::Arc};

/// A storage collaborator.
///
/// The CRUD engine talks to storage only through this trait. Implementations
/// receive statements as AST and either interpret them directly or render
/// them with a dialect.
#[async_trait]
pub trait Backend: Debug + Send + Sync + 'static {
    /// Describes what the backend supports, which informs query
    /// normalization.
    fn capability(&self) -> &Capability;

    /// Executes one statement.
    async fn exec(&self, stmt: Statement) -> Result<Response>;

    /// Starts a transaction, returning a handle bound to it.
    async fn begin(&self) -> Result<Arc<dyn Backend>> {
        Err(Error::unsupported_construct("transactions"))
    }

    /// Commits the transaction this handle is bound to.
    async fn commit(&self) -> Result<()> {
        Err(Error::unsupported_construct("commit outside a transaction"))
    }

    /// Rolls back the transaction this handle is bound to.
    async fn rollback(&self) -> Result<()> {
        Err(Error::unsupported_construct("rollback outside a transaction"))
    }
}
