pub mod backend;
pub use backend::{ExecResult, Executor, Memory, SqlBackend};

pub mod db;
pub use db::{Builder, Db, Transaction};

mod engine;

mod model;
pub use model::Model;

pub mod query;
pub use query::Query;

pub mod relation;
pub use relation::{ManyToMany, RelatedKey};

pub use relorm_core::{
    async_trait, bail, driver, err,
    schema::{self, Field, HookStage, ModelDef},
    stmt::{self, Type, Value},
    Error, Record, Related, Result,
};

pub use relorm_sql as sql;
