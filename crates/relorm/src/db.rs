mod builder;
pub use builder::Builder;

mod transaction;
pub use transaction::Transaction;

use crate::{engine, model, ManyToMany, Model, Query, Record, Result};

use relorm_core::{
    driver::{Backend, Capability, Response},
    schema::{ModelDef, ModelDescriptor, Registry},
    stmt::{Statement, Value},
    Error,
};

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, PoisonError, RwLock, RwLockReadGuard,
};

/// Shared state between all `Db` clones.
pub(crate) struct Shared {
    registry: RwLock<Registry>,
}

/// A handle to a registry of models and the backend they are stored in.
///
/// Cloning is cheap; clones share the registry and backend. A `Db` obtained
/// from a [`Transaction`] is bound to that transaction's backend handle.
#[derive(Clone)]
pub struct Db {
    shared: Arc<Shared>,
    backend: Arc<dyn Backend>,

    /// Set when the transaction this handle belongs to has finished
    closed: Option<Arc<AtomicBool>>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub(crate) fn new(registry: Registry, backend: Arc<dyn Backend>) -> Db {
        Db {
            shared: Arc::new(Shared {
                registry: RwLock::new(registry),
            }),
            backend,
            closed: None,
        }
    }

    fn registry(&self) -> RwLockReadGuard<'_, Registry> {
        self.shared
            .registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a model definition at runtime. The model is unusable until
    /// [`Db::build`] runs again.
    pub fn register(&self, def: ModelDef) -> Result<()> {
        self.shared
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .register(def)
    }

    pub fn register_model<M: Model>(&self) -> Result<()> {
        self.register(model::model_def::<M>())
    }

    /// Resolves relations of every registered model.
    pub fn build(&self) -> Result<()> {
        self.shared
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .build()
    }

    /// The built descriptor for `collection`.
    pub fn model(&self, collection: &str) -> Result<Arc<ModelDescriptor>> {
        self.registry().model(collection)
    }

    pub fn capability(&self) -> &Capability {
        self.backend.capability()
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    /// Creates the collections, indices and join collections of every built
    /// model.
    pub async fn push_schema(&self) -> Result<()> {
        let stmts = self.registry().schema_statements()?;

        for stmt in stmts {
            self.exec(stmt).await?;
        }

        Ok(())
    }

    /// Executes one statement against the backend.
    pub async fn exec(&self, stmt: Statement) -> Result<Response> {
        if self.is_closed() {
            return Err(Error::transaction_closed());
        }

        log::trace!("exec {}", stmt.kind());
        self.backend.exec(stmt).await
    }

    pub fn query(&self, collection: impl Into<String>) -> Query {
        Query::new(self.clone(), collection)
    }

    /// Persists `record` and, where enabled, its related records. Keys
    /// assigned by the backend are written back into the record graph.
    pub async fn create(&self, record: &mut Record) -> Result<()> {
        engine::create(self, record).await
    }

    /// Persists the changed fields of `record`.
    pub async fn update(&self, record: &mut Record) -> Result<()> {
        engine::update(self, record, None).await
    }

    /// Sets `fields` on `record` and persists exactly those fields.
    pub async fn update_by_fields<K, V>(
        &self,
        record: &mut Record,
        fields: impl IntoIterator<Item = (K, V)>,
    ) -> Result<()>
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        let model = self.model(record.collection())?;

        let mut names = vec![];
        for (name, value) in fields {
            let field = model.field(name.as_ref())?;
            record.set(&field.name, value);
            names.push(field.name.clone());
        }

        if names.is_empty() {
            return Err(Error::empty_model_data(&model.name));
        }

        engine::update(self, record, Some(names.as_slice())).await
    }

    pub async fn delete(&self, record: &mut Record) -> Result<()> {
        engine::delete(self, record).await
    }

    /// Deletes every record matched by `query`, returning how many were
    /// removed. Hooks and cascades do not run.
    pub async fn delete_many(&self, query: Query) -> Result<u64> {
        query.delete().await
    }

    /// The record with primary key `id`.
    pub async fn find_one(&self, collection: &str, id: impl Into<Value>) -> Result<Record> {
        let id = id.into();
        let model = self.model(collection)?;

        self.query(collection)
            .filter(&model.primary_key, id.clone())
            .first()
            .await?
            .ok_or_else(|| {
                Error::record_not_found(format!("collection={} key={id}", model.table))
            })
    }

    /// The first record, by primary key, whose `field` equals `value`.
    pub async fn find_by(
        &self,
        collection: &str,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<Record> {
        let value = value.into();
        let model = self.model(collection)?;

        self.query(collection)
            .filter(field, value.clone())
            .first()
            .await?
            .ok_or_else(|| {
                Error::record_not_found(format!(
                    "collection={} {field}={value}",
                    model.table
                ))
            })
    }

    /// The many-to-many collection of `owner` for `relation`.
    pub fn many_to_many(&self, owner: &Record, relation: &str) -> Result<ManyToMany> {
        ManyToMany::new(self, owner, relation)
    }

    /// Creates a typed model, returning it with its assigned keys.
    pub async fn insert<M: Model>(&self, model: &M) -> Result<M> {
        let mut record = model.to_record();
        self.create(&mut record).await?;
        M::load(record)
    }

    /// Persists the fields of a typed model.
    pub async fn save<M: Model>(&self, model: &M) -> Result<()> {
        let mut record = model.to_record();
        self.update(&mut record).await
    }

    pub async fn get<M: Model>(&self, id: impl Into<Value>) -> Result<M> {
        M::load(self.find_one(M::NAME, id).await?)
    }

    /// Starts a transaction on the backend.
    pub async fn transaction(&self) -> Result<Transaction> {
        if self.closed.is_some() {
            return Err(Error::unsupported_construct("nested transactions"));
        }

        let backend = self.backend.begin().await?;
        let closed = Arc::new(AtomicBool::new(false));

        Ok(Transaction::new(Db {
            shared: self.shared.clone(),
            backend,
            closed: Some(closed),
        }))
    }

    fn is_closed(&self) -> bool {
        self.closed
            .as_ref()
            .is_some_and(|closed| closed.load(Ordering::Acquire))
    }

    /// Marks the transaction this handle belongs to as finished. Returns
    /// `false` if it already was.
    pub(crate) fn close(&self) -> bool {
        match &self.closed {
            Some(closed) => !closed.swap(true, Ordering::AcqRel),
            None => false,
        }
    }
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("backend", &self.backend)
            .field("models", &self.registry().len())
            .field("transaction", &self.closed.is_some())
            .finish()
    }
}
