use crate::Result;

use relorm_core::{
    async_trait,
    driver::{Backend, Capability, Response, Row},
    stmt::{
        Constraint, CreateCollection, CreateIndex, Direction, Expr, ExprColumn, FieldDef, Input,
        Insert, Select, Statement, Type, Update, Value,
    },
    Error,
};

use indexmap::IndexMap;
use std::{
    cmp::Ordering,
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

static NULL: Value = Value::Null;

/// An in-process backend.
///
/// Keeps one keyed collection per backend name and evaluates statements
/// directly. Keys are allocated from a per-collection counter under the same
/// lock that guards the store.
#[derive(Debug, Clone, Default)]
pub struct Memory {
    store: Arc<Mutex<Store>>,

    /// Working copy of the store, for handles bound to a transaction. `None`
    /// once the transaction has finished.
    tx: Option<Arc<Mutex<Option<Store>>>>,
}

#[derive(Debug, Clone, Default)]
struct Store {
    collections: IndexMap<String, Collection>,
}

#[derive(Debug, Clone)]
struct Collection {
    schema: CreateCollection,
    indices: Vec<CreateIndex>,
    rows: BTreeMap<Value, Row>,

    /// Last allocated key
    last_key: i64,
}

impl Memory {
    pub fn new() -> Memory {
        Memory::default()
    }

    /// Number of records stored in `collection`.
    pub fn len(&self, collection: &str) -> usize {
        lock(&self.store)
            .collections
            .get(collection)
            .map_or(0, |collection| collection.rows.len())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl Backend for Memory {
    fn capability(&self) -> &Capability {
        &Capability::MEMORY
    }

    async fn exec(&self, stmt: Statement) -> Result<Response> {
        stmt.validate()?;

        match &self.tx {
            None => lock(&self.store).exec(stmt),
            Some(tx) => match lock(tx).as_mut() {
                Some(store) => store.exec(stmt),
                None => Err(Error::transaction_closed()),
            },
        }
    }

    async fn begin(&self) -> Result<Arc<dyn Backend>> {
        if self.tx.is_some() {
            return Err(Error::unsupported_construct("nested transactions"));
        }

        let snapshot = lock(&self.store).clone();

        Ok(Arc::new(Memory {
            store: self.store.clone(),
            tx: Some(Arc::new(Mutex::new(Some(snapshot)))),
        }))
    }

    async fn commit(&self) -> Result<()> {
        let store = self.finish()?;
        *lock(&self.store) = store;
        Ok(())
    }

    async fn rollback(&self) -> Result<()> {
        self.finish()?;
        Ok(())
    }
}

impl Memory {
    fn finish(&self) -> Result<Store> {
        let Some(tx) = &self.tx else {
            return Err(Error::unsupported_construct("commit outside a transaction"));
        };

        lock(tx).take().ok_or_else(Error::transaction_closed)
    }
}

impl Store {
    fn exec(&mut self, stmt: Statement) -> Result<Response> {
        match stmt {
            Statement::CreateCollection(stmt) => {
                if self.collections.contains_key(&stmt.name) {
                    if stmt.if_not_exists {
                        return Ok(Response::count(0));
                    }
                    return Err(Error::duplicate_collection(&stmt.name));
                }

                self.collections.insert(
                    stmt.name.clone(),
                    Collection {
                        schema: stmt,
                        indices: vec![],
                        rows: BTreeMap::new(),
                        last_key: 0,
                    },
                );
                Ok(Response::count(0))
            }
            Statement::DropCollection(stmt) => {
                if self.collections.shift_remove(&stmt.name).is_none() && !stmt.if_exists {
                    return Err(Error::unknown_collection(&stmt.name));
                }
                Ok(Response::count(0))
            }
            Statement::RenameCollection(stmt) => {
                if self.collections.contains_key(&stmt.to) {
                    return Err(Error::duplicate_collection(&stmt.to));
                }

                let mut collection = self
                    .collections
                    .shift_remove(&stmt.from)
                    .ok_or_else(|| Error::unknown_collection(&stmt.from))?;
                collection.schema.name = stmt.to.clone();
                self.collections.insert(stmt.to, collection);
                Ok(Response::count(0))
            }
            Statement::CreateField(stmt) => {
                let collection = self.collection_mut(&stmt.collection)?;
                let default = default_value(&stmt.field);

                for row in collection.rows.values_mut() {
                    row.insert(&stmt.field.name, default.clone());
                }
                collection.schema.fields.push(stmt.field);
                Ok(Response::count(0))
            }
            Statement::DropField(stmt) => {
                let collection = self.collection_mut(&stmt.collection)?;
                collection.field(&stmt.name)?;

                collection.schema.fields.retain(|field| field.name != stmt.name);
                for row in collection.rows.values_mut() {
                    row.remove(&stmt.name);
                }
                Ok(Response::count(0))
            }
            Statement::RenameField(stmt) => {
                let collection = self.collection_mut(&stmt.collection)?;
                collection.field(&stmt.from)?;

                for field in &mut collection.schema.fields {
                    if field.name == stmt.from {
                        field.name = stmt.to.clone();
                    }
                }
                for row in collection.rows.values_mut() {
                    let value = row.remove(&stmt.from).unwrap_or_default();
                    row.insert(&stmt.to, value);
                }
                Ok(Response::count(0))
            }
            Statement::CreateIndex(stmt) => {
                let collection = self.collection_mut(&stmt.collection)?;
                if !collection.indices.iter().any(|index| index.name == stmt.name) {
                    collection.indices.push(stmt);
                }
                Ok(Response::count(0))
            }
            Statement::DropIndex(stmt) => {
                let collection = self.collection_mut(&stmt.collection)?;
                collection.indices.retain(|index| index.name != stmt.name);
                Ok(Response::count(0))
            }
            Statement::Select(stmt) => Ok(Response::rows(self.select(&stmt)?)),
            Statement::Insert(stmt) => self.insert(stmt),
            Statement::Update(stmt) => self.update(stmt),
            Statement::Delete(stmt) => {
                let keys = self.matching(&stmt.collection, stmt.filter.as_ref())?;
                let collection = self.collection_mut(&stmt.collection)?;

                for key in &keys {
                    collection.rows.remove(key);
                }
                Ok(Response::count(keys.len() as u64))
            }
        }
    }

    fn collection(&self, name: &str) -> Result<&Collection> {
        self.collections
            .get(name)
            .ok_or_else(|| Error::unknown_collection(name))
    }

    fn collection_mut(&mut self, name: &str) -> Result<&mut Collection> {
        self.collections
            .get_mut(name)
            .ok_or_else(|| Error::unknown_collection(name))
    }

    fn select(&self, select: &Select) -> Result<Vec<Row>> {
        if !select.joins.is_empty() {
            return Err(Error::unsupported_construct("joins on the in-memory backend"));
        }

        let collection = self.collection(&select.collection)?;

        let mut rows = vec![];
        for row in collection.rows.values() {
            if self.matches(collection, row, select.filter.as_ref())? {
                rows.push(row);
            }
        }

        if select.is_count() {
            return Ok(vec![Row::new().with("count", rows.len() as i64)]);
        }

        for order_by in &select.order_by {
            collection.field(&order_by.column.name)?;
        }

        rows.sort_by(|a, b| {
            select
                .order_by
                .iter()
                .map(|order_by| {
                    let column = order_by.column.name.as_str();
                    let ordering = a.get(column).unwrap_or(&NULL).cmp(b.get(column).unwrap_or(&NULL));
                    match order_by.direction {
                        Direction::Asc => ordering,
                        Direction::Desc => ordering.reverse(),
                    }
                })
                .find(|ordering| *ordering != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });

        let offset = select.offset.unwrap_or(0) as usize;
        let limit = select.limit.map_or(usize::MAX, |limit| limit as usize);

        rows.into_iter()
            .skip(offset)
            .take(limit)
            .map(|row| project(collection, row, &select.fields))
            .collect()
    }

    fn matches(&self, collection: &Collection, row: &Row, filter: Option<&Expr>) -> Result<bool> {
        match filter {
            Some(filter) => filter.eval_bool(&mut RowInput {
                store: self,
                collection,
                row,
            }),
            None => Ok(true),
        }
    }

    /// Keys of the rows in `collection` matching `filter`.
    fn matching(&self, collection: &str, filter: Option<&Expr>) -> Result<Vec<Value>> {
        let collection = self.collection(collection)?;

        let mut keys = vec![];
        for (key, row) in &collection.rows {
            if self.matches(collection, row, filter)? {
                keys.push(key.clone());
            }
        }
        Ok(keys)
    }

    fn insert(&mut self, stmt: Insert) -> Result<Response> {
        let collection = self.collection_mut(&stmt.collection)?;

        let mut row = Row::new();
        for field in &collection.schema.fields {
            row.insert(&field.name, default_value(field));
        }

        for (column, expr) in stmt.entries() {
            collection.field(column)?;
            row.insert(column, literal(expr)?);
        }

        let key = match collection.schema.primary_key() {
            Some(pk) => {
                let (column, ty) = (pk.name.clone(), pk.ty);
                let key = row.get(&column).cloned().unwrap_or_default();

                let key = if key.is_zero() {
                    let key = collection.allocate(ty)?;
                    row.insert(column, key.clone());
                    key
                } else {
                    if let Some(n) = key.as_i64() {
                        collection.last_key = collection.last_key.max(n);
                    }
                    key
                };

                if collection.rows.contains_key(&key) {
                    return Err(Error::primary_key_exists(format!(
                        "collection={} key={key}",
                        collection.schema.name
                    )));
                }
                key
            }
            None => collection.allocate(Type::I64)?,
        };

        collection.check_unique(&row, None)?;
        collection.rows.insert(key.clone(), row);

        Ok(Response::count(1).with_generated_key(Some(key)))
    }

    fn update(&mut self, stmt: Update) -> Result<Response> {
        let keys = self.matching(&stmt.collection, stmt.filter.as_ref())?;
        let collection = self.collection_mut(&stmt.collection)?;

        let mut updated = Vec::with_capacity(keys.len());
        for key in &keys {
            let Some(row) = collection.rows.get(key) else {
                continue;
            };

            let mut row = row.clone();
            for assignment in &stmt.assignments {
                collection.field(&assignment.column)?;
                row.insert(&assignment.column, literal(&assignment.value)?);
            }

            collection.check_unique(&row, Some(key))?;
            updated.push((key, row));
        }

        let pk = collection.schema.primary_key().map(|pk| pk.name.clone());

        for (key, row) in updated {
            let new_key = match &pk {
                Some(pk) => row.get(pk).cloned().unwrap_or_default(),
                None => key.clone(),
            };

            if new_key != *key {
                if collection.rows.contains_key(&new_key) {
                    return Err(Error::primary_key_exists(format!(
                        "collection={} key={new_key}",
                        collection.schema.name
                    )));
                }
                collection.rows.remove(key);
            }
            collection.rows.insert(new_key, row);
        }

        Ok(Response::count(keys.len() as u64))
    }
}

impl Collection {
    fn field(&self, name: &str) -> Result<&FieldDef> {
        self.schema
            .fields
            .iter()
            .find(|field| field.name == name)
            .ok_or_else(|| Error::unknown_field(&self.schema.name, name))
    }

    fn allocate(&mut self, ty: Type) -> Result<Value> {
        self.last_key += 1;
        Value::I64(self.last_key).cast(ty)
    }

    /// Checks unique fields and unique indices against every other row.
    /// Rows with a null in the checked columns never conflict.
    fn check_unique(&self, row: &Row, skip: Option<&Value>) -> Result<()> {
        let fields = self
            .schema
            .fields
            .iter()
            .filter(|field| field.is_unique() && !field.is_primary_key())
            .map(|field| vec![field.name.as_str()]);

        let indices = self
            .indices
            .iter()
            .filter(|index| index.unique)
            .map(|index| index.columns.iter().map(String::as_str).collect::<Vec<_>>());

        for columns in fields.chain(indices) {
            let values: Vec<&Value> = columns
                .iter()
                .map(|column| row.get(column).unwrap_or(&NULL))
                .collect();

            if values.iter().any(|value| value.is_null()) {
                continue;
            }

            let conflict = self
                .rows
                .iter()
                .filter(|(key, _)| Some(*key) != skip)
                .any(|(_, other)| {
                    columns
                        .iter()
                        .zip(&values)
                        .all(|(column, value)| other.get(column) == Some(*value))
                });

            if conflict {
                return Err(Error::unique_violation(&self.schema.name, &columns));
            }
        }

        Ok(())
    }
}

fn default_value(field: &FieldDef) -> Value {
    field
        .constraints
        .iter()
        .find_map(|constraint| match constraint {
            Constraint::Default(Expr::Value(value)) => Some(value.clone()),
            _ => None,
        })
        .unwrap_or_default()
}

fn literal(expr: &Expr) -> Result<Value> {
    match expr {
        Expr::Value(value) => Ok(value.clone()),
        _ => Err(Error::unsupported_construct(
            "non-literal value on the in-memory backend",
        )),
    }
}

/// The selected columns of `row`; every column when none are selected.
fn project(collection: &Collection, row: &Row, fields: &[Expr]) -> Result<Row> {
    if fields.is_empty() {
        return Ok(row.clone());
    }

    let mut projected = Row::new();
    for field in fields {
        let Some(column) = field.as_column() else {
            return Err(Error::unsupported_construct(
                "computed field on the in-memory backend",
            ));
        };
        collection.field(&column.name)?;
        projected.insert(&column.name, row.get(&column.name).cloned().unwrap_or_default());
    }
    Ok(projected)
}

struct RowInput<'a> {
    store: &'a Store,
    collection: &'a Collection,
    row: &'a Row,
}

impl Input for RowInput<'_> {
    fn column(&mut self, column: &ExprColumn) -> Result<Value> {
        self.collection.field(&column.name)?;
        Ok(self.row.get(&column.name).cloned().unwrap_or_default())
    }

    fn subquery(&mut self, select: &Select) -> Result<Vec<Value>> {
        Ok(self
            .store
            .select(select)?
            .iter()
            .map(|row| row.first().cloned().unwrap_or_default())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relorm_core::stmt::{Delete, OrderBy};
    use std_util::prelude::*;

    fn todo_collection() -> Statement {
        CreateCollection::new(
            "todo",
            vec![
                FieldDef::new("id", Type::I64)
                    .constraint(Constraint::PrimaryKey)
                    .constraint(Constraint::AutoIncrement),
                FieldDef::new("title", Type::String).constraint(Constraint::Unique),
                FieldDef::new("done", Type::Bool).constraint(Constraint::default_value(false)),
            ],
        )
        .into()
    }

    async fn store() -> Memory {
        let memory = Memory::new();
        assert_ok!(memory.exec(todo_collection()).await);
        memory
    }

    async fn insert(memory: &Memory, title: &str) -> Value {
        let stmt = Insert::new("todo").value("title", Value::from(title));
        let response = assert_ok!(memory.exec(stmt.into()).await);
        assert_some!(response.generated_key)
    }

    #[tokio::test]
    async fn keys_are_sequential() {
        let memory = store().await;

        assert_eq!(insert(&memory, "a").await, Value::from(1));
        assert_eq!(insert(&memory, "b").await, Value::from(2));

        // Explicit keys advance the counter
        let stmt = Insert::new("todo")
            .value("id", Value::from(10))
            .value("title", Value::from("c"));
        assert_ok!(memory.exec(stmt.into()).await);
        assert_eq!(insert(&memory, "d").await, Value::from(11));
    }

    #[tokio::test]
    async fn duplicate_keys_and_unique_values_fail() {
        let memory = store().await;
        insert(&memory, "a").await;

        let stmt = Insert::new("todo")
            .value("id", Value::from(1))
            .value("title", Value::from("b"));
        let err = assert_err!(memory.exec(stmt.into()).await);
        assert!(err.is_primary_key_exists());

        let stmt = Insert::new("todo").value("title", Value::from("a"));
        let err = assert_err!(memory.exec(stmt.into()).await);
        assert!(err.is_unique_violation());
        assert_eq!(memory.len("todo"), 1);
    }

    #[tokio::test]
    async fn defaults_fill_missing_columns() {
        let memory = store().await;
        insert(&memory, "a").await;

        let rows = assert_ok!(memory.exec(Select::new("todo").into()).await).into_rows();
        assert_eq!(rows[0].get("done"), Some(&Value::Bool(false)));
    }

    #[tokio::test]
    async fn select_filters_sorts_and_pages() {
        let memory = store().await;
        for title in ["c", "a", "b", "d"] {
            insert(&memory, title).await;
        }

        let select = Select::new("todo")
            .filter(Expr::filter("title", relorm_core::stmt::BinaryOp::Ne, Value::from("d")))
            .order_by(OrderBy::desc("title"))
            .offset(1)
            .limit(1);
        let rows = assert_ok!(memory.exec(select.into()).await).into_rows();
        assert_eq!(rows.only().get("title"), Some(&Value::from("b")));

        let count = Select::new("todo").field(Expr::count_star());
        let rows = assert_ok!(memory.exec(count.into()).await).into_rows();
        assert_eq!(rows.only().first(), Some(&Value::from(4)));
    }

    #[tokio::test]
    async fn subquery_filters() {
        let memory = store().await;
        for title in ["a", "b", "c"] {
            insert(&memory, title).await;
        }

        let ids = Select::new("todo")
            .field(Expr::column("id"))
            .filter(Expr::in_list("title", vec![Value::from("a"), Value::from("c")]));
        let stmt = Delete::new("todo").filter(Expr::in_subquery("id", ids));

        let response = assert_ok!(memory.exec(stmt.into()).await);
        assert_eq!(response.affected(), 2);
        assert_eq!(memory.len("todo"), 1);
    }

    #[tokio::test]
    async fn unknown_columns_fail() {
        let memory = store().await;

        let stmt = Insert::new("todo").value("owner", Value::from(1));
        let err = assert_err!(memory.exec(stmt.into()).await);
        assert!(err.is_unknown_field());

        let err = assert_err!(memory.exec(Select::new("missing").into()).await);
        assert!(err.is_unknown_collection());
    }

    #[tokio::test]
    async fn transaction_snapshot() {
        let memory = store().await;
        insert(&memory, "a").await;

        let tx = assert_ok!(memory.begin().await);
        assert_ok!(tx.exec(Insert::new("todo").value("title", Value::from("b")).into()).await);
        assert_eq!(memory.len("todo"), 1);

        assert_ok!(tx.rollback().await);
        assert_eq!(memory.len("todo"), 1);

        let err = assert_err!(tx.exec(Select::new("todo").into()).await);
        assert!(err.is_transaction_closed());

        let tx = assert_ok!(memory.begin().await);
        assert_ok!(tx.exec(Insert::new("todo").value("title", Value::from("c")).into()).await);
        assert_ok!(tx.commit().await);
        assert_eq!(memory.len("todo"), 2);

        let err = assert_err!(tx.commit().await);
        assert!(err.is_transaction_closed());
    }
}
