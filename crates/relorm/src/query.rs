pub(crate) mod join;
pub(crate) use join::JoinNode;

mod normalize;
pub(crate) use normalize::Plan;

use crate::{engine, Db, Model, Record, Result};

use relorm_core::{
    stmt::{BinaryOp, Expr, JoinKind, Value},
    Error,
};

/// A query against one collection.
///
/// Conditions accumulate into a conjunction. Field names may be logical
/// names or backend column names; a dotted name (`"Project.Name"`) addresses
/// a field of a joined relation. Errors found while building are kept and
/// reported by the terminal operation.
#[derive(Debug)]
pub struct Query {
    db: Db,
    collection: String,
    filters: Vec<Filter>,
    sort: Vec<String>,
    limit: Option<u64>,
    offset: Option<u64>,
    joins: Vec<JoinRequest>,
    fields: Vec<String>,

    /// First error raised by a builder method
    error: Option<Error>,
}

#[derive(Debug, Clone)]
enum Filter {
    Field {
        path: String,
        op: BinaryOp,
        value: Value,
    },
    Expr(Expr),
}

#[derive(Debug, Clone)]
pub(crate) struct JoinRequest {
    pub(crate) path: String,
    pub(crate) kind: JoinKind,
}

impl Query {
    pub(crate) fn new(db: Db, collection: impl Into<String>) -> Query {
        Query {
            db,
            collection: collection.into(),
            filters: vec![],
            sort: vec![],
            limit: None,
            offset: None,
            joins: vec![],
            fields: vec![],
            error: None,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Matches records whose `field` equals `value`. A null value matches
    /// records where the field is null.
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Field {
            path: field.into(),
            op: BinaryOp::Eq,
            value: value.into(),
        });
        self
    }

    /// Matches records where `field <op> value`, with `op` one of `=`, `!=`,
    /// `<>`, `>`, `>=`, `<`, `<=`, `like`, `not like`, `in` and `not in`.
    pub fn filter_op(
        mut self,
        field: impl Into<String>,
        op: &str,
        value: impl Into<Value>,
    ) -> Self {
        match op.parse::<BinaryOp>() {
            Ok(op) => self.filters.push(Filter::Field {
                path: field.into(),
                op,
                value: value.into(),
            }),
            Err(reason) => self.fail(Error::invalid_expression("filter", reason)),
        }
        self
    }

    /// Adds an arbitrary condition. Column references in it are resolved
    /// like field names.
    pub fn filter_expr(mut self, expr: impl Into<Expr>) -> Self {
        self.filters.push(Filter::Expr(expr.into()));
        self
    }

    /// Sorts by `field`, descending when prefixed with `-`.
    pub fn sort(mut self, field: impl Into<String>) -> Self {
        self.sort.push(field.into());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Loads the relation at `path` (e.g. `"Todos.Tags"`) into every
    /// returned record.
    pub fn join(self, path: impl Into<String>) -> Self {
        self.join_kind(path, JoinKind::Left)
    }

    /// Like [`Query::join`], but only returns records that have at least one
    /// related record at `path`.
    pub fn join_inner(self, path: impl Into<String>) -> Self {
        self.join_kind(path, JoinKind::Inner)
    }

    pub fn join_kind(mut self, path: impl Into<String>, kind: JoinKind) -> Self {
        self.joins.push(JoinRequest {
            path: path.into(),
            kind,
        });
        self
    }

    /// Loads only `fields` (and the primary key).
    pub fn select<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    fn fail(&mut self, err: Error) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    pub async fn all(self) -> Result<Vec<Record>> {
        let plan = self.plan()?;
        engine::find(&self.db, plan).await
    }

    pub async fn first(mut self) -> Result<Option<Record>> {
        self.limit = Some(1);
        Ok(self.all().await?.into_iter().next())
    }

    pub async fn count(self) -> Result<u64> {
        let plan = self.plan()?;
        engine::count(&self.db, plan).await
    }

    /// Deletes every matched record, returning how many were removed.
    pub async fn delete(self) -> Result<u64> {
        let plan = self.plan()?;
        engine::delete_matching(&self.db, plan).await
    }

    pub async fn all_as<M: Model>(self) -> Result<Vec<M>> {
        self.all().await?.into_iter().map(M::load).collect()
    }

    pub async fn first_as<M: Model>(self) -> Result<Option<M>> {
        self.first().await?.map(M::load).transpose()
    }
}
