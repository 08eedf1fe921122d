use crate::{engine, Db, Record, Result};

use relorm_core::{
    driver::Row,
    schema::{JoinTable, ModelDescriptor, RelationDescriptor},
    stmt::{Delete, Expr, Insert, OrderBy, Select, Statement, Type, Value},
    Error,
};

use indexmap::IndexSet;
use log::trace;
use std::sync::Arc;

/// Membership of one owner record in a many-to-many relation.
///
/// Links live in the relation's join collection, one row per
/// `(owner, target)` pair. Reads return members in the order they were
/// added. Every operation is idempotent with respect to membership.
#[derive(Debug)]
pub struct ManyToMany {
    db: Db,
    relation: RelationDescriptor,
    join: JoinTable,
    target: Arc<ModelDescriptor>,
    owner_key: Value,
}

/// Something identifying a record of the relation's target model: the
/// record itself or its primary key.
pub trait RelatedKey {
    fn related_key(&self, target: &ModelDescriptor) -> Result<Value>;
}

impl RelatedKey for Record {
    fn related_key(&self, target: &ModelDescriptor) -> Result<Value> {
        if self.collection() != target.name {
            return Err(Error::unsupported_construct(format!(
                "`{}` record in a collection of `{}`",
                self.collection(),
                target.name
            )));
        }

        if !engine::is_persisted(target, self) {
            return Err(Error::unpersisted_model(&target.name));
        }

        Ok(engine::key(target, self))
    }
}

impl RelatedKey for Value {
    fn related_key(&self, target: &ModelDescriptor) -> Result<Value> {
        if self.is_zero() {
            return Err(Error::unpersisted_model(&target.name));
        }
        self.clone().cast(target.primary_key_field().ty)
    }
}

impl RelatedKey for i64 {
    fn related_key(&self, target: &ModelDescriptor) -> Result<Value> {
        Value::from(*self).related_key(target)
    }
}

impl RelatedKey for str {
    fn related_key(&self, target: &ModelDescriptor) -> Result<Value> {
        Value::from(self).related_key(target)
    }
}

impl RelatedKey for String {
    fn related_key(&self, target: &ModelDescriptor) -> Result<Value> {
        self.as_str().related_key(target)
    }
}

impl<T: RelatedKey + ?Sized> RelatedKey for &T {
    fn related_key(&self, target: &ModelDescriptor) -> Result<Value> {
        (**self).related_key(target)
    }
}

impl ManyToMany {
    pub(crate) fn new(db: &Db, owner: &Record, relation: &str) -> Result<ManyToMany> {
        let model = db.model(owner.collection())?;
        let relation = model.relation(relation)?.clone();

        let Some(join) = relation.join.clone() else {
            return Err(Error::unsupported_construct(format!(
                "`{}.{}` is a {} relation, not many-to-many",
                model.name, relation.name, relation.kind
            )));
        };

        if !engine::is_persisted(&model, owner) {
            return Err(Error::unpersisted_model(&model.name));
        }

        Ok(ManyToMany {
            db: db.clone(),
            target: db.model(&relation.target)?,
            owner_key: engine::key(&model, owner),
            relation,
            join,
        })
    }

    pub fn relation(&self) -> &RelationDescriptor {
        &self.relation
    }

    pub fn owner_key(&self) -> &Value {
        &self.owner_key
    }

    /// Links every given record that is not a member yet.
    pub async fn add<K: RelatedKey>(&self, records: impl IntoIterator<Item = K>) -> Result<()> {
        let keys = self.keys(records)?;
        if keys.is_empty() {
            return Ok(());
        }

        let members = self.ids().await?;

        for key in keys {
            if members.contains(&key) {
                continue;
            }

            trace!("linking `{}` {} -> {key}", self.join.name, self.owner_key);
            let stmt = Insert::new(&self.join.name)
                .value(&self.join.owner_column, self.owner_key.clone())
                .value(&self.join.target_column, key);
            self.db.exec(stmt.into()).await?;
        }

        Ok(())
    }

    /// Unlinks the given records. Records that are not members are ignored.
    pub async fn remove<K: RelatedKey>(&self, records: impl IntoIterator<Item = K>) -> Result<()> {
        let keys = self.keys(records)?;
        if keys.is_empty() {
            return Ok(());
        }

        let stmt = Delete::new(&self.join.name)
            .filter(self.owned())
            .filter(Expr::in_list(self.join.target_column.as_str(), keys));
        self.db.exec(stmt.into()).await?;

        Ok(())
    }

    /// Unlinks every member of this owner. Links of other owners are kept.
    pub async fn clear(&self) -> Result<()> {
        let stmt = Delete::new(&self.join.name).filter(self.owned());
        self.db.exec(stmt.into()).await?;
        Ok(())
    }

    /// Makes the given records the only members.
    pub async fn replace<K: RelatedKey>(&self, records: impl IntoIterator<Item = K>) -> Result<()> {
        let keys = self.keys(records)?;
        self.clear().await?;
        self.add(keys).await
    }

    pub async fn contains(&self, record: impl RelatedKey) -> Result<bool> {
        let key = record.related_key(&self.target)?;
        let select = Select::new(&self.join.name)
            .filter(self.owned())
            .filter(Expr::eq(self.join.target_column.as_str(), key));
        Ok(self.count_of(select).await? > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        let select = Select::new(&self.join.name).filter(self.owned());
        self.count_of(select).await
    }

    /// Primary keys of the members, in link order.
    pub async fn ids(&self) -> Result<Vec<Value>> {
        let select = Select::new(&self.join.name)
            .filter(self.owned())
            .order_by(OrderBy::asc(JoinTable::ID));

        let rows = self.db.exec(select.into()).await?.into_rows();

        let mut ids = IndexSet::new();
        for row in &rows {
            let id = row
                .get(&self.join.target_column)
                .cloned()
                .unwrap_or_default()
                .cast(self.join.target_key_ty)?;
            ids.insert(id);
        }

        Ok(ids.into_iter().collect())
    }

    /// The member records, in link order.
    pub async fn all(&self) -> Result<Vec<Record>> {
        let ids = self.ids().await?;
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let select = Select::new(&self.target.table)
            .filter(Expr::in_list(self.target.primary_key_column(), ids.clone()));
        let mut records = engine::fetch(&self.db, &self.target, select).await?;

        records.sort_by_key(|record| {
            let key = engine::key(&self.target, record);
            ids.iter().position(|id| *id == key)
        });

        Ok(records)
    }

    fn owned(&self) -> Expr {
        Expr::eq(self.join.owner_column.as_str(), self.owner_key.clone())
    }

    fn keys<K: RelatedKey>(&self, records: impl IntoIterator<Item = K>) -> Result<Vec<Value>> {
        let mut keys = IndexSet::new();
        for record in records {
            keys.insert(record.related_key(&self.target)?);
        }
        Ok(keys.into_iter().collect())
    }

    async fn count_of(&self, mut select: Select) -> Result<u64> {
        select.fields = vec![Expr::count_star()];

        let rows = self.db.exec(Statement::Select(select)).await?.into_rows();
        let count = rows
            .first()
            .and_then(Row::first)
            .cloned()
            .unwrap_or_default()
            .cast(Type::I64)?;

        Ok(count.as_i64().map_or(0, |n| n.max(0) as u64))
    }
}
