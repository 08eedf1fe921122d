use super::{find, find::post_filtered, load_relation, mapping, observe, related_mut};
use crate::{query::Plan, Db, Record, Result};

use relorm_core::{
    err,
    schema::{HookStage, ModelDescriptor, RelationDescriptor, RelationKind},
    stmt::{Delete, Expr, Statement},
    Error,
};

use async_recursion::async_recursion;
use log::trace;

#[async_recursion]
pub(crate) async fn delete<'a>(db: &'a Db, record: &'a mut Record) -> Result<()> {
    let model = db.model(record.collection())?;

    if !mapping::is_persisted(&model, record) {
        return Err(Error::unpersisted_model(&model.name));
    }

    model.hooks.run(HookStage::BeforeDelete, record)?;

    for relation in model.relations.values() {
        if relation.auto_delete {
            cascade(db, &model, relation, record).await?;
        }
    }

    let key = mapping::key(&model, record);
    let stmt = Delete::new(&model.table).filter(Expr::eq(model.primary_key_column(), key.clone()));

    if db.exec(stmt.into()).await?.affected() == 0 {
        return Err(Error::record_not_found(format!(
            "collection={} key={key}",
            model.table
        )));
    }

    observe(&model, HookStage::AfterDelete, record);

    Ok(())
}

async fn cascade(
    db: &Db,
    model: &ModelDescriptor,
    relation: &RelationDescriptor,
    record: &mut Record,
) -> Result<()> {
    if relation.kind == RelationKind::ManyToMany {
        let join = relation
            .join
            .as_ref()
            .ok_or_else(|| err!("relation `{}.{}` has no join collection", model.name, relation.name))?;

        trace!("unlinking `{}.{}`", model.name, relation.name);
        let stmt = Delete::new(&join.name)
            .filter(Expr::eq(join.owner_column.as_str(), mapping::key(model, record)));
        db.exec(stmt.into()).await?;
        return Ok(());
    }

    // Reload the relation so records that were never attached are included
    let target = db.model(&relation.target)?;
    let mut owner = record.clone();
    load_relation(db, relation, model, &target, &mut [&mut owner]).await?;

    for child in related_mut(&mut owner, relation) {
        trace!("deleting `{}.{}`", model.name, relation.name);
        delete(db, child).await?;
    }

    Ok(())
}

/// Deletes every record matched by a query plan. Hooks and cascades do not
/// run.
pub(crate) async fn delete_matching(db: &Db, plan: Plan) -> Result<u64> {
    let mut stmt = Delete::new(&plan.model.table);
    let pk = plan.model.primary_key_column().to_string();

    if post_filtered(&plan.joins).next().is_some() {
        let model = plan.model.clone();
        let records = find(db, plan).await?;
        let keys = mapping::distinct(records.iter().map(|record| record.get(&model.primary_key)));
        stmt.filter = Some(Expr::in_list(pk, keys));
    } else if plan.select.joins.is_empty() {
        stmt.filter = plan.select.filter;
    } else {
        let mut keys = plan.select;
        keys.fields = vec![Expr::qualified(&plan.model.table, pk.as_str())];
        keys.order_by.clear();
        stmt.filter = Some(Expr::in_subquery(pk, keys));
    }

    let response = db.exec(Statement::Delete(stmt)).await?;
    Ok(response.affected())
}
