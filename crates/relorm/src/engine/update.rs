use super::{mapping, observe, related_mut, validate};
use crate::{Db, Record, Result};

use relorm_core::{
    schema::{HookStage, ModelDescriptor, RelationKind},
    stmt::{Expr, Update},
    Error,
};

use async_recursion::async_recursion;
use log::trace;

/// Persists `only` when given, otherwise the changed non-key fields.
#[async_recursion]
pub(crate) async fn update<'a>(
    db: &'a Db,
    record: &'a mut Record,
    only: Option<&'a [String]>,
) -> Result<()> {
    let model = db.model(record.collection())?;

    if !mapping::is_persisted(&model, record) {
        return Err(Error::unpersisted_model(&model.name));
    }

    model.hooks.run(HookStage::BeforeUpdate, record)?;
    model.hooks.run(HookStage::Validate, record)?;
    validate::check(&model, record, false, &[])?;

    let names: Vec<String> = match only {
        Some(names) => names.to_vec(),
        None => record.changed().map(str::to_string).collect(),
    };

    persist(db, &model, record, &names).await?;

    for relation in model.relations.values() {
        if !relation.auto_update || relation.kind == RelationKind::ManyToMany {
            continue;
        }

        let target = db.model(&relation.target)?;
        for child in related_mut(record, relation) {
            if mapping::is_persisted(&target, child) {
                trace!("updating `{}.{}`", model.name, relation.name);
                update(db, child, None).await?;
            }
        }
    }

    observe(&model, HookStage::AfterUpdate, record);
    record.clear_changes();

    Ok(())
}

async fn persist(
    db: &Db,
    model: &ModelDescriptor,
    record: &Record,
    names: &[String],
) -> Result<()> {
    let mut stmt = Update::new(&model.table);

    for name in names {
        let field = model.field(name)?;
        if field.is_primary_key() {
            continue;
        }

        for (column, value) in field.to_storage(record.get(&field.name))? {
            stmt = stmt.set(column, value);
        }
    }

    if stmt.assignments.is_empty() {
        trace!("nothing to update on `{}`", model.name);
        return Ok(());
    }

    let key = mapping::key(model, record);
    let stmt = stmt.filter(Expr::eq(model.primary_key_column(), key));

    db.exec(stmt.into()).await?;
    Ok(())
}
