use super::{mapping, observe, related_mut, validate};
use crate::{query::join::foreign_key, Db, ManyToMany, Record, Result};

use relorm_core::{
    err,
    schema::{HookStage, ModelDescriptor, RelationDescriptor, RelationKind},
    stmt::Insert,
    Error,
};

use async_recursion::async_recursion;
use log::trace;

#[async_recursion]
pub(crate) async fn create<'a>(db: &'a Db, record: &'a mut Record) -> Result<()> {
    let model = db.model(record.collection())?;

    if record.is_empty() && record.related_names().next().is_none() {
        return Err(Error::empty_model_data(&model.name));
    }

    model.hooks.run(HookStage::BeforeCreate, record)?;
    model.hooks.run(HookStage::Validate, record)?;

    validate::apply_defaults(&model, record);
    let pending = pending_keys(db, &model, record)?;
    validate::check(&model, record, true, &pending)?;

    // The records this one points at go first
    for relation in model.relations.values() {
        if relation.kind == RelationKind::HasOne {
            create_referenced(db, &model, relation, record).await?;
        }
    }

    insert(db, &model, record).await?;

    for relation in model.relations.values() {
        match relation.kind {
            RelationKind::BelongsTo | RelationKind::HasMany => {
                create_dependents(db, &model, relation, record).await?
            }
            RelationKind::ManyToMany => link(db, &model, relation, record).await?,
            RelationKind::HasOne => {}
        }
    }

    observe(&model, HookStage::AfterCreate, record);
    record.clear_changes();

    Ok(())
}

/// Foreign keys filled in from related records created before this one. A
/// target is only a source of the key when it is persisted or will be
/// auto-created.
fn pending_keys<'m>(
    db: &Db,
    model: &'m ModelDescriptor,
    record: &Record,
) -> Result<Vec<&'m str>> {
    let mut pending = vec![];

    for relation in model.relations.values() {
        if relation.kind != RelationKind::HasOne {
            continue;
        }
        let Some(related) = record.one(&relation.name) else {
            continue;
        };

        let target = db.model(&relation.target)?;
        if relation.auto_create || mapping::is_persisted(&target, related) {
            pending.push(model.field(foreign_key(relation)?)?.name.as_str());
        }
    }

    Ok(pending)
}

async fn insert(db: &Db, model: &ModelDescriptor, record: &mut Record) -> Result<()> {
    let pk = model.primary_key_field();
    let generate = !mapping::is_persisted(model, record);

    let mut stmt = Insert::new(&model.table);
    if generate {
        stmt = stmt.generated_key(&pk.column);
    }

    for field in model.fields.values() {
        if !record.contains(&field.name) || (generate && field.is_primary_key()) {
            continue;
        }

        let value = record.get(&field.name);
        if field.constraints.ignore_if_zero && value.is_zero() {
            continue;
        }

        for (column, value) in field.to_storage(value)? {
            stmt = stmt.value(column, value);
        }
    }

    let response = db.exec(stmt.into()).await?;

    if generate {
        let Some(key) = response.generated_key else {
            return Err(err!("backend returned no key for new `{}`", model.name));
        };
        record.set_loaded(&pk.name, key.cast(pk.ty)?);
    }

    Ok(())
}

/// Creates the has-one target if needed, then points the foreign key at it.
async fn create_referenced(
    db: &Db,
    model: &ModelDescriptor,
    relation: &RelationDescriptor,
    record: &mut Record,
) -> Result<()> {
    let fk = &model.field(foreign_key(relation)?)?.name;
    let target = db.model(&relation.target)?;

    let Some(related) = record.one_mut(&relation.name) else {
        return Ok(());
    };

    if !mapping::is_persisted(&target, related) {
        if !relation.auto_create {
            trace!(
                "skipping unpersisted `{}.{}`; auto-create is off",
                model.name,
                relation.name
            );
            return Ok(());
        }

        trace!("creating `{}.{}` first", model.name, relation.name);
        create(db, related).await?;
    }

    let key = mapping::key(&target, related);
    record.set(fk, key);

    Ok(())
}

/// Creates related records that carry this record's key.
async fn create_dependents(
    db: &Db,
    model: &ModelDescriptor,
    relation: &RelationDescriptor,
    record: &mut Record,
) -> Result<()> {
    let target = db.model(&relation.target)?;
    let fk = &target.field(foreign_key(relation)?)?.name;
    let key = mapping::key(model, record);

    for child in related_mut(record, relation) {
        if mapping::is_persisted(&target, child) {
            continue;
        }

        if !relation.auto_create {
            trace!(
                "skipping unpersisted `{}.{}`; auto-create is off",
                model.name,
                relation.name
            );
            continue;
        }

        trace!("creating `{}.{}`", model.name, relation.name);
        child.set(fk, key.clone());
        create(db, child).await?;
    }

    Ok(())
}

/// Creates unpersisted many-to-many targets and links all of them.
async fn link(
    db: &Db,
    model: &ModelDescriptor,
    relation: &RelationDescriptor,
    record: &mut Record,
) -> Result<()> {
    let target = db.model(&relation.target)?;
    let children = related_mut(record, relation);

    if children.is_empty() {
        return Ok(());
    }

    if !relation.auto_create {
        trace!(
            "not linking `{}.{}`; auto-create is off",
            model.name,
            relation.name
        );
        return Ok(());
    }

    let mut keys = vec![];
    for child in children {
        if !mapping::is_persisted(&target, child) {
            trace!("creating `{}.{}`", model.name, relation.name);
            create(db, child).await?;
        }
        keys.push(mapping::key(&target, child));
    }

    ManyToMany::new(db, record, &relation.name)?.add(keys).await
}
