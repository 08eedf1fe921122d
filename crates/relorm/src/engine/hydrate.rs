use super::{fetch, mapping};
use crate::{
    query::{join::foreign_key, JoinNode},
    Db, Record, Result,
};

use relorm_core::{
    err,
    schema::{JoinTable, ModelDescriptor, RelationDescriptor, RelationKind},
    stmt::{Expr, OrderBy, Select, Value},
};

use log::trace;

/// Loads every join path into `records`, one query per path. Paths arrive
/// parents first, so nested paths see the records loaded for their parent.
pub(super) async fn hydrate(db: &Db, records: &mut [Record], joins: &[JoinNode]) -> Result<()> {
    for node in joins {
        let parent_segments = &node.segments[..node.segments.len() - 1];

        let mut parents = vec![];
        collect_mut(records, parent_segments, &mut parents);

        if parents.is_empty() {
            continue;
        }

        trace!("loading `{}` for {} records", node.path, parents.len());
        load_relation(db, &node.relation, &node.parent, &node.target, &mut parents).await?;
    }

    Ok(())
}

/// Collects the records reached by following `segments` from `records`.
fn collect_mut<'a>(
    records: &'a mut [Record],
    segments: &[(String, bool)],
    out: &mut Vec<&'a mut Record>,
) {
    let Some(((name, single), rest)) = segments.split_first() else {
        out.extend(records.iter_mut());
        return;
    };

    for record in records.iter_mut() {
        if *single {
            if let Some(related) = record.one_mut(name) {
                collect_mut(std::slice::from_mut(related), rest, out);
            }
        } else if let Some(related) = record.many_mut(name) {
            collect_mut(related, rest, out);
        }
    }
}

/// Loads `relation` for every record in `owners` and assigns the matches.
/// Multi-valued relations keep the target's key order, many-to-many
/// relations the order links were added in.
pub(crate) async fn load_relation(
    db: &Db,
    relation: &RelationDescriptor,
    owner: &ModelDescriptor,
    target: &ModelDescriptor,
    owners: &mut [&mut Record],
) -> Result<()> {
    match relation.kind {
        RelationKind::HasOne => {
            let fk = &owner.field(foreign_key(relation)?)?.name;
            let keys = mapping::distinct(owners.iter().map(|record| record.get(fk)));

            let related = fetch_in(db, target, target.primary_key_column(), keys).await?;

            for record in owners.iter_mut() {
                let key = record.get(fk).clone();
                let found = related
                    .iter()
                    .find(|related| !key.is_zero() && mapping::key(target, related) == key)
                    .cloned();
                record.set_one(&relation.name, found);
            }
        }
        RelationKind::BelongsTo | RelationKind::HasMany => {
            let fk = target.field(foreign_key(relation)?)?;
            let keys = mapping::distinct(owners.iter().map(|record| record.get(&owner.primary_key)));

            let related = fetch_in(db, target, &fk.column, keys).await?;

            for record in owners.iter_mut() {
                let key = mapping::key(owner, record);
                let mut matched = related
                    .iter()
                    .filter(|related| related.get(&fk.name) == &key)
                    .cloned();

                if relation.kind == RelationKind::BelongsTo {
                    record.set_one(&relation.name, matched.next());
                } else {
                    record.set_many(&relation.name, matched.collect());
                }
            }
        }
        RelationKind::ManyToMany => {
            let join = relation.join.as_ref().ok_or_else(|| {
                err!("relation `{}.{}` has no join collection", owner.name, relation.name)
            })?;

            let keys = mapping::distinct(owners.iter().map(|record| record.get(&owner.primary_key)));
            let links = links(db, join, keys).await?;

            let related = fetch_in(
                db,
                target,
                target.primary_key_column(),
                mapping::distinct(links.iter().map(|(_, target)| target)),
            )
            .await?;

            for record in owners.iter_mut() {
                let key = mapping::key(owner, record);
                let linked = links
                    .iter()
                    .filter(|(owner_key, _)| owner_key == &key)
                    .filter_map(|(_, target_key)| {
                        related
                            .iter()
                            .find(|related| &mapping::key(target, related) == target_key)
                    })
                    .cloned()
                    .collect();
                record.set_many(&relation.name, linked);
            }
        }
    }

    Ok(())
}

/// Records of `model` whose `column` is one of `keys`, by primary key.
async fn fetch_in(
    db: &Db,
    model: &ModelDescriptor,
    column: &str,
    keys: Vec<Value>,
) -> Result<Vec<Record>> {
    if keys.is_empty() {
        return Ok(vec![]);
    }

    let select = Select::new(&model.table)
        .filter(Expr::in_list(column, keys))
        .order_by(OrderBy::asc(model.primary_key_column()));

    fetch(db, model, select).await
}

/// `(owner key, target key)` pairs for `owners`, in link order.
async fn links(db: &Db, join: &JoinTable, owners: Vec<Value>) -> Result<Vec<(Value, Value)>> {
    if owners.is_empty() {
        return Ok(vec![]);
    }

    let select = Select::new(&join.name)
        .filter(Expr::in_list(join.owner_column.as_str(), owners))
        .order_by(OrderBy::asc(JoinTable::ID));

    let rows = db.exec(select.into()).await?.into_rows();

    rows.iter()
        .map(|row| {
            let column = |name: &str| row.get(name).cloned().unwrap_or_default();
            Ok((
                column(&join.owner_column).cast(join.owner_key_ty)?,
                column(&join.target_column).cast(join.target_key_ty)?,
            ))
        })
        .collect()
}
