use super::{hydrate, mapping, observe};
use crate::{
    query::{JoinNode, Plan},
    Db, Record, Result,
};

use relorm_core::{
    driver::Row,
    schema::{HookStage, ModelDescriptor},
    stmt::{Expr, JoinKind, Select, Type, Value},
    Related,
};

use indexmap::IndexSet;

/// Runs a select and maps the rows onto records.
pub(crate) async fn fetch(db: &Db, model: &ModelDescriptor, select: Select) -> Result<Vec<Record>> {
    let rows = db.exec(select.into()).await?.into_rows();

    let mut records = Vec::with_capacity(rows.len());
    for row in &rows {
        let mut record = mapping::load(model, row)?;
        observe(model, HookStage::AfterQuery, &mut record);
        records.push(record);
    }

    Ok(records)
}

pub(crate) async fn find(db: &Db, plan: Plan) -> Result<Vec<Record>> {
    let Plan {
        model,
        select,
        joins,
    } = plan;

    let sql_joins = !select.joins.is_empty();
    let mut records = fetch(db, &model, select).await?;

    // A joined side matching several rows repeats the root record
    if sql_joins {
        let mut seen = IndexSet::new();
        records.retain(|record| seen.insert(mapping::key(&model, record)));
    }

    hydrate::hydrate(db, &mut records, &joins).await?;

    let required: Vec<&JoinNode> = post_filtered(&joins).collect();
    if !required.is_empty() {
        records.retain(|record| {
            required
                .iter()
                .all(|node| reaches(record, &node.segments))
        });
    }

    Ok(records)
}

pub(crate) async fn count(db: &Db, plan: Plan) -> Result<u64> {
    let Plan {
        model,
        mut select,
        joins,
    } = plan;

    select.order_by.clear();
    select.limit = None;
    select.offset = None;

    if post_filtered(&joins).next().is_some() {
        let plan = Plan {
            model,
            select,
            joins,
        };
        return Ok(find(db, plan).await?.len() as u64);
    }

    // Joined rows can repeat a root record, so count its keys instead
    if !select.joins.is_empty() {
        let pk = model.primary_key_column().to_string();
        let mut keys = select;
        keys.fields = vec![Expr::qualified(&model.table, pk.as_str())];
        select = Select::new(&model.table).filter(Expr::in_subquery(pk, keys));
    }

    select.fields = vec![Expr::count_star()];

    let rows = db.exec(select.into()).await?.into_rows();
    let count = rows
        .first()
        .and_then(Row::first)
        .cloned()
        .unwrap_or_default()
        .cast(Type::I64)?;

    Ok(match count {
        Value::I64(n) => n.max(0) as u64,
        _ => 0,
    })
}

/// Inner joins the backend did not apply, enforced after hydration.
pub(crate) fn post_filtered(joins: &[JoinNode]) -> impl Iterator<Item = &JoinNode> {
    joins
        .iter()
        .filter(|node| node.kind == JoinKind::Inner && !node.sql)
}

/// Whether at least one related record exists along `segments`.
fn reaches(record: &Record, segments: &[(String, bool)]) -> bool {
    let Some(((name, _), rest)) = segments.split_first() else {
        return true;
    };

    match record.related(name) {
        Some(Related::One(Some(related))) => reaches(related, rest),
        Some(Related::Many(related)) => related.iter().any(|related| reaches(related, rest)),
        _ => false,
    }
}
