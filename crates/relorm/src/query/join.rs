use super::JoinRequest;
use crate::{Db, Result};

use relorm_core::{
    err,
    schema::{ModelDescriptor, RelationDescriptor, RelationKind},
    stmt::{BinaryOp, Expr, ExprColumn, Invalid, Join, JoinKind},
    Error,
};

use std::sync::Arc;

/// One relation path to load, expanded from a dotted join request.
#[derive(Debug, Clone)]
pub(crate) struct JoinNode {
    /// Dotted path from the root model, e.g. `Todos.Tags`
    pub(crate) path: String,

    /// Relation names along the path, each with whether it is single-valued
    pub(crate) segments: Vec<(String, bool)>,

    pub(crate) relation: RelationDescriptor,
    pub(crate) parent: Arc<ModelDescriptor>,
    pub(crate) target: Arc<ModelDescriptor>,
    pub(crate) kind: JoinKind,

    /// Rendered as a join in the root statement, which makes the target's
    /// fields usable in filters. Only single-valued paths qualify.
    pub(crate) sql: bool,
}

impl JoinNode {
    /// Path of the parent node, `None` for relations of the root model.
    pub(crate) fn parent_path(&self) -> Option<&str> {
        self.path.rsplit_once('.').map(|(parent, _)| parent)
    }

    pub(crate) fn to_sql_join(&self, root: &ModelDescriptor) -> Result<Join> {
        let parent_alias = self.parent_path().unwrap_or(&root.table);
        let alias = self.path.as_str();

        let (lhs, rhs) = match self.relation.kind {
            RelationKind::HasOne => (
                self.parent.field(foreign_key(&self.relation)?)?.column.as_str(),
                self.target.primary_key_column(),
            ),
            RelationKind::BelongsTo => (
                self.parent.primary_key_column(),
                self.target.field(foreign_key(&self.relation)?)?.column.as_str(),
            ),
            kind => {
                return Err(Error::unsupported_construct(format!(
                    "joining {kind} relation `{}`",
                    self.path
                )))
            }
        };

        let on = Expr::filter(
            ExprColumn::qualified(parent_alias, lhs),
            BinaryOp::Eq,
            ExprColumn::qualified(alias, rhs),
        );

        Ok(Join::new(self.kind, &self.target.table, on)
            .alias(alias)
            .path(alias))
    }
}

/// The foreign-key field of a has-one, belongs-to or has-many relation.
pub(crate) fn foreign_key(relation: &RelationDescriptor) -> Result<&str> {
    let field = match relation.kind {
        RelationKind::HasOne => relation.owner_field.as_deref(),
        RelationKind::BelongsTo | RelationKind::HasMany => relation.target_field.as_deref(),
        RelationKind::ManyToMany => None,
    };

    field.ok_or_else(|| {
        err!(
            "relation `{}.{}` has no foreign key",
            relation.owner,
            relation.name
        )
    })
}

/// Expands join requests into one node per distinct path prefix, parents
/// before children.
pub(crate) fn expand(
    db: &Db,
    root: &Arc<ModelDescriptor>,
    requests: &[JoinRequest],
) -> Result<Vec<JoinNode>> {
    let mut nodes: Vec<JoinNode> = vec![];

    for request in requests {
        let mut parent = root.clone();
        let mut segments: Vec<(String, bool)> = vec![];
        let mut sql = db.capability().joins;

        let names: Vec<&str> = request.path.split('.').collect();

        for (i, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(Error::invalid_expression("join", Invalid::EmptyName));
            }

            let relation = parent.relation(name)?.clone();
            let target = db.model(&relation.target)?;
            let single = relation.kind.is_single();

            sql &= single;
            segments.push((name.to_string(), single));

            let path = names[..=i].join(".");
            let last = i + 1 == names.len();

            match nodes.iter_mut().find(|node| node.path == path) {
                Some(node) => {
                    if last && request.kind == JoinKind::Inner {
                        node.kind = JoinKind::Inner;
                    }
                }
                None => nodes.push(JoinNode {
                    path,
                    segments: segments.clone(),
                    relation,
                    parent: parent.clone(),
                    target: target.clone(),
                    kind: if last { request.kind } else { JoinKind::Left },
                    sql,
                }),
            }

            parent = target;
        }
    }

    Ok(nodes)
}
