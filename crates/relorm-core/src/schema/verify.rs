use super::*;
use crate::{Error, Result};

use indexmap::{IndexMap, IndexSet};

/// Rejects auto-create relations that require two distinct models to each be
/// persisted before the other (for example two has-one relations whose
/// foreign keys point at each other).
pub(super) fn auto_create_is_acyclic(models: &IndexMap<String, ModelDescriptor>) -> Result<()> {
    // model -> models that must be persisted before it
    let mut depends_on: IndexMap<&str, IndexSet<&str>> = IndexMap::new();

    for model in models.values() {
        for relation in model.relations.values().filter(|r| r.auto_create) {
            let (before, after) = match relation.kind {
                RelationKind::HasOne => (&relation.target, &relation.owner),
                RelationKind::BelongsTo | RelationKind::HasMany => {
                    (&relation.owner, &relation.target)
                }
                RelationKind::ManyToMany => continue,
            };

            if before != after {
                depends_on
                    .entry(after.as_str())
                    .or_default()
                    .insert(before.as_str());
            }
        }
    }

    let mut done = IndexSet::new();
    for &start in depends_on.keys() {
        let mut path = vec![];
        visit(start, &depends_on, &mut path, &mut done)?;
    }

    Ok(())
}

fn visit<'a>(
    model: &'a str,
    depends_on: &IndexMap<&'a str, IndexSet<&'a str>>,
    path: &mut Vec<&'a str>,
    done: &mut IndexSet<&'a str>,
) -> Result<()> {
    if done.contains(model) {
        return Ok(());
    }

    if let Some(pos) = path.iter().position(|m| *m == model) {
        let mut cycle = path[pos..].to_vec();
        cycle.push(model);
        return Err(Error::invalid_schema(format!(
            "auto-create relations form a cycle: {}",
            cycle.join(" -> ")
        )));
    }

    path.push(model);
    if let Some(deps) = depends_on.get(model) {
        for &dep in deps {
            visit(dep, depends_on, path, done)?;
        }
    }
    path.pop();

    done.insert(model);
    Ok(())
}
