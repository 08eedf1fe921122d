//! Record lifecycle: create, update and delete with their hooks and
//! cascades, plus reading records back and loading joined relations.

mod create;
pub(crate) use create::create;

mod delete;
pub(crate) use delete::{delete, delete_matching};

mod find;
pub(crate) use find::{count, fetch, find};

mod hydrate;
pub(crate) use hydrate::load_relation;

mod mapping;
pub(crate) use mapping::{is_persisted, key};

mod update;
pub(crate) use update::update;

mod validate;

use crate::Record;

use relorm_core::schema::{HookStage, ModelDescriptor, RelationDescriptor};

/// Runs an `after_*` hook. Its errors are logged and dropped.
fn observe(model: &ModelDescriptor, stage: HookStage, record: &mut Record) {
    if let Err(err) = model.hooks.run(stage, record) {
        log::warn!("ignoring error from `{}`: {err}", model.name);
    }
}

/// Records attached to `relation` on `record`.
fn related_mut<'a>(record: &'a mut Record, relation: &RelationDescriptor) -> Vec<&'a mut Record> {
    if relation.kind.is_single() {
        record.one_mut(&relation.name).into_iter().collect()
    } else {
        record
            .many_mut(&relation.name)
            .map(|records| records.iter_mut().collect())
            .unwrap_or_default()
    }
}
